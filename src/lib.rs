pub mod candidates;
pub mod constants;

mod adapter;
mod adversarial;
mod alloc;
mod candidate;
mod case;
mod config;
mod error;
mod handler;
mod label;
mod origins;
mod request;
mod runner;

pub use adapter::{SubBenchmark, register};
pub use adversarial::{AdversarialHeader, DELIMITER};
pub use alloc::{AllocationSnapshot, CountingAllocator};
pub use candidate::{Candidate, Identity, Middleware, SharedCandidate, builtin};
pub use case::{
    BenchmarkCase, CASES, CaseDescriptor, CaseMatrix, DEFAULT_REQUEST_HEADERS, RequestHeaders,
    RequestOrigin,
};
pub use config::{ConfigError, HarnessConfig, OriginConfig};
pub use error::{CandidateError, HarnessError};
pub use handler::{
    CountingHandler, HELLO_BODY, Handler, ResponseRecorder, SharedHandler, hello_world,
};
pub use label::{FILL, LabelError, pad};
pub use origins::{
    OriginFamily, OriginSets, pathological_host, pathological_origin, pathological_request_origin,
};
pub use request::{RequestKind, RequestSpec, build_request};
pub use runner::{Phase, Runner, RunnerConfig, SubBenchmarkReport};
