#![allow(dead_code)]

use bunner_cors_bench::{
    Candidate, CountingHandler, DEFAULT_REQUEST_HEADERS, HarnessConfig, OriginConfig,
    RequestSpec, SharedHandler,
};
use http::Request;
use std::sync::Arc;

/// Harness configuration small enough for debug-build tests.
pub fn small_config() -> HarnessConfig {
    HarnessConfig {
        max_header_bytes: 4096,
        many_origins: 2,
        workers: 4,
        iterations: 2_000,
        batch: 16,
        ..HarnessConfig::default()
    }
}

pub fn origin_config(origins: &[&str], credentialed: bool) -> OriginConfig {
    OriginConfig::new(origins.iter().copied(), credentialed, DEFAULT_REQUEST_HEADERS)
        .expect("non-empty origins")
}

/// Wraps a fresh counting terminal handler with `candidate`'s middleware.
pub fn counted<C>(candidate: &C, config: &OriginConfig) -> (Arc<CountingHandler>, SharedHandler)
where
    C: Candidate + ?Sized,
{
    let counter = CountingHandler::new();
    let handler = candidate
        .middleware(config)
        .unwrap_or_else(|err| panic!("{} rejected {config:?}: {err}", candidate.label()))
        .wrap(counter.clone());
    (counter, handler)
}

pub fn actual_request(origin: &str) -> Request<()> {
    RequestSpec::actual(origin)
        .build()
        .expect("valid actual request")
}

pub fn preflight_request<I, S>(origin: &str, request_headers: I) -> Request<()>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    RequestSpec::preflight(origin)
        .request_headers(request_headers)
        .build()
        .expect("valid preflight request")
}
