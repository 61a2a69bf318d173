use crate::adversarial::AdversarialHeader;
use crate::config::{HarnessConfig, OriginConfig};
use crate::error::HarnessError;
use crate::handler::{SharedHandler, hello_world};
use crate::origins::{OriginFamily, OriginSets, pathological_request_origin};
use crate::request::{RequestKind, RequestSpec};
use http::Request;
use std::sync::Arc;
use tracing::debug;

/// Request headers allowed by every policy under test.
pub const DEFAULT_REQUEST_HEADERS: [&str; 3] = ["Accept", "Content-Type", "X-Requested-With"];

/// Origin a case's request is sent from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOrigin {
    /// `https://example.com`
    Example,
    /// A 253-octet host matching no pathological allowlist entry.
    Pathological,
}

/// `Access-Control-Request-Headers` a preflight case sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestHeaders {
    None,
    ContentLength,
    /// The value list sized to the configured header budget.
    Adversarial,
}

/// One row of the case table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaseDescriptor {
    pub desc: &'static str,
    /// `None` registers the terminal handler without any policy.
    pub origins: Option<OriginFamily>,
    pub credentialed: bool,
    pub kind: RequestKind,
    pub origin: RequestOrigin,
    pub request_headers: RequestHeaders,
    pub private_network: bool,
}

impl CaseDescriptor {
    pub const fn actual(desc: &'static str, family: OriginFamily) -> Self {
        Self {
            desc,
            origins: Some(family),
            credentialed: false,
            kind: RequestKind::Actual,
            origin: RequestOrigin::Example,
            request_headers: RequestHeaders::None,
            private_network: false,
        }
    }

    pub const fn preflight(desc: &'static str, family: OriginFamily) -> Self {
        Self {
            kind: RequestKind::Preflight,
            ..Self::actual(desc, family)
        }
    }

    pub const fn with_pathological_origin(self) -> Self {
        Self {
            origin: RequestOrigin::Pathological,
            ..self
        }
    }
}

pub const CASES: &[CaseDescriptor] = &[
    CaseDescriptor {
        origins: None,
        ..CaseDescriptor::actual("", OriginFamily::Single)
    },
    CaseDescriptor::actual("single vs actual", OriginFamily::Single),
    CaseDescriptor::actual("multiple vs actual", OriginFamily::Multiple),
    CaseDescriptor::actual("pathological vs actual", OriginFamily::Pathological)
        .with_pathological_origin(),
    CaseDescriptor::actual("many vs actual", OriginFamily::Many),
    CaseDescriptor::actual("any vs actual", OriginFamily::Any),
    CaseDescriptor::preflight("single vs preflight", OriginFamily::Single),
    CaseDescriptor::preflight("multiple vs preflight", OriginFamily::Multiple),
    CaseDescriptor::preflight("pathological vs preflight", OriginFamily::Pathological)
        .with_pathological_origin(),
    CaseDescriptor::preflight("many vs preflight", OriginFamily::Many),
    CaseDescriptor::preflight("any vs preflight", OriginFamily::Any),
    CaseDescriptor {
        request_headers: RequestHeaders::ContentLength,
        ..CaseDescriptor::preflight("ACRH vs preflight", OriginFamily::Any)
    },
    CaseDescriptor {
        request_headers: RequestHeaders::Adversarial,
        ..CaseDescriptor::preflight("malicious ACRH vs preflight", OriginFamily::Any)
    },
    CaseDescriptor {
        private_network: true,
        ..CaseDescriptor::preflight("PNA vs preflight", OriginFamily::Any)
    },
];

/// A materialized case: policy input plus the request every iteration serves.
#[derive(Clone)]
pub struct BenchmarkCase {
    pub desc: &'static str,
    pub handler: SharedHandler,
    pub config: Option<OriginConfig>,
    pub request: Arc<Request<()>>,
}

impl std::fmt::Debug for BenchmarkCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BenchmarkCase")
            .field("desc", &self.desc)
            .field("config", &self.config)
            .field("method", self.request.method())
            .finish_non_exhaustive()
    }
}

/// Fixtures every case is built from, generated once per matrix.
struct Fixtures {
    origins: OriginSets,
    adversarial: AdversarialHeader,
}

impl Fixtures {
    fn generate(config: &HarnessConfig) -> Self {
        Self {
            origins: OriginSets::generate(0..config.many_origins),
            adversarial: AdversarialHeader::generate(config.max_header_bytes),
        }
    }

    fn request_spec(&self, descriptor: &CaseDescriptor) -> RequestSpec {
        let origin = match descriptor.origin {
            RequestOrigin::Example => "https://example.com".to_string(),
            RequestOrigin::Pathological => pathological_request_origin(),
        };
        let spec = match descriptor.kind {
            RequestKind::Actual => RequestSpec::actual(origin),
            RequestKind::Preflight => RequestSpec::preflight(origin),
        };
        let lines = match descriptor.request_headers {
            RequestHeaders::None => Vec::new(),
            RequestHeaders::ContentLength => vec!["content-length".to_string()],
            RequestHeaders::Adversarial => self.adversarial.values().to_vec(),
        };

        spec.request_headers(lines)
            .private_network(descriptor.private_network)
    }
}

/// The ordered set of benchmark cases.
#[derive(Debug, Clone)]
pub struct CaseMatrix {
    cases: Vec<BenchmarkCase>,
}

impl CaseMatrix {
    /// Materializes [`CASES`] around the shared hello-world handler.
    pub fn build(config: &HarnessConfig) -> Result<Self, HarnessError> {
        Self::build_with(config, CASES, hello_world())
    }

    pub fn build_with(
        config: &HarnessConfig,
        descriptors: &[CaseDescriptor],
        terminal: SharedHandler,
    ) -> Result<Self, HarnessError> {
        config.validate()?;
        let fixtures = Fixtures::generate(config);

        let mut cases = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            let origin_config = descriptor
                .origins
                .map(|family| {
                    OriginConfig::new(
                        fixtures.origins.get(family).iter().cloned(),
                        descriptor.credentialed,
                        DEFAULT_REQUEST_HEADERS,
                    )
                })
                .transpose()?;
            let request = fixtures.request_spec(descriptor).build()?;

            debug!(
                case = descriptor.desc,
                origins = origin_config.as_ref().map_or(0, |c| c.origins().len()),
                header_count = request.headers().len(),
                "materialized benchmark case"
            );

            cases.push(BenchmarkCase {
                desc: descriptor.desc,
                handler: Arc::clone(&terminal),
                config: origin_config,
                request: Arc::new(request),
            });
        }

        Ok(Self { cases })
    }

    pub fn cases(&self) -> &[BenchmarkCase] {
        &self.cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

#[cfg(test)]
#[path = "case_test.rs"]
mod case_test;
