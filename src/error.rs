use crate::config::{ConfigError, OriginConfig};
use crate::label::LabelError;
use thiserror::Error;

/// Reasons a candidate refuses to build middleware from an origin configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CandidateError {
    #[error("`*` cannot be combined with credentials")]
    CredentialedWildcard,
    #[error("origin `{origin}` cannot be used: {message}")]
    InvalidOrigin { origin: String, message: String },
    #[error("`{0}` is not a valid request header name")]
    InvalidHeaderName(String),
    #[error("CORS options were rejected: {0}")]
    Options(String),
}

/// Everything that can abort harness setup.
///
/// None of these are recoverable: a partially registered matrix would make the
/// cross-candidate comparison meaningless.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("candidate `{candidate}` rejected the configuration of case `{case}` ({config:?}): {source}")]
    Candidate {
        candidate: &'static str,
        case: &'static str,
        config: OriginConfig,
        #[source]
        source: CandidateError,
    },
    #[error(transparent)]
    Label(#[from] LabelError),
    #[error("benchmark label `{0}` is registered more than once")]
    DuplicateLabel(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build synthetic request: {0}")]
    Request(#[from] http::Error),
    #[error("invalid synthetic header value for `{name}`: {source}")]
    HeaderValue {
        name: &'static str,
        #[source]
        source: http::header::InvalidHeaderValue,
    },
}
