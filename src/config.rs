use crate::constants::limits;
use std::env;
use std::num::NonZeroUsize;
use std::thread;
use thiserror::Error;

pub const ENV_MAX_HEADER_BYTES: &str = "BUNNER_BENCH_MAX_HEADER_BYTES";
pub const ENV_LABEL_WIDTH: &str = "BUNNER_BENCH_LABEL_WIDTH";
pub const ENV_MANY_ORIGINS: &str = "BUNNER_BENCH_MANY_ORIGINS";
pub const ENV_WORKERS: &str = "BUNNER_BENCH_WORKERS";
pub const ENV_ITERATIONS: &str = "BUNNER_BENCH_ITERATIONS";
pub const ENV_BATCH: &str = "BUNNER_BENCH_BATCH";

/// Knobs that size the generated fixtures and the parallel workload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Total header budget the adversarial `Access-Control-Request-Headers` value is sized to.
    pub max_header_bytes: usize,
    /// Width every `<candidate>_<case>` label is padded to.
    pub label_width: usize,
    /// Number of `i` values the "many" origin family is generated for.
    pub many_origins: usize,
    /// Concurrent workers per sub-benchmark.
    pub workers: usize,
    /// Iterations each sub-benchmark executes, shared between all workers.
    pub iterations: u64,
    /// Iterations a worker claims from the shared budget at once.
    pub batch: u64,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            max_header_bytes: limits::DEFAULT_MAX_HEADER_BYTES,
            label_width: limits::DEFAULT_LABEL_WIDTH,
            many_origins: 10,
            workers: thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(4),
            iterations: 100_000,
            batch: 64,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max header bytes must be greater than zero")]
    ZeroHeaderBudget,
    #[error("label width must be greater than zero")]
    ZeroLabelWidth,
    #[error("at least one worker is required")]
    ZeroWorkers,
    #[error("batch size must be greater than zero")]
    ZeroBatch,
    #[error("an origin configuration under test needs at least one origin")]
    EmptyOrigins,
    #[error("environment variable {key} has invalid value `{value}`")]
    InvalidEnv { key: &'static str, value: String },
}

impl HarnessConfig {
    /// Defaults overlaid with any `BUNNER_BENCH_*` variables set in the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = parse_var(&lookup, ENV_MAX_HEADER_BYTES)? {
            config.max_header_bytes = value;
        }
        if let Some(value) = parse_var(&lookup, ENV_LABEL_WIDTH)? {
            config.label_width = value;
        }
        if let Some(value) = parse_var(&lookup, ENV_MANY_ORIGINS)? {
            config.many_origins = value;
        }
        if let Some(value) = parse_var(&lookup, ENV_WORKERS)? {
            config.workers = value;
        }
        if let Some(value) = parse_var(&lookup, ENV_ITERATIONS)? {
            config.iterations = value;
        }
        if let Some(value) = parse_var(&lookup, ENV_BATCH)? {
            config.batch = value;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_header_bytes == 0 {
            return Err(ConfigError::ZeroHeaderBudget);
        }
        if self.label_width == 0 {
            return Err(ConfigError::ZeroLabelWidth);
        }
        if self.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.batch == 0 {
            return Err(ConfigError::ZeroBatch);
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { key, value: raw }),
    }
}

/// Policy input handed to every candidate: allowed origins, credential flag and
/// allowed request headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginConfig {
    origins: Vec<String>,
    credentialed: bool,
    request_headers: Vec<String>,
}

impl OriginConfig {
    pub fn new<O, H, S, T>(origins: O, credentialed: bool, request_headers: H) -> Result<Self, ConfigError>
    where
        O: IntoIterator<Item = S>,
        S: Into<String>,
        H: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let origins: Vec<String> = origins.into_iter().map(Into::into).collect();
        if origins.is_empty() {
            return Err(ConfigError::EmptyOrigins);
        }

        Ok(Self {
            origins,
            credentialed,
            request_headers: request_headers.into_iter().map(Into::into).collect(),
        })
    }

    pub fn origins(&self) -> &[String] {
        &self.origins
    }

    pub fn credentialed(&self) -> bool {
        self.credentialed
    }

    pub fn request_headers(&self) -> &[String] {
        &self.request_headers
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
