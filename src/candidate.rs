use crate::config::OriginConfig;
use crate::constants::NO_CORS_LABEL;
use crate::candidates::{BunnerCandidate, TowerCandidate};
use crate::error::CandidateError;
use crate::handler::SharedHandler;
use std::fmt;
use std::sync::Arc;

type WrapFn = dyn Fn(SharedHandler) -> SharedHandler + Send + Sync;

/// Handler wrapper produced by a [`Candidate`] for one origin configuration.
#[derive(Clone)]
pub struct Middleware {
    wrap: Arc<WrapFn>,
}

impl Middleware {
    pub fn new<F>(wrap: F) -> Self
    where
        F: Fn(SharedHandler) -> SharedHandler + Send + Sync + 'static,
    {
        Self {
            wrap: Arc::new(wrap),
        }
    }

    /// Returns `next` untouched.
    pub fn identity() -> Self {
        Self::new(|next| next)
    }

    pub fn wrap(&self, next: SharedHandler) -> SharedHandler {
        (self.wrap)(next)
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Middleware").finish_non_exhaustive()
    }
}

/// A CORS implementation under comparison.
pub trait Candidate: Send + Sync {
    /// Prefix of every benchmark label registered for this candidate.
    fn label(&self) -> &'static str;

    /// Builds the wrapper for `config`. Rejection is fatal to the run.
    fn middleware(&self, config: &OriginConfig) -> Result<Middleware, CandidateError>;
}

pub type SharedCandidate = Arc<dyn Candidate>;

/// Enforces no policy at all; the baseline every overhead is measured against.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Candidate for Identity {
    fn label(&self) -> &'static str {
        NO_CORS_LABEL
    }

    fn middleware(&self, _: &OriginConfig) -> Result<Middleware, CandidateError> {
        Ok(Middleware::identity())
    }
}

/// The middleware compared by default, in registration order.
pub fn builtin() -> Vec<SharedCandidate> {
    vec![Arc::new(BunnerCandidate), Arc::new(TowerCandidate)]
}

#[cfg(test)]
#[path = "candidate_test.rs"]
mod candidate_test;
