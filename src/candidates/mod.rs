//! Published CORS middleware behind the [`Candidate`](crate::Candidate) seam.

pub mod bunner;
pub mod tower;

pub use bunner::BunnerCandidate;
pub use tower::TowerCandidate;

use crate::config::OriginConfig;
use crate::error::CandidateError;

/// One allowlist entry as written in an [`OriginConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OriginEntry<'a> {
    Any,
    Exact(&'a str),
    /// The first `*` stands for one or more characters.
    Wildcard {
        prefix: &'a str,
        suffix: &'a str,
    },
}

impl<'a> OriginEntry<'a> {
    fn parse(origin: &'a str) -> Self {
        if origin == "*" {
            return Self::Any;
        }
        match origin.split_once('*') {
            None => Self::Exact(origin),
            Some((prefix, suffix)) => Self::Wildcard { prefix, suffix },
        }
    }
}

/// Anchored pattern source for a wildcard entry; callers add case folding.
fn wildcard_pattern(prefix: &str, suffix: &str) -> String {
    format!("^{}.+{}$", escape(prefix), escape(suffix))
}

fn escape(literal: &str) -> String {
    let mut escaped = String::with_capacity(literal.len() * 2);
    for ch in literal.chars() {
        if matches!(
            ch,
            '\\' | '.'
                | '+'
                | '*'
                | '?'
                | '('
                | ')'
                | '|'
                | '['
                | ']'
                | '{'
                | '}'
                | '^'
                | '$'
                | '#'
                | '&'
                | '-'
                | '~'
        ) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Both crates refuse `*` together with credentials; tower-http by panicking.
fn reject_credentialed_wildcard(config: &OriginConfig) -> Result<(), CandidateError> {
    let wildcard = config
        .origins()
        .iter()
        .any(|origin| OriginEntry::parse(origin) == OriginEntry::Any);
    if wildcard && config.credentialed() {
        return Err(CandidateError::CredentialedWildcard);
    }
    Ok(())
}
