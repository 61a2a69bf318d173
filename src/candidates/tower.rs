//! tower-http's `CorsLayer`, driven synchronously.
//!
//! The wrapped handler becomes an always-ready `tower_service::Service`, so the
//! layer's response future completes on its first poll with a no-op waker.

use super::{OriginEntry, reject_credentialed_wildcard, wildcard_pattern};
use crate::candidate::{Candidate, Middleware};
use crate::config::OriginConfig;
use crate::error::CandidateError;
use crate::handler::{Handler, ResponseRecorder, SharedHandler};
use http::header::{HeaderName, HeaderValue};
use http::request::Parts;
use http::{Method, Request, Response};
use regex_automata::meta::Regex;
use std::convert::Infallible;
use std::future::{self, Future, Ready};
use std::pin::pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};
use tower_http::cors::{AllowOrigin, Cors, CorsLayer};
use tower_layer::Layer;
use tower_service::Service;

pub const LABEL: &str = "tower_http";

#[derive(Debug, Clone, Copy, Default)]
pub struct TowerCandidate;

impl Candidate for TowerCandidate {
    fn label(&self) -> &'static str {
        LABEL
    }

    fn middleware(&self, config: &OriginConfig) -> Result<Middleware, CandidateError> {
        let layer = build_layer(config)?;
        Ok(Middleware::new(move |next| {
            let handler: SharedHandler = Arc::new(TowerCors {
                service: layer.layer(Terminal { next }),
            });
            handler
        }))
    }
}

/// Layer equivalent of `config`. Never builds a combination `CorsLayer` panics on.
pub fn build_layer(config: &OriginConfig) -> Result<CorsLayer, CandidateError> {
    reject_credentialed_wildcard(config)?;

    let allowed_headers = config
        .request_headers()
        .iter()
        .map(|name| {
            HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| CandidateError::InvalidHeaderName(name.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(allow_origin(config)?)
        .allow_methods([Method::GET, Method::HEAD, Method::POST])
        .allow_headers(allowed_headers)
        .allow_credentials(config.credentialed()))
}

fn allow_origin(config: &OriginConfig) -> Result<AllowOrigin, CandidateError> {
    let mut exact = Vec::with_capacity(config.origins().len());
    let mut patterns = Vec::new();
    for origin in config.origins() {
        let invalid = |message: String| CandidateError::InvalidOrigin {
            origin: origin.clone(),
            message,
        };
        match OriginEntry::parse(origin) {
            OriginEntry::Any => return Ok(AllowOrigin::any()),
            OriginEntry::Exact(value) => exact
                .push(HeaderValue::from_str(value).map_err(|err| invalid(err.to_string()))?),
            OriginEntry::Wildcard { prefix, suffix } => patterns.push(
                Regex::new(&format!("(?i:{})", wildcard_pattern(prefix, suffix)))
                    .map_err(|err| invalid(err.to_string()))?,
            ),
        }
    }

    // tower-http has no wildcard syntax, only lists and predicates.
    if patterns.is_empty() {
        return Ok(AllowOrigin::list(exact));
    }
    let allowlist = OriginAllowlist { exact, patterns };
    Ok(AllowOrigin::predicate(
        move |origin: &HeaderValue, _: &Parts| allowlist.allows(origin),
    ))
}

#[derive(Debug)]
struct OriginAllowlist {
    exact: Vec<HeaderValue>,
    patterns: Vec<Regex>,
}

impl OriginAllowlist {
    fn allows(&self, origin: &HeaderValue) -> bool {
        self.exact.iter().any(|allowed| allowed == origin)
            || self
                .patterns
                .iter()
                .any(|pattern| pattern.is_match(origin.as_bytes()))
    }
}

/// The wrapped handler as the inner service of the layer.
#[derive(Clone)]
struct Terminal {
    next: SharedHandler,
}

impl Service<Request<()>> for Terminal {
    type Response = Response<Vec<u8>>;
    type Error = Infallible;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<()>) -> Self::Future {
        let mut recorder = ResponseRecorder::new();
        self.next.serve(&mut recorder, &request);
        future::ready(Ok(recorder.into()))
    }
}

struct TowerCors {
    service: Cors<Terminal>,
}

impl Handler for TowerCors {
    fn serve(&self, recorder: &mut ResponseRecorder, request: &Request<()>) {
        // Services take `&mut self` and an owned request, so each call gets its
        // own service handle and request copy, as a tower router would.
        let response = call_ready(self.service.clone(), owned_request(request));
        *recorder = ResponseRecorder::from(response);
    }
}

fn owned_request(request: &Request<()>) -> Request<()> {
    let mut owned = Request::new(());
    *owned.method_mut() = request.method().clone();
    *owned.uri_mut() = request.uri().clone();
    *owned.version_mut() = request.version();
    *owned.headers_mut() = request.headers().clone();
    owned
}

/// Drives `service` to completion without an executor.
///
/// Panics if the service or its future is pending, which an always-ready
/// inner service rules out.
fn call_ready<S>(mut service: S, request: Request<()>) -> S::Response
where
    S: Service<Request<()>, Error = Infallible>,
{
    let mut cx = Context::from_waker(Waker::noop());
    match service.poll_ready(&mut cx) {
        Poll::Ready(Ok(())) => {}
        Poll::Ready(Err(never)) => match never {},
        Poll::Pending => unreachable!("CORS service over an always-ready handler was not ready"),
    }

    let future = pin!(service.call(request));
    match future.poll(&mut cx) {
        Poll::Ready(Ok(response)) => response,
        Poll::Ready(Err(never)) => match never {},
        Poll::Pending => unreachable!("CORS future over an always-ready handler was pending"),
    }
}

#[cfg(test)]
#[path = "tower_test.rs"]
mod tower_test;
