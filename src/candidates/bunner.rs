//! `bunner_cors_rs::Cors`, answered the way its framework integrations answer.
//!
//! Preflights end at the middleware with `204` or `403`, simple requests from
//! a disallowed origin get `403`, and accepted simple requests reach the
//! wrapped handler before the CORS headers are applied.

use super::{OriginEntry, reject_credentialed_wildcard, wildcard_pattern};
use crate::candidate::{Candidate, Middleware};
use crate::config::OriginConfig;
use crate::constants::{header, method};
use crate::error::CandidateError;
use crate::handler::{Handler, ResponseRecorder, SharedHandler};
use bunner_cors_rs::{
    AllowedHeaders, AllowedMethods, Cors, CorsDecision, CorsOptions, Headers, Origin,
    OriginMatcher, RequestContext,
};
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::{Request, StatusCode};
use std::sync::Arc;

pub const LABEL: &str = "bunner_cors";

const ALLOWED_METHODS: [&str; 3] = [method::GET, method::HEAD, method::POST];

#[derive(Debug, Clone, Copy, Default)]
pub struct BunnerCandidate;

impl Candidate for BunnerCandidate {
    fn label(&self) -> &'static str {
        LABEL
    }

    fn middleware(&self, config: &OriginConfig) -> Result<Middleware, CandidateError> {
        let cors = Arc::new(build_cors(config)?);
        Ok(Middleware::new(move |next| {
            let handler: SharedHandler = Arc::new(BunnerCors {
                cors: Arc::clone(&cors),
                next,
            });
            handler
        }))
    }
}

/// Policy built once per case and shared by every handler it wraps.
pub fn build_cors(config: &OriginConfig) -> Result<Cors, CandidateError> {
    reject_credentialed_wildcard(config)?;

    Cors::new(CorsOptions {
        origin: origin_policy(config)?,
        methods: AllowedMethods::list(ALLOWED_METHODS),
        allowed_headers: AllowedHeaders::list(config.request_headers().iter().cloned()),
        credentials: config.credentialed(),
        ..CorsOptions::default()
    })
    .map_err(|err| CandidateError::Options(err.to_string()))
}

fn origin_policy(config: &OriginConfig) -> Result<Origin, CandidateError> {
    let mut matchers = Vec::with_capacity(config.origins().len());
    for origin in config.origins() {
        let matcher = match OriginEntry::parse(origin) {
            OriginEntry::Any => return Ok(Origin::any()),
            OriginEntry::Exact(exact) => OriginMatcher::exact(exact),
            OriginEntry::Wildcard { prefix, suffix } => {
                OriginMatcher::pattern_str(&wildcard_pattern(prefix, suffix)).map_err(|err| {
                    CandidateError::InvalidOrigin {
                        origin: origin.clone(),
                        message: err.to_string(),
                    }
                })?
            }
        };
        matchers.push(matcher);
    }
    Ok(Origin::list(matchers))
}

struct BunnerCors {
    cors: Arc<Cors>,
    next: SharedHandler,
}

impl Handler for BunnerCors {
    fn serve(&self, recorder: &mut ResponseRecorder, request: &Request<()>) {
        let headers = request.headers();
        let context = RequestContext {
            method: request.method().as_str(),
            origin: header_str(headers, header::ORIGIN),
            access_control_request_method: header_str(
                headers,
                header::ACCESS_CONTROL_REQUEST_METHOD,
            ),
            access_control_request_headers: header_str(
                headers,
                header::ACCESS_CONTROL_REQUEST_HEADERS,
            ),
            access_control_request_private_network: header_str(
                headers,
                header::ACCESS_CONTROL_REQUEST_PRIVATE_NETWORK,
            )
            .is_some_and(|value| value.eq_ignore_ascii_case("true")),
        };

        match self.cors.check(&context) {
            Ok(CorsDecision::PreflightAccepted { headers }) => {
                recorder.set_status(StatusCode::NO_CONTENT);
                apply_headers(recorder.headers_mut(), &headers);
            }
            Ok(CorsDecision::PreflightRejected(rejection)) => {
                recorder.set_status(StatusCode::FORBIDDEN);
                apply_headers(recorder.headers_mut(), &rejection.headers);
            }
            Ok(CorsDecision::SimpleAccepted { headers }) => {
                self.next.serve(recorder, request);
                apply_headers(recorder.headers_mut(), &headers);
            }
            Ok(CorsDecision::SimpleRejected(rejection)) => {
                recorder.set_status(StatusCode::FORBIDDEN);
                apply_headers(recorder.headers_mut(), &rejection.headers);
            }
            Ok(CorsDecision::NotApplicable) => self.next.serve(recorder, request),
            Err(err) => {
                recorder.set_status(StatusCode::INTERNAL_SERVER_ERROR);
                recorder.write(format!("CORS configuration error: {err}").as_bytes());
            }
        }
    }
}

/// First line of `name`; later lines of a repeated header are never seen.
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn apply_headers(map: &mut HeaderMap, headers: &Headers) {
    for (name, value) in headers.iter() {
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name.as_str()),
            HeaderValue::from_str(value),
        ) {
            map.insert(name, value);
        }
    }
}

#[cfg(test)]
#[path = "bunner_test.rs"]
mod bunner_test;
