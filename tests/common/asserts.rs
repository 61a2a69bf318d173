#![allow(dead_code)]

use http::{HeaderMap, Method, Request, Uri};

/// Owned copy of everything a handler could observe on a request.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSnapshot {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
}

impl RequestSnapshot {
    pub fn capture(request: &Request<()>) -> Self {
        Self {
            method: request.method().clone(),
            uri: request.uri().clone(),
            headers: request.headers().clone(),
        }
    }
}

pub fn assert_request_unchanged(before: &RequestSnapshot, request: &Request<()>) {
    assert_eq!(before, &RequestSnapshot::capture(request), "request was mutated");
}
