use http::{HeaderMap, Request, Response, StatusCode};
use once_cell::sync::Lazy;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Synchronous request-in, response-out handler.
///
/// The request is only ever borrowed immutably so that every worker of a
/// sub-benchmark can serve the same instance.
pub trait Handler: Send + Sync {
    fn serve(&self, recorder: &mut ResponseRecorder, request: &Request<()>);
}

impl<F> Handler for F
where
    F: Fn(&mut ResponseRecorder, &Request<()>) + Send + Sync,
{
    fn serve(&self, recorder: &mut ResponseRecorder, request: &Request<()>) {
        self(recorder, request)
    }
}

pub type SharedHandler = Arc<dyn Handler>;

/// In-memory response sink. One is created per served request and dropped right after.
#[derive(Debug, Default)]
pub struct ResponseRecorder {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ResponseRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Status written by the handler, `200 OK` if it never set one.
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    pub fn write(&mut self, bytes: &[u8]) {
        self.body.extend_from_slice(bytes);
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

impl From<ResponseRecorder> for Response<Vec<u8>> {
    fn from(recorder: ResponseRecorder) -> Self {
        let status = recorder.status();
        let mut response = Response::new(recorder.body);
        *response.status_mut() = status;
        *response.headers_mut() = recorder.headers;
        response
    }
}

impl From<Response<Vec<u8>>> for ResponseRecorder {
    fn from(response: Response<Vec<u8>>) -> Self {
        let (parts, body) = response.into_parts();
        Self {
            status: Some(parts.status),
            headers: parts.headers,
            body,
        }
    }
}

pub const HELLO_BODY: &[u8] = b"Hello, World!";

static HELLO_WORLD: Lazy<SharedHandler> = Lazy::new(|| {
    let handler: SharedHandler = Arc::new(|recorder: &mut ResponseRecorder, _: &Request<()>| {
        recorder.write(HELLO_BODY);
    });
    handler
});

/// The trivial terminal handler every case wraps.
pub fn hello_world() -> SharedHandler {
    Arc::clone(&*HELLO_WORLD)
}

/// Terminal handler that counts how often it was reached.
#[derive(Debug, Default)]
pub struct CountingHandler {
    calls: AtomicU64,
}

impl CountingHandler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Handler for CountingHandler {
    fn serve(&self, recorder: &mut ResponseRecorder, _: &Request<()>) {
        self.calls.fetch_add(1, Ordering::Relaxed);
        recorder.write(HELLO_BODY);
    }
}

#[cfg(test)]
#[path = "handler_test.rs"]
mod handler_test;
