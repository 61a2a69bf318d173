use crate::constants::{DUMMY_ENDPOINT, header, method};
use crate::error::HarnessError;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::{Method, Request};

/// Whether a synthetic request is an actual cross-origin request or a preflight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Actual,
    Preflight,
}

impl RequestKind {
    pub fn method(self) -> Method {
        match self {
            RequestKind::Actual => Method::GET,
            RequestKind::Preflight => Method::OPTIONS,
        }
    }
}

/// Declarative description of the headers a case sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub kind: RequestKind,
    pub origin: String,
    pub request_headers: Vec<String>,
    pub private_network: bool,
}

impl RequestSpec {
    pub fn actual(origin: impl Into<String>) -> Self {
        Self {
            kind: RequestKind::Actual,
            origin: origin.into(),
            request_headers: Vec::new(),
            private_network: false,
        }
    }

    /// Preflight asking for `GET`.
    pub fn preflight(origin: impl Into<String>) -> Self {
        Self {
            kind: RequestKind::Preflight,
            ..Self::actual(origin)
        }
    }

    /// One `Access-Control-Request-Headers` line per element.
    pub fn request_headers<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request_headers = lines.into_iter().map(Into::into).collect();
        self
    }

    pub fn private_network(mut self, enabled: bool) -> Self {
        self.private_network = enabled;
        self
    }

    pub fn header_map(&self) -> Result<HeaderMap, HarnessError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static(header::ORIGIN),
            header_value(header::ORIGIN, &self.origin)?,
        );

        if self.kind == RequestKind::Preflight {
            headers.insert(
                HeaderName::from_static(header::ACCESS_CONTROL_REQUEST_METHOD),
                HeaderValue::from_static(method::GET),
            );
            for line in &self.request_headers {
                headers.append(
                    HeaderName::from_static(header::ACCESS_CONTROL_REQUEST_HEADERS),
                    header_value(header::ACCESS_CONTROL_REQUEST_HEADERS, line)?,
                );
            }
            if self.private_network {
                headers.insert(
                    HeaderName::from_static(header::ACCESS_CONTROL_REQUEST_PRIVATE_NETWORK),
                    HeaderValue::from_static("true"),
                );
            }
        }

        Ok(headers)
    }

    pub fn build(&self) -> Result<Request<()>, HarnessError> {
        build_request(&self.kind.method(), &self.header_map()?)
    }
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue, HarnessError> {
    HeaderValue::from_str(value).map_err(|source| HarnessError::HeaderValue { name, source })
}

/// Builds a bodiless request to [`DUMMY_ENDPOINT`] carrying `headers`.
///
/// Each header name is assigned as a whole: its values replace whatever the
/// request held for that name before.
pub fn build_request(method: &Method, headers: &HeaderMap) -> Result<Request<()>, HarnessError> {
    let mut request = Request::builder()
        .method(method.clone())
        .uri(DUMMY_ENDPOINT)
        .body(())?;

    let target = request.headers_mut();
    for name in headers.keys() {
        target.remove(name);
        for value in headers.get_all(name) {
            target.append(name.clone(), value.clone());
        }
    }

    Ok(request)
}

#[cfg(test)]
#[path = "request_test.rs"]
mod request_test;
