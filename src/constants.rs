pub mod header {
    pub const ACCESS_CONTROL_ALLOW_ORIGIN: &str = "access-control-allow-origin";
    pub const ACCESS_CONTROL_ALLOW_METHODS: &str = "access-control-allow-methods";
    pub const ACCESS_CONTROL_REQUEST_HEADERS: &str = "access-control-request-headers";
    pub const ACCESS_CONTROL_REQUEST_METHOD: &str = "access-control-request-method";
    pub const ACCESS_CONTROL_REQUEST_PRIVATE_NETWORK: &str =
        "access-control-request-private-network";
    pub const ORIGIN: &str = "origin";
    pub const VARY: &str = "vary";
}

pub mod method {
    pub const GET: &str = "GET";
    pub const HEAD: &str = "HEAD";
    pub const POST: &str = "POST";
}

pub mod limits {
    /// Longest valid DNS host name, in octets.
    pub const HOST_MAX_LEN: usize = 253;
    /// Header budget used when nothing else is configured (1 MiB).
    pub const DEFAULT_MAX_HEADER_BYTES: usize = 1 << 20;
    /// Display width every registered benchmark label is padded to.
    pub const DEFAULT_LABEL_WIDTH: usize = 40;
}

/// Absolute target of every synthetic request. Irrelevant to any CORS decision.
pub const DUMMY_ENDPOINT: &str = "https://example.com/whatever";

/// Label under which the unwrapped terminal handler is registered.
pub const NO_CORS_LABEL: &str = "no_CORS";
