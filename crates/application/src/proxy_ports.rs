use async_trait::async_trait;
use serde_json::Value;
use tablero_core::{AppError, AppResult};

/// HTTP method forwarded to an upstream service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamMethod {
    /// Read request; the upstream body is returned verbatim.
    Get,
    /// Write request carrying a JSON or multipart body.
    Post,
}

impl UpstreamMethod {
    /// Returns the HTTP method name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// Validated path relative to the upstream base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamPath(String);

impl UpstreamPath {
    /// Validates a relative upstream path.
    ///
    /// Leading slashes are dropped. Empty paths, `.`/`..` segments (including
    /// their `%2e` spellings), absolute URLs and embedded query or fragment
    /// markers are rejected.
    pub fn new(value: impl AsRef<str>) -> AppResult<Self> {
        let trimmed = value.as_ref().trim().trim_start_matches('/');

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "upstream path must not be empty".to_owned(),
            ));
        }

        if trimmed.contains("://") || trimmed.contains('\\') {
            return Err(AppError::Validation(format!(
                "upstream path '{trimmed}' must be relative"
            )));
        }

        if trimmed.contains(['?', '#']) {
            return Err(AppError::Validation(format!(
                "upstream path '{trimmed}' must not carry a query or fragment"
            )));
        }

        if trimmed.split('/').any(is_dot_segment) {
            return Err(AppError::Validation(format!(
                "upstream path '{trimmed}' must not contain dot segments"
            )));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the path without a leading slash.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

// URL parsers resolve `%2e` as a dot, so `%2e%2e` and `.%2E` climb too.
fn is_dot_segment(segment: &str) -> bool {
    let decoded = segment.to_ascii_lowercase().replace("%2e", ".");
    decoded == "." || decoded == ".."
}

/// Request header copied from the dashboard request to the upstream call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardedHeader {
    /// Lowercase header name.
    pub name: String,
    /// Raw header value; it may carry non-ASCII octets.
    pub value: Vec<u8>,
}

impl ForwardedHeader {
    /// Creates a forwarded header.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Body forwarded to an upstream service.
#[derive(Debug, Clone, PartialEq)]
pub enum UpstreamBody {
    /// JSON document, re-serialized on send.
    Json(Value),
    /// Multipart form data forwarded byte-for-byte.
    Multipart {
        /// Original content type including the boundary parameter.
        content_type: String,
        /// Raw multipart payload.
        bytes: Vec<u8>,
    },
}

/// One call to an upstream service.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamRequest {
    /// HTTP method.
    pub method: UpstreamMethod,
    /// Path relative to the upstream base URL.
    pub path: UpstreamPath,
    /// Raw query string without the leading `?`.
    pub query: Option<String>,
    /// Headers copied from the incoming request.
    pub headers: Vec<ForwardedHeader>,
    /// Request body for writes.
    pub body: Option<UpstreamBody>,
}

/// Raw upstream answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response content type, when present.
    pub content_type: Option<String>,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl UpstreamResponse {
    /// Returns whether the status is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the body decoded as UTF-8, lossily and trimmed.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).trim().to_owned()
    }
}

/// Port for calls to the external business services.
#[async_trait]
pub trait UpstreamGateway: Send + Sync {
    /// Sends one request upstream.
    ///
    /// Connectivity failures are reported as [`AppError::Unavailable`]; any
    /// HTTP answer, including error statuses, is returned as a response.
    async fn send(&self, request: UpstreamRequest) -> AppResult<UpstreamResponse>;
}
