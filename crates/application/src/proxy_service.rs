use std::sync::Arc;

use serde_json::Value;
use tablero_core::{AppError, AppResult};
use tracing::{debug, warn};

use crate::{
    ForwardedHeader, UpstreamBody, UpstreamGateway, UpstreamMethod, UpstreamPath,
    UpstreamRequest, UpstreamResponse,
};

const JSON_CONTENT_TYPE: &str = "application/json";

/// JSON answer relayed back to the dashboard.
///
/// The body holds the upstream bytes unchanged once they have been checked
/// to be a JSON document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxiedResponse {
    /// Upstream status code.
    pub status: u16,
    /// JSON content type, the upstream one when it names a JSON media type.
    pub content_type: String,
    /// Raw JSON body.
    pub body: Vec<u8>,
}

/// Application service relaying dashboard calls to the business services.
#[derive(Clone)]
pub struct ProxyService {
    gateway: Arc<dyn UpstreamGateway>,
}

impl ProxyService {
    /// Creates a proxy service from an upstream gateway implementation.
    #[must_use]
    pub fn new(gateway: Arc<dyn UpstreamGateway>) -> Self {
        Self { gateway }
    }

    /// Relays a read and returns the upstream JSON verbatim with its status.
    pub async fn forward_get(
        &self,
        path: &str,
        query: Option<String>,
        headers: Vec<ForwardedHeader>,
    ) -> AppResult<ProxiedResponse> {
        let response = self
            .send(UpstreamMethod::Get, path, query, headers, None)
            .await?;

        if response.body_text().is_empty() {
            return if response.is_success() {
                Ok(empty_object(response.status))
            } else {
                Err(upstream_error(&response))
            };
        }

        match validate_json(&response.body) {
            Ok(()) => Ok(relay(response)),
            Err(error) if response.is_success() => Err(malformed_body(path, &error)),
            Err(_) => Err(upstream_error(&response)),
        }
    }

    /// Relays a write. Non-success upstream answers become errors carrying
    /// the upstream status.
    pub async fn forward_post(
        &self,
        path: &str,
        query: Option<String>,
        body: UpstreamBody,
        headers: Vec<ForwardedHeader>,
    ) -> AppResult<ProxiedResponse> {
        let response = self
            .send(UpstreamMethod::Post, path, query, headers, Some(body))
            .await?;

        if !response.is_success() {
            return Err(upstream_error(&response));
        }

        if response.body_text().is_empty() {
            return Ok(empty_object(response.status));
        }

        validate_json(&response.body).map_err(|error| malformed_body(path, &error))?;

        Ok(relay(response))
    }

    async fn send(
        &self,
        method: UpstreamMethod,
        path: &str,
        query: Option<String>,
        headers: Vec<ForwardedHeader>,
        body: Option<UpstreamBody>,
    ) -> AppResult<UpstreamResponse> {
        let path = UpstreamPath::new(path)?;
        debug!(method = method.as_str(), path = path.as_str(), "forwarding upstream");

        let result = self
            .gateway
            .send(UpstreamRequest {
                method,
                path: path.clone(),
                query: query.filter(|value| !value.is_empty()),
                headers,
                body,
            })
            .await;

        match &result {
            Ok(response) if !response.is_success() => warn!(
                method = method.as_str(),
                path = path.as_str(),
                status = response.status,
                "upstream answered with a non-success status"
            ),
            Err(error) => warn!(
                method = method.as_str(),
                path = path.as_str(),
                %error,
                "upstream call failed"
            ),
            Ok(_) => {}
        }

        result
    }
}

fn empty_object(status: u16) -> ProxiedResponse {
    ProxiedResponse {
        status,
        content_type: JSON_CONTENT_TYPE.to_owned(),
        body: b"{}".to_vec(),
    }
}

fn validate_json(body: &[u8]) -> serde_json::Result<()> {
    serde_json::from_slice::<serde::de::IgnoredAny>(body).map(|_| ())
}

fn relay(response: UpstreamResponse) -> ProxiedResponse {
    let content_type = response
        .content_type
        .filter(|value| is_json_media_type(value))
        .unwrap_or_else(|| JSON_CONTENT_TYPE.to_owned());

    ProxiedResponse {
        status: response.status,
        content_type,
        body: response.body,
    }
}

fn is_json_media_type(content_type: &str) -> bool {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    media_type == JSON_CONTENT_TYPE || media_type.ends_with("+json")
}

fn malformed_body(path: &str, error: &serde_json::Error) -> AppError {
    AppError::Internal(format!(
        "upstream returned a malformed JSON body for '{path}': {error}"
    ))
}

fn upstream_error(response: &UpstreamResponse) -> AppError {
    let details = response.body_text();
    let message = extract_error_message(&details)
        .or_else(|| (!details.is_empty()).then(|| details.clone()))
        .unwrap_or_else(|| format!("upstream responded with status {}", response.status));

    AppError::Upstream {
        status: response.status,
        message,
        details,
    }
}

/// Picks the most descriptive message out of an upstream error body.
fn extract_error_message(text: &str) -> Option<String> {
    let value = serde_json::from_str::<Value>(text).ok()?;
    let object = value.as_object()?;

    if let Some(message) = object
        .get("error")
        .and_then(Value::as_object)
        .and_then(|error| error.get("message"))
        .and_then(Value::as_str)
    {
        return Some(message.to_owned());
    }

    ["error", "message", "mensaje", "detail"]
        .iter()
        .filter_map(|key| object.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|message| !message.is_empty())
        .map(str::to_owned)
}
