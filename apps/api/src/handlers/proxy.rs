use axum::body::Bytes;
use axum::extract::{Path, RawQuery, State};
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use tablero_application::{ForwardedHeader, ProxiedResponse, UpstreamBody};
use tablero_core::AppError;

use crate::error::ApiResult;
use crate::state::AppState;

const FORWARDED_HEADERS: [HeaderName; 2] = [AUTHORIZATION, COOKIE];

pub async fn proxy_get_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let proxied = state
        .proxy_service
        .forward_get(path.as_str(), query, forwarded_headers(&headers))
        .await?;

    Ok(into_response(proxied))
}

pub async fn proxy_post_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Response> {
    let upstream_body = upstream_body(&headers, body)?;
    let proxied = state
        .proxy_service
        .forward_post(
            path.as_str(),
            query,
            upstream_body,
            forwarded_headers(&headers),
        )
        .await?;

    Ok(into_response(proxied))
}

fn forwarded_headers(headers: &HeaderMap) -> Vec<ForwardedHeader> {
    FORWARDED_HEADERS
        .iter()
        .flat_map(|name| {
            headers
                .get_all(name)
                .iter()
                .map(move |value| ForwardedHeader::new(name.as_str(), value.as_bytes()))
        })
        .collect()
}

fn upstream_body(headers: &HeaderMap, body: Bytes) -> ApiResult<UpstreamBody> {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .trim();
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match media_type.as_str() {
        "application/json" => serde_json::from_slice::<Value>(&body)
            .map(UpstreamBody::Json)
            .map_err(|error| {
                AppError::Validation(format!("request body is not valid JSON: {error}")).into()
            }),
        "multipart/form-data" => Ok(UpstreamBody::Multipart {
            content_type: content_type.to_owned(),
            bytes: body.to_vec(),
        }),
        "" => Err(AppError::Validation("missing content type".to_owned()).into()),
        other => Err(AppError::Validation(format!("unsupported content type '{other}'")).into()),
    }
}

fn into_response(proxied: ProxiedResponse) -> Response {
    let status = StatusCode::from_u16(proxied.status).unwrap_or(StatusCode::OK);
    let content_type = HeaderValue::from_str(&proxied.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/json"));

    (status, [(CONTENT_TYPE, content_type)], proxied.body).into_response()
}
