use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tablero_core::AppError;
use tracing::error;
use ts_rs::TS;

/// API error payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    error: String,
    details: String,
    status: u16,
}

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        Self(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::BAD_GATEWAY);

        let (summary, details) = match self.0 {
            AppError::Validation(details) => ("invalid request".to_owned(), details),
            AppError::NotFound(details) => ("not found".to_owned(), details),
            AppError::Unauthorized(details) => ("unauthorized".to_owned(), details),
            AppError::Forbidden(details) => ("forbidden".to_owned(), details),
            AppError::Unavailable(details) => ("upstream service unavailable".to_owned(), details),
            AppError::Upstream {
                message, details, ..
            } => (message, details),
            AppError::Internal(details) => {
                error!(%details, "internal error");
                ("internal server error".to_owned(), details)
            }
        };

        let payload = Json(ErrorResponse {
            error: summary,
            details,
            status: status.as_u16(),
        });

        (status, payload).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use serde_json::{Value, json};
    use tablero_core::AppError;

    use super::ApiError;

    async fn render(error: AppError) -> (StatusCode, Value) {
        let response = ApiError(error).into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_default();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn unavailable_renders_503_envelope() {
        let (status, body) = render(AppError::Unavailable("connection refused".to_owned())).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            body,
            json!({
                "error": "upstream service unavailable",
                "details": "connection refused",
                "status": 503,
            })
        );
    }

    #[tokio::test]
    async fn upstream_error_keeps_status_and_message() {
        let (status, body) = render(AppError::Upstream {
            status: 409,
            message: "cotización duplicada".to_owned(),
            details: "{\"error\":\"cotización duplicada\"}".to_owned(),
        })
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "cotización duplicada");
        assert_eq!(body["details"], "{\"error\":\"cotización duplicada\"}");
        assert_eq!(body["status"], 409);
    }

    #[tokio::test]
    async fn internal_error_renders_500() {
        let (status, body) = render(AppError::Internal("malformed body".to_owned())).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], 500);
    }

    #[tokio::test]
    async fn validation_error_renders_400() {
        let (status, body) = render(AppError::Validation("bad path".to_owned())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid request");
    }
}
