//! API error type. Every failure is rendered as `{"detail": "<message>"}`.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use promptsmith_core::history::HistoryError;
use promptsmith_providers::GenerateError;

#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, detail)
    }

    /// 500 with the generation failure prefix.
    pub fn generation(detail: impl std::fmt::Display) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Ошибка генерации: {detail}"),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

impl From<GenerateError> for ApiError {
    fn from(err: GenerateError) -> Self {
        if err.is_client_error() {
            ApiError::bad_request(err.to_string())
        } else {
            error!(error = %err, "generation failed");
            ApiError::generation(err)
        }
    }
}

impl From<HistoryError> for ApiError {
    fn from(err: HistoryError) -> Self {
        error!(error = %err, "request log failure");
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptsmith_providers::UpstreamError;

    #[test]
    fn test_client_errors_are_400() {
        let err = ApiError::from(GenerateError::MissingCredential);
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.detail, "API ключ не указан");
    }

    #[test]
    fn test_upstream_failure_is_500_with_prefix() {
        let err = ApiError::from(GenerateError::GenerationFailed(UpstreamError::Status {
            status: 502,
            body: "bad gateway".into(),
        }));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.detail, "Ошибка генерации: HTTP 502: bad gateway");
    }
}
