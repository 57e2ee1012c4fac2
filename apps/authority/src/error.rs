use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use grantdeck_core::AppError;
use serde::Serialize;
use ts_rs::TS;

/// Failure envelope shared by every endpoint.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    success: bool,
    message: String,
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
        let (status, message) = match self.0 {
            AppError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::Conflict(message) => (StatusCode::CONFLICT, message),
            AppError::Forbidden(message) => (StatusCode::FORBIDDEN, message),
            AppError::Timeout(message) => (StatusCode::GATEWAY_TIMEOUT, message),
            AppError::Network(message)
            | AppError::Server(message)
            | AppError::Internal(message) => {
                tracing::error!(%message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        let payload = Json(ErrorResponse {
            success: false,
            message,
        });

        (status, payload).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;
