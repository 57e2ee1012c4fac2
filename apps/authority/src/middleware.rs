use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::Response;
use grantdeck_core::{ANTI_FORGERY_HEADER, AppError};

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn require_anti_forgery_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if is_state_changing_method(request.method()) {
        let presented = request
            .headers()
            .get(ANTI_FORGERY_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        if !state.csrf_token.matches(presented) {
            tracing::warn!(path = %request.uri().path(), "anti-forgery check failed");
            return Err(AppError::Forbidden("CSRF verification failed.".to_owned()).into());
        }
    }

    Ok(next.run(request).await)
}

fn is_state_changing_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}
