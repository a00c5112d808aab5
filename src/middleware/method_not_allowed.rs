use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::IntoResponse,
};

use crate::{
    error::{ApiError, ErrorVerbosityProvider, NotFoundError, NotFoundErrorType},
    state::ApiState,
};

/// Middleware to map axum's `MethodNotAllowed` rejection to a route [`NotFoundError`].
///
/// A path served under a different method is reported the same way as an unknown path.
pub async fn method_not_allowed(
    State(state): State<ApiState>,
    req: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();

    let resp = next.run(req).await;
    let status = resp.status();

    match status {
        StatusCode::METHOD_NOT_ALLOWED => {
            tracing::debug!(%method, %path, "Method not allowed");

            Err(NotFoundError::new(
                state.error_verbosity(),
                NotFoundErrorType::Route { method, path },
            )
            .into())
        }
        _ => Ok(resp),
    }
}
