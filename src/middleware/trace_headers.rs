use axum::{extract::Request, http::Response, middleware::Next, response::IntoResponse};

/// Middlware to trace request and response headers.
pub async fn trace_headers(req: Request, next: Next) -> impl IntoResponse {
    let incoming_headers = req.headers();
    tracing::trace!(method = %req.method(), uri = %req.uri(), ?incoming_headers, "Request headers");

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    let outgoing_headers = &parts.headers;
    tracing::trace!(status = %parts.status, ?outgoing_headers, "Response headers");

    Response::from_parts(parts, body)
}
