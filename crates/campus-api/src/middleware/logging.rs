//! Request/response logging middleware.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::info;

/// Logs request method, path, status, and duration.
///
/// Only the path is logged: invitation tokens travel in path segments, so
/// they are masked before logging.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = redact_path(request.uri().path());
    let start = Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    info!(
        method = %method,
        path = %path,
        status = %status.as_u16(),
        duration_ms = %duration.as_millis(),
        "HTTP request"
    );

    response
}

/// Replaces the token segment of `/api/invitations/{token}[/...]`.
fn redact_path(path: &str) -> String {
    const PREFIX: &str = "/api/invitations/";
    match path.strip_prefix(PREFIX) {
        Some(rest) => match rest.split_once('/') {
            Some((_, tail)) => format!("{PREFIX}<token>/{tail}"),
            None => format!("{PREFIX}<token>"),
        },
        None => path.to_string(),
    }
}
