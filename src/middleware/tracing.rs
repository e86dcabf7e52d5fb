use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, info_span, Instrument};

/// Request-level span and completion log for every HTTP request.
pub async fn observability_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let span = info_span!("http_request", %method, route = %route);
    let start = Instant::now();

    let response = next.run(request).instrument(span).await;

    info!(
        %method,
        route = %route,
        status = response.status().as_u16(),
        latency_ms = start.elapsed().as_millis() as u64,
        "request completed"
    );

    response
}
