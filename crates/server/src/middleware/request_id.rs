//! Request id propagation.
//!
//! Every request gets an id: either the `x-request-id` supplied by an
//! upstream proxy, or a fresh UUID v4. The id is recorded on the request
//! span (the trace layer's span maker in the crate root declares the
//! field), tagged on the Sentry scope for error correlation, and echoed in
//! the response headers so clients can quote it when reporting a failure.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// Header carrying the request id, inbound and outbound.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

fn inbound_id(request: &Request) -> Option<String> {
    let value = request.headers().get(REQUEST_ID_HEADER)?;
    value.to_str().ok().map(str::to_owned)
}

/// Middleware that ensures every request carries a request id.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = inbound_id(&request).unwrap_or_else(|| Uuid::new_v4().to_string());

    // The surrounding request span is opened by the trace layer, which
    // declares `request_id` as an empty field for us to fill in.
    Span::current().record("request_id", request_id.as_str());
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
