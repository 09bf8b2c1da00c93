//! # Request Stamping Middleware
//!
//! Gives every request an ID for log correlation. An incoming `X-Request-ID`
//! (from a proxy in front of the relay) is kept; otherwise a UUID is generated.
//! The ID is echoed back in the response's `X-Request-ID` header.
//!
//! Handlers can read it via `Extension<RequestStamp>`:
//!
//! ```rust,no_run
//! use axum::extract::Extension;
//! use lib_web::middleware::RequestStamp;
//!
//! async fn handler(Extension(stamp): Extension<RequestStamp>) -> String {
//!     format!("Request ID: {}", stamp.id)
//! }
//! ```

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use std::time::SystemTime;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest incoming request ID that is reused as-is.
const MAX_INCOMING_ID_LEN: usize = 128;

/// Request metadata for tracing and debugging.
#[derive(Clone, Debug)]
pub struct RequestStamp {
    /// Request identifier
    pub id: String,
    /// When the request reached the relay
    pub timestamp: SystemTime,
}

impl RequestStamp {
    fn new(id: String) -> Self {
        Self { id, timestamp: SystemTime::now() }
    }

    fn from_request(req: &Request) -> Self {
        let incoming = req
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty() && id.len() <= MAX_INCOMING_ID_LEN);

        match incoming {
            Some(id) => Self::new(id.to_string()),
            None => Self::new(Uuid::new_v4().to_string()),
        }
    }
}

/// Request stamping middleware.
pub async fn stamp_req(mut req: Request, next: Next) -> Response {
    let stamp = RequestStamp::from_request(&req);
    req.extensions_mut().insert(stamp.clone());

    let mut res = next.run(req).await;

    if let Ok(header_value) = HeaderValue::from_str(&stamp.id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, header_value);
    }

    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, routing::get, Extension, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/", get(|Extension(stamp): Extension<RequestStamp>| async move { stamp.id }))
            .layer(axum::middleware::from_fn(stamp_req))
    }

    #[tokio::test]
    async fn test_generates_request_id() {
        let res = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let id = res.headers().get(REQUEST_ID_HEADER).unwrap().to_str().unwrap().to_string();
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[tokio::test]
    async fn test_keeps_incoming_request_id() {
        let res = app()
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("X-Request-ID", "edge-7")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.headers().get(REQUEST_ID_HEADER).unwrap().to_str().unwrap(), "edge-7");
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"edge-7");
    }
}
