// SPDX-FileCopyrightText: 2026 IAM Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request correlation and panic recovery.

use std::any::Any;
use std::backtrace::Backtrace;
use std::panic::AssertUnwindSafe;

use axum::Json;
use axum::extract::Request;
use axum::http::{self, HeaderName, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use futures::FutureExt;
use iambridge_core::ErrorKind;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::error::ErrorBody;

/// Correlation header read from the request and echoed on the response.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

tokio::task_local! {
    static REQUEST_ID: String;
}

/// Request id of the request being handled on this task, if any.
pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(Clone::clone).ok()
}

/// Generates a UUID v4 for requests that arrive without an id.
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        http::HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Scopes the request id for error bodies and converts a handler panic into
/// a 500 response.
pub async fn request_context(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    REQUEST_ID
        .scope(request_id, async move {
            match AssertUnwindSafe(next.run(request)).catch_unwind().await {
                Ok(response) => response,
                Err(panic) => {
                    let backtrace = Backtrace::force_capture();
                    tracing::error!(
                        request_id = current_request_id().unwrap_or_default(),
                        method = %method,
                        path,
                        panic = panic_message(panic.as_ref()),
                        %backtrace,
                        "handler panicked"
                    );
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(ErrorBody::new(ErrorKind::Transport, "internal server error")),
                    )
                        .into_response()
                }
            }
        })
        .await
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "unknown panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_uuids() {
        let request = http::Request::new(());
        let id = UuidRequestId.make_request_id(&request).unwrap();
        let value = id.header_value().to_str().unwrap();
        assert!(Uuid::parse_str(value).is_ok());
    }

    #[test]
    fn panic_payloads_are_readable() {
        let boxed: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(boxed.as_ref()), "boom");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("kaboom"));
        assert_eq!(panic_message(boxed.as_ref()), "kaboom");
        let boxed: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(boxed.as_ref()), "unknown panic payload");
    }

    #[tokio::test]
    async fn request_id_is_visible_inside_scope() {
        let seen = REQUEST_ID
            .scope("req-1".to_string(), async { current_request_id() })
            .await;
        assert_eq!(seen.as_deref(), Some("req-1"));
        assert_eq!(current_request_id(), None);
    }
}
