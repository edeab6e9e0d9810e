// SPDX-FileCopyrightText: 2026 IAM Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the IAM bridge.
//!
//! Exposes the provider contract as a JSON REST API: session endpoints under
//! `/api/v1/auth`, user and role management under `/api/v1/users`, and an
//! unauthenticated `/health` check. Every failure is rendered through
//! [`ApiError`] as `{code, message, request_id}`.

pub mod auth;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod server;

pub use error::{ApiError, ErrorBody};
pub use middleware::REQUEST_ID_HEADER;
pub use server::{GatewayState, build_router, serve};
