// SPDX-FileCopyrightText: 2026 IAM Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the IAM bridge.
//!
//! This crate defines the provider contract every backend identity system
//! must satisfy, the value types that flow across it, and the error taxonomy
//! the gateway maps onto HTTP responses. Backend adapters depend on this
//! crate and nothing else in the workspace.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{ErrorKind, IamError};
pub use traits::IamProvider;
pub use types::{TokenGrant, TokenInfo, UserInfo};
