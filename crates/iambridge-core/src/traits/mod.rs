// SPDX-FileCopyrightText: 2026 IAM Bridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trait definitions for pluggable identity backends.

pub mod provider;

pub use provider::IamProvider;
