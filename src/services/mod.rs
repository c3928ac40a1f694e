// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - clients for external collaborators.

pub mod backend;

pub use backend::{BackendClient, BackendOutcome};
