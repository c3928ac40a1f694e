// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SMS Dashboard: web tier for the SMS gateway customer dashboard
//!
//! This crate serves the dashboard views, owns the session cookies, gates
//! protected pages behind the session guard, resolves which gateway account
//! a request acts on, and forwards account-scoped calls to the SMS gateway
//! backend.

pub mod config;
pub mod error;
pub mod forms;
pub mod middleware;
pub mod models;
pub mod notify;
pub mod pagination;
pub mod routes;
pub mod services;
pub mod session;

use config::Config;
use notify::Notifier;
use services::BackendClient;
use session::UserMirror;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub backend: BackendClient,
    pub mirror: UserMirror,
    pub notifier: Notifier,
}
