// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Resolution of the gateway account a request acts on.
//!
//! Sources are consulted in a fixed order and the first non-empty value wins:
//!
//! 1. `id` in the token claims
//! 2. `idclients`, `clientId`, `client_id`, `client`, `cid`, `idclient`,
//!    `typeCompte`, `sub` in the token claims
//! 3. `clientId`, then `typeCompte`, then `id` in the `user` cookie
//! 4. the same three fields in the descriptor mirror
//!
//! A source that is missing or fails to parse is skipped. `typeCompte` is an
//! account type rather than an identifier, but existing sessions rely on it
//! as a fallback, so it stays in the chain.

use super::{decode_claims, RequestSession, SessionAccessor, UserDescriptor};
use crate::error::AppError;
use crate::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Claim names tried after `id`, in order.
const CLAIM_FALLBACK_FIELDS: [&str; 8] = [
    "idclients",
    "clientId",
    "client_id",
    "client",
    "cid",
    "idclient",
    "typeCompte",
    "sub",
];

/// Canonical account identifier used to address backend resources.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ClientId(String);

impl ClientId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn from_claims(session: &dyn SessionAccessor) -> Option<String> {
    let token = session.token()?;
    let claims = match decode_claims(&token) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::debug!(error = %err, "Token claims unreadable, skipping");
            return None;
        }
    };

    if let Some(exp) = claims.expires_at().filter(|exp| *exp < chrono::Utc::now()) {
        tracing::debug!(%exp, "Token is past its exp claim, the gateway will decide");
    }

    claims
        .field("id")
        .or_else(|| CLAIM_FALLBACK_FIELDS.iter().find_map(|name| claims.field(name)))
}

fn from_descriptor(raw: Option<String>, source: &'static str) -> Option<String> {
    let raw = raw?;
    match UserDescriptor::from_json(&raw) {
        Ok(user) => user.account_identifier().map(str::to_string),
        Err(err) => {
            tracing::debug!(source, error = %err, "User descriptor unreadable, skipping");
            None
        }
    }
}

/// Resolve the account identifier, or `None` when every source is empty.
pub fn resolve_client_id(session: &dyn SessionAccessor) -> Option<ClientId> {
    from_claims(session)
        .or_else(|| from_descriptor(session.user_cookie(), "cookie"))
        .or_else(|| from_descriptor(session.local_user(), "mirror"))
        .map(ClientId)
}

/// Like [`resolve_client_id`], but an unresolved identity is a
/// [`AppError::LoginRequired`], which responds with a redirect to `/login`.
pub fn require_client_id(session: &dyn SessionAccessor) -> Result<ClientId, AppError> {
    resolve_client_id(session).ok_or_else(|| {
        tracing::info!("No account identity in session, login required");
        AppError::LoginRequired
    })
}

/// Identity and credential for a backend call, extracted from the request.
#[derive(Debug, Clone)]
pub struct Account {
    pub client_id: ClientId,
    pub token: String,
}

impl FromRequestParts<Arc<AppState>> for Account {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let session = RequestSession::new(&parts.headers, &state.mirror);

        let client_id = require_client_id(&session)?;
        let token = session.token().ok_or(AppError::LoginRequired)?;

        Ok(Account { client_id, token })
    }
}
