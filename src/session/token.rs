// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Read-only view of the session token's claims.
//!
//! The claims segment is base64url-decoded and parsed as JSON without any
//! signature check, so every value read here is a hint, never proof.

use super::coerce_identifier;
use base64::{
    engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD},
    Engine as _,
};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Why a token's claims could not be read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token does not have three segments")]
    Shape,

    #[error("claims segment is not valid base64")]
    Encoding,

    #[error("claims segment is not a JSON object")]
    NotAnObject,
}

/// Decoded claims of a session token.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenClaims(Map<String, Value>);

impl TokenClaims {
    /// A claim coerced to a non-empty string.
    pub fn field(&self, name: &str) -> Option<String> {
        self.0.get(name).and_then(coerce_identifier)
    }

    /// The embedded `exp` claim. Informational only.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.0
            .get("exp")
            .and_then(Value::as_i64)
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

/// Decode the middle segment of a JWT-shaped token.
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 || segments[1].is_empty() {
        return Err(TokenError::Shape);
    }

    let payload = segments[1].trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .map_err(|_| TokenError::Encoding)?;

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => Ok(TokenClaims(map)),
        _ => Err(TokenError::NotAnObject),
    }
}
