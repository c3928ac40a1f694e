// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The user descriptor mirrored into the `user` cookie.

use crate::models::string_or_number;
use serde::{Deserialize, Serialize};

/// Why a stored descriptor could not be read.
#[derive(Debug, thiserror::Error)]
pub enum DescriptorError {
    #[error("descriptor is not a JSON object: {0}")]
    Json(#[from] serde_json::Error),
}

/// Small record describing the logged-in account.
///
/// The backend is inconsistent about whether identifiers are strings or
/// numbers, so every field accepts both and is stored as a string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDescriptor {
    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(
        rename = "clientId",
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub client_id: Option<String>,
    /// Account type
    #[serde(
        rename = "typeCompte",
        default,
        deserialize_with = "string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub type_compte: Option<String>,
    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserDescriptor {
    /// Parse a descriptor from its JSON text, as held by the `user` cookie
    /// (once the cookie jar has decoded it) or by the mirror.
    pub fn from_json(raw: &str) -> Result<Self, DescriptorError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Account identifier carried by this descriptor: `clientId`, then
    /// `typeCompte`, then `id`.
    pub fn account_identifier(&self) -> Option<&str> {
        self.client_id
            .as_deref()
            .or(self.type_compte.as_deref())
            .or(self.id.as_deref())
    }

    /// Display name for page headers.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("account")
    }
}
