// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models exchanged with the SMS gateway backend.

pub mod account;
pub mod contact;
pub mod credit;

pub use account::{AccountProfile, ApiKey, Document, LoginResponse, SmsReceipt};
pub use contact::{Contact, Group};
pub use credit::CreditEntry;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// List responses come either bare or wrapped in `{ "data": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListEnvelope<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> ListEnvelope<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            ListEnvelope::Bare(items) => items,
            ListEnvelope::Wrapped { data } => data,
        }
    }
}

/// Accept a string or a number and keep it as a string.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(crate::session::coerce_identifier))
}
