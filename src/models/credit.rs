// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credit history.

use super::string_or_number;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One movement on the account's SMS credit balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreditEntry {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    /// Positive for purchases, negative for consumption
    #[serde(default)]
    pub amount: f64,
    #[serde(default, alias = "type")]
    pub kind: Option<String>,
    #[serde(default, alias = "createdAt", alias = "date")]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
