// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Contacts and contact groups.

use super::string_or_number;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored contact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "telephone", alias = "numero")]
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A named group of contacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "contactCount")]
    pub contact_count: Option<u32>,
}
