// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account-level backend payloads.

use super::string_or_number;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response of `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "authToken", alias = "accessToken")]
    pub token: String,
    /// Kept as raw JSON so the cookie mirrors exactly what the backend sent.
    #[serde(default)]
    pub user: Value,
}

/// Account profile from `GET /client/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountProfile {
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "typeCompte", default)]
    pub type_compte: Option<String>,
    /// Remaining SMS credits
    #[serde(default, alias = "credits", alias = "solde")]
    pub balance: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The account's gateway API key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKey {
    #[serde(alias = "apiKey", alias = "api_key")]
    pub key: String,
    #[serde(default, alias = "createdAt")]
    pub created_at: Option<String>,
}

/// Gateway acknowledgement for a send request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmsReceipt {
    #[serde(default)]
    pub accepted: Option<u32>,
    #[serde(default, alias = "messageIds")]
    pub message_ids: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Entry of the documentation index (PDF guides).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
}
