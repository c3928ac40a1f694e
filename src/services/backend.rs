// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! SMS gateway backend client.
//!
//! Handles:
//! - Login and password reset
//! - Account-scoped resources under `/client/{id}` and `/clients/{id}/...`
//! - Mapping every response to a [`BackendOutcome`]
//!
//! Nothing here redirects or touches cookies: a rejected token comes back as
//! `Unauthorized` and the route layer decides what to do with it.

use crate::forms::{ContactForm, ForgotPasswordForm, GroupForm, LoginForm, SendSmsForm};
use crate::models::{
    AccountProfile, ApiKey, Contact, CreditEntry, Document, Group, ListEnvelope, LoginResponse,
    SmsReceipt,
};
use crate::session::ClientId;
use anyhow::Context;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Result of one backend call.
#[derive(Debug)]
pub enum BackendOutcome<T> {
    Success(T),
    /// The backend rejected the bearer token (HTTP 401).
    Unauthorized,
    /// Anything else: network failure, non-401 error status, bad payload.
    /// The message is safe to show to the user.
    Failed(String),
}

impl<T> BackendOutcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> BackendOutcome<U> {
        match self {
            BackendOutcome::Success(value) => BackendOutcome::Success(f(value)),
            BackendOutcome::Unauthorized => BackendOutcome::Unauthorized,
            BackendOutcome::Failed(msg) => BackendOutcome::Failed(msg),
        }
    }
}

/// Error body shapes seen from the gateway.
#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// SMS gateway API client.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    /// Create a client for the gateway at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed building backend HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `/client/{id}`
    fn client_url(&self, client: &ClientId) -> String {
        self.url(&format!("/client/{}", urlencoding::encode(client.as_str())))
    }

    /// `/clients/{id}/{rest}`
    fn clients_url(&self, client: &ClientId, rest: &str) -> String {
        self.url(&format!(
            "/clients/{}/{}",
            urlencoding::encode(client.as_str()),
            rest
        ))
    }

    // ─── Authentication ──────────────────────────────────────

    /// Exchange credentials for a session token and user descriptor.
    pub async fn login(&self, form: &LoginForm) -> BackendOutcome<LoginResponse> {
        let request = self.http.post(self.url("/auth/login")).json(form);
        self.send_json(request).await
    }

    /// Ask the gateway to e-mail a password reset link.
    pub async fn forgot_password(&self, form: &ForgotPasswordForm) -> BackendOutcome<()> {
        let request = self
            .http
            .post(self.url("/auth/forgot-password"))
            .json(form);
        self.send_empty(request).await
    }

    // ─── Account ─────────────────────────────────────────────

    pub async fn get_account(
        &self,
        token: &str,
        client: &ClientId,
    ) -> BackendOutcome<AccountProfile> {
        let request = self.http.get(self.client_url(client)).bearer_auth(token);
        self.send_json(request).await
    }

    pub async fn credit_history(
        &self,
        token: &str,
        client: &ClientId,
    ) -> BackendOutcome<Vec<CreditEntry>> {
        let request = self
            .http
            .get(self.clients_url(client, "credits/history"))
            .bearer_auth(token);
        self.send_list(request).await
    }

    pub async fn api_key(&self, token: &str, client: &ClientId) -> BackendOutcome<ApiKey> {
        let request = self
            .http
            .get(self.clients_url(client, "api-key"))
            .bearer_auth(token);
        self.send_json(request).await
    }

    pub async fn regenerate_api_key(
        &self,
        token: &str,
        client: &ClientId,
    ) -> BackendOutcome<ApiKey> {
        let request = self
            .http
            .post(self.clients_url(client, "api-key/regenerate"))
            .bearer_auth(token);
        self.send_json(request).await
    }

    // ─── Contacts & groups ───────────────────────────────────

    pub async fn list_contacts(
        &self,
        token: &str,
        client: &ClientId,
    ) -> BackendOutcome<Vec<Contact>> {
        let request = self
            .http
            .get(self.clients_url(client, "contacts"))
            .bearer_auth(token);
        self.send_list(request).await
    }

    pub async fn create_contact(
        &self,
        token: &str,
        client: &ClientId,
        form: &ContactForm,
    ) -> BackendOutcome<Contact> {
        let request = self
            .http
            .post(self.clients_url(client, "contacts"))
            .bearer_auth(token)
            .json(form);
        self.send_json(request).await
    }

    pub async fn delete_contact(
        &self,
        token: &str,
        client: &ClientId,
        contact_id: &str,
    ) -> BackendOutcome<()> {
        let path = format!("contacts/{}", urlencoding::encode(contact_id));
        let request = self
            .http
            .delete(self.clients_url(client, &path))
            .bearer_auth(token);
        self.send_empty(request).await
    }

    pub async fn list_groups(&self, token: &str, client: &ClientId) -> BackendOutcome<Vec<Group>> {
        let request = self
            .http
            .get(self.clients_url(client, "groups"))
            .bearer_auth(token);
        self.send_list(request).await
    }

    pub async fn create_group(
        &self,
        token: &str,
        client: &ClientId,
        form: &GroupForm,
    ) -> BackendOutcome<Group> {
        let request = self
            .http
            .post(self.clients_url(client, "groups"))
            .bearer_auth(token)
            .json(form);
        self.send_json(request).await
    }

    // ─── Messaging & documents ───────────────────────────────

    pub async fn send_sms(
        &self,
        token: &str,
        client: &ClientId,
        form: &SendSmsForm,
    ) -> BackendOutcome<SmsReceipt> {
        let request = self
            .http
            .post(self.clients_url(client, "sms"))
            .bearer_auth(token)
            .json(form);
        self.send_json(request).await
    }

    /// Documentation index (PDF guides), not account-scoped.
    pub async fn documents(&self, token: &str) -> BackendOutcome<Vec<Document>> {
        let request = self.http.get(self.url("/documents")).bearer_auth(token);
        self.send_list(request).await
    }

    // ─── Plumbing ────────────────────────────────────────────

    async fn execute(&self, request: RequestBuilder) -> BackendOutcome<reqwest::Response> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, timeout = e.is_timeout(), "Backend request failed");
                let msg = if e.is_timeout() {
                    "The SMS gateway did not answer in time. Please try again."
                } else {
                    "The SMS gateway is unreachable. Please try again later."
                };
                return BackendOutcome::Failed(msg.to_string());
            }
        };

        let status = response.status();
        if status.is_success() {
            return BackendOutcome::Success(response);
        }

        if status == StatusCode::UNAUTHORIZED {
            tracing::info!(url = %response.url().path(), "Backend rejected session token");
            return BackendOutcome::Unauthorized;
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(status = status.as_u16(), body = %body, "Backend returned an error");
        BackendOutcome::Failed(failure_message(status, &body))
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> BackendOutcome<T> {
        match self.execute(request).await {
            BackendOutcome::Success(response) => match response.json::<T>().await {
                Ok(value) => BackendOutcome::Success(value),
                Err(e) => {
                    tracing::warn!(error = %e, "Backend JSON parse error");
                    BackendOutcome::Failed(
                        "The SMS gateway sent an unexpected response.".to_string(),
                    )
                }
            },
            BackendOutcome::Unauthorized => BackendOutcome::Unauthorized,
            BackendOutcome::Failed(msg) => BackendOutcome::Failed(msg),
        }
    }

    async fn send_list<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> BackendOutcome<Vec<T>> {
        self.send_json::<ListEnvelope<T>>(request)
            .await
            .map(ListEnvelope::into_vec)
    }

    async fn send_empty(&self, request: RequestBuilder) -> BackendOutcome<()> {
        self.execute(request).await.map(|_| ())
    }
}

/// Human-readable message for a failed call, preferring the gateway's own.
fn failure_message(status: StatusCode, body: &str) -> String {
    let from_body = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .filter(|m| !m.trim().is_empty());

    match from_body {
        Some(message) => message,
        None if status.is_server_error() => {
            "The SMS gateway is temporarily unavailable. Please try again later.".to_string()
        }
        None => format!("The SMS gateway refused the request (HTTP {}).", status.as_u16()),
    }
}
