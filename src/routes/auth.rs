// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login, logout and password reset.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use crate::error::{AppError, Result};
use crate::forms::{ForgotPasswordForm, LoginForm};
use crate::services::BackendOutcome;
use crate::session::cookies::{clear_session_cookies, session_cookies};
use crate::session::{classify, PathClass, UserDescriptor, TOKEN_COOKIE};
use crate::AppState;

/// Where a fresh login lands when no usable destination was requested.
pub const DEFAULT_AFTER_LOGIN: &str = "/dashboard";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/forgot-password", post(forgot_password))
}

/// Query parameters for login.
#[derive(Deserialize)]
pub struct LoginParams {
    /// Page the visitor was sent away from by the session guard.
    #[serde(default)]
    redirect: Option<String>,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LoginResult {
    /// Where the dashboard should navigate next.
    pub redirect: String,
}

/// Authenticate against the gateway and open a session.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Query(params): Query<LoginParams>,
    Json(form): Json<LoginForm>,
) -> Result<(CookieJar, Json<LoginResult>)> {
    form.validate()?;

    let response = match state.backend.login(&form).await {
        BackendOutcome::Success(response) => response,
        BackendOutcome::Unauthorized => {
            tracing::info!("Login rejected by gateway");
            return Err(AppError::InvalidCredentials);
        }
        BackendOutcome::Failed(msg) => return Err(AppError::Backend(msg)),
    };

    if response.token.trim().is_empty() {
        return Err(AppError::Backend(
            "The SMS gateway did not open a session.".to_string(),
        ));
    }

    let descriptor_json = if response.user.is_object() {
        response.user.to_string()
    } else {
        "{}".to_string()
    };

    match UserDescriptor::from_json(&descriptor_json) {
        Ok(user) => tracing::info!(
            user_id = ?user.id,
            role = ?user.role,
            "Login successful"
        ),
        Err(e) => tracing::warn!(error = %e, "Login returned an unreadable user descriptor"),
    }

    state.mirror.store(&response.token, &descriptor_json);

    let [token_cookie, user_cookie] = session_cookies(
        &response.token,
        &descriptor_json,
        state.config.secure_cookies(),
    );
    let jar = jar.add(token_cookie).add(user_cookie);

    Ok((
        jar,
        Json(LoginResult {
            redirect: sanitize_redirect(params.redirect.as_deref()),
        }),
    ))
}

/// Close the session: drop both cookies and the mirror entry.
async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, StatusCode) {
    if let Some(token) = jar.get(TOKEN_COOKIE).map(|c| c.value().to_string()) {
        state.mirror.remove(&token);
    }

    let jar = clear_session_cookies()
        .into_iter()
        .fold(jar, |jar, cookie| jar.add(cookie));

    tracing::info!("Logout");
    (jar, StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
pub struct ForgotPasswordResult {
    pub message: String,
}

/// Ask the gateway to send a reset link.
async fn forgot_password(
    State(state): State<Arc<AppState>>,
    Json(form): Json<ForgotPasswordForm>,
) -> Result<(StatusCode, Json<ForgotPasswordResult>)> {
    form.validate()?;

    match state.backend.forgot_password(&form).await {
        // Same answer whether or not the address is known.
        BackendOutcome::Success(()) | BackendOutcome::Unauthorized => Ok((
            StatusCode::ACCEPTED,
            Json(ForgotPasswordResult {
                message: "If an account exists for this address, a reset link is on its way."
                    .to_string(),
            }),
        )),
        BackendOutcome::Failed(msg) => Err(AppError::Backend(msg)),
    }
}

/// Only same-origin dashboard paths are honored after login.
pub fn sanitize_redirect(raw: Option<&str>) -> String {
    let Some(candidate) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return DEFAULT_AFTER_LOGIN.to_string();
    };

    let path = candidate.split(['?', '#']).next().unwrap_or_default();
    let is_local = candidate.starts_with('/')
        && !candidate.starts_with("//")
        && !candidate.contains('\\')
        && !candidate.contains("://");

    if is_local && classify(path) == PathClass::Protected {
        candidate.to_string()
    } else {
        tracing::debug!(redirect = %candidate, "Ignoring unsafe post-login redirect");
        DEFAULT_AFTER_LOGIN.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_redirect_keeps_dashboard_paths() {
        assert_eq!(
            sanitize_redirect(Some("/dashboard/credits")),
            "/dashboard/credits"
        );
        assert_eq!(
            sanitize_redirect(Some("/dashboard/contacts?page=2")),
            "/dashboard/contacts?page=2"
        );
    }

    #[test]
    fn test_sanitize_redirect_defaults() {
        assert_eq!(sanitize_redirect(None), DEFAULT_AFTER_LOGIN);
        assert_eq!(sanitize_redirect(Some("  ")), DEFAULT_AFTER_LOGIN);
    }

    #[test]
    fn test_sanitize_redirect_rejects_offsite_and_loops() {
        for bad in [
            "https://evil.example.com/",
            "//evil.example.com",
            "/\\evil.example.com",
            "dashboard",
            "/login",
            "/login?redirect=%2Fdashboard",
            "/api/me",
            "/dashboard?next=https://evil.example.com",
        ] {
            assert_eq!(sanitize_redirect(Some(bad)), DEFAULT_AFTER_LOGIN, "{bad}");
        }
    }
}
