// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard page shells.
//!
//! Each page is a small HTML document naming its view; the dashboard's
//! scripts (served from `/static`) fill it in through the `/api` routes.

use crate::error::{AppError, Result};
use crate::session::{Session, UserDescriptor};
use crate::AppState;
use axum::{
    extract::{Path, Query},
    response::{Html, Redirect},
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use std::sync::Arc;

/// Sections of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardView {
    Overview,
    Contacts,
    Groups,
    Sms,
    Credits,
    ApiKey,
    Docs,
    Account,
}

impl DashboardView {
    pub const SECTIONS: [DashboardView; 7] = [
        DashboardView::Contacts,
        DashboardView::Groups,
        DashboardView::Sms,
        DashboardView::Credits,
        DashboardView::ApiKey,
        DashboardView::Docs,
        DashboardView::Account,
    ];

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::SECTIONS.into_iter().find(|v| v.slug() == slug)
    }

    pub fn slug(self) -> &'static str {
        match self {
            DashboardView::Overview => "overview",
            DashboardView::Contacts => "contacts",
            DashboardView::Groups => "groups",
            DashboardView::Sms => "sms",
            DashboardView::Credits => "credits",
            DashboardView::ApiKey => "api-key",
            DashboardView::Docs => "docs",
            DashboardView::Account => "account",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            DashboardView::Overview => "Overview",
            DashboardView::Contacts => "Contacts",
            DashboardView::Groups => "Groups",
            DashboardView::Sms => "Send SMS",
            DashboardView::Credits => "Credit history",
            DashboardView::ApiKey => "API key",
            DashboardView::Docs => "Documentation",
            DashboardView::Account => "Account",
        }
    }
}

/// Pages reachable without a session.
pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", get(login_page))
        .route("/forgot-password", get(forgot_password_page))
}

/// Pages behind the session guard.
pub fn dashboard_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/dashboard") }))
        .route("/dashboard", get(overview))
        .route("/dashboard/{section}", get(section))
}

#[derive(Deserialize)]
struct LoginPageParams {
    #[serde(default)]
    redirect: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

async fn login_page(Query(params): Query<LoginPageParams>) -> Html<String> {
    let notice = match params.error.as_deref() {
        Some("session_expired") => {
            r#"<p class="notice" role="alert">Your session has expired. Please sign in again.</p>"#
        }
        _ => "",
    };
    let redirect = params.redirect.as_deref().unwrap_or_default();

    let body = format!(
        r#"{notice}
    <form id="login-form" method="post" action="/auth/login" data-redirect="{redirect}">
      <label>Email <input type="email" name="email" required></label>
      <label>Password <input type="password" name="password" minlength="6" required></label>
      <button type="submit">Sign in</button>
    </form>
    <a href="/forgot-password">Forgot your password?</a>"#,
        redirect = escape_html(redirect),
    );

    render_page("Sign in", "login", None, &body)
}

async fn forgot_password_page() -> Html<String> {
    let body = r#"<form id="forgot-password-form" method="post" action="/auth/forgot-password">
      <label>Email <input type="email" name="email" required></label>
      <button type="submit">Send reset link</button>
    </form>
    <a href="/login">Back to sign in</a>"#;

    render_page("Reset password", "forgot-password", None, body)
}

async fn overview(Extension(session): Extension<Session>) -> Html<String> {
    render_dashboard(DashboardView::Overview, &session.user)
}

async fn section(
    Extension(session): Extension<Session>,
    Path(section): Path<String>,
) -> Result<Html<String>> {
    let view = DashboardView::from_slug(&section)
        .ok_or_else(|| AppError::NotFound(format!("Unknown dashboard section: {section}")))?;
    Ok(render_dashboard(view, &session.user))
}

fn render_dashboard(view: DashboardView, user: &UserDescriptor) -> Html<String> {
    let nav: String = DashboardView::SECTIONS
        .iter()
        .map(|v| {
            let current = if *v == view { r#" aria-current="page""# } else { "" };
            format!(
                r#"<a href="/dashboard/{}"{}>{}</a>"#,
                v.slug(),
                current,
                v.title()
            )
        })
        .collect();

    let body = format!(
        r#"<nav>{nav}<button id="logout" data-action="/auth/logout">Sign out</button></nav>
    <main id="app" data-view="{view}"></main>"#,
        view = view.slug(),
    );

    render_page(view.title(), view.slug(), Some(user), &body)
}

fn render_page(title: &str, view: &str, user: Option<&UserDescriptor>, body: &str) -> Html<String> {
    let account = user
        .map(|u| {
            format!(
                r#"<header class="account">{}</header>"#,
                escape_html(u.display_name())
            )
        })
        .unwrap_or_default();

    Html(format!(
        r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title} · SMS Dashboard</title>
    <link rel="stylesheet" href="/static/app.css">
    <script src="/static/app.js" defer></script>
  </head>
  <body data-view="{view}">
    {account}
    {body}
  </body>
</html>
"#,
        title = escape_html(title),
        view = escape_html(view),
    ))
}

/// Escape text for HTML element content and quoted attributes.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
