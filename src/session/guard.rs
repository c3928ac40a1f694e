// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session guard for dashboard navigation.
//!
//! Every path is either public or protected. A protected path renders only
//! when both session cookies are present and the descriptor parses; otherwise
//! the visitor is sent to the login page. The verdict depends on nothing but
//! the path and the session data, so asking twice gives the same answer.

use super::{Session, SessionAccessor, UserDescriptor};

/// Login entry point.
pub const LOGIN_PATH: &str = "/login";
/// Redirect target for a session that exists but cannot be read.
pub const SESSION_EXPIRED_REDIRECT: &str = "/login?error=session_expired";

/// Exact paths (and their sub-paths) reachable without a session.
const PUBLIC_PATHS: &[&str] = &[
    "/login",
    "/forgot-password",
    "/auth",
    "/health",
    "/favicon.ico",
    "/robots.txt",
];

/// Prefixes reachable without a session.
const PUBLIC_PREFIXES: &[&str] = &["/static/", "/api/"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathClass {
    Public,
    Protected,
}

/// Classify a request path.
pub fn classify(path: &str) -> PathClass {
    let is_public_path = PUBLIC_PATHS.iter().any(|public| {
        path == *public
            || path
                .strip_prefix(public)
                .is_some_and(|rest| rest.starts_with('/'))
    });
    let is_public_prefix = path == "/api" || PUBLIC_PREFIXES.iter().any(|p| path.starts_with(p));

    if is_public_path || is_public_prefix {
        PathClass::Public
    } else {
        PathClass::Protected
    }
}

/// Outcome of a guard check.
#[derive(Debug, Clone)]
pub enum GuardVerdict {
    /// Public path: render without looking at the session.
    Public,
    /// Protected path with a usable session.
    Render(Session),
    /// Send the visitor here instead.
    Redirect(String),
}

/// `/login?redirect=<path[?query]>` for a visitor without a session.
pub fn login_redirect_for(path: &str, query: Option<&str>) -> String {
    let destination = match query.filter(|q| !q.is_empty()) {
        Some(q) => format!("{path}?{q}"),
        None => path.to_string(),
    };
    format!("{LOGIN_PATH}?redirect={}", urlencoding::encode(&destination))
}

/// Decide what a navigation to `path` should do.
pub fn evaluate(path: &str, query: Option<&str>, session: &dyn SessionAccessor) -> GuardVerdict {
    if classify(path) == PathClass::Public {
        return GuardVerdict::Public;
    }

    let (Some(token), Some(raw_user)) = (session.token(), session.user_cookie()) else {
        tracing::debug!(path, "No session on protected path, redirecting to login");
        return GuardVerdict::Redirect(login_redirect_for(path, query));
    };

    match UserDescriptor::from_json(&raw_user) {
        Ok(user) => GuardVerdict::Render(Session { token, user }),
        Err(err) => {
            tracing::warn!(path, error = %err, "Unreadable user cookie, treating session as expired");
            GuardVerdict::Redirect(SESSION_EXPIRED_REDIRECT.to_string())
        }
    }
}

/// Guard state for one navigation.
#[derive(Debug, Clone)]
pub enum GuardState {
    /// Navigation started, session not read yet.
    Pending,
    /// Public path, nothing to check.
    Public,
    Authenticated(Session),
    Unauthenticated { redirect: String },
}

/// What a view layer should show for the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardView<'a> {
    /// Neutral placeholder: neither protected content nor the login page.
    Loading,
    Content,
    Redirect(&'a str),
}

/// Stateful wrapper around [`evaluate`] for view layers that render before
/// the session has been read.
///
/// `navigate` always returns to `Pending`; `resolve` settles a pending
/// navigation once and is a no-op afterwards.
#[derive(Debug, Clone)]
pub struct GuardMachine {
    path: String,
    query: Option<String>,
    state: GuardState,
}

impl GuardMachine {
    pub fn new(path: &str, query: Option<&str>) -> Self {
        Self {
            path: path.to_string(),
            query: query.map(str::to_string),
            state: GuardState::Pending,
        }
    }

    /// Start a new navigation.
    pub fn navigate(&mut self, path: &str, query: Option<&str>) {
        self.path = path.to_string();
        self.query = query.map(str::to_string);
        self.state = GuardState::Pending;
    }

    /// Read the session and settle the current navigation.
    pub fn resolve(&mut self, session: &dyn SessionAccessor) -> &GuardState {
        if matches!(self.state, GuardState::Pending) {
            self.state = match evaluate(&self.path, self.query.as_deref(), session) {
                GuardVerdict::Public => GuardState::Public,
                GuardVerdict::Render(session) => GuardState::Authenticated(session),
                GuardVerdict::Redirect(redirect) => GuardState::Unauthenticated { redirect },
            };
        }
        &self.state
    }

    pub fn state(&self) -> &GuardState {
        &self.state
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn view(&self) -> GuardView<'_> {
        match &self.state {
            GuardState::Pending => GuardView::Loading,
            GuardState::Public | GuardState::Authenticated(_) => GuardView::Content,
            GuardState::Unauthenticated { redirect } => GuardView::Redirect(redirect),
        }
    }
}
