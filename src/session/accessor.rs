// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session storage access, injected into the guard and the resolver.

use super::{UserMirror, TOKEN_COOKIE, USER_COOKIE};
use axum::http::{header, HeaderMap};
use axum_extra::extract::cookie::CookieJar;

/// Raw reads of the three places session data lives.
///
/// Implementations return `None` for absent or empty values and never parse.
pub trait SessionAccessor {
    /// The bearer token from the `authToken` cookie.
    fn token(&self) -> Option<String>;

    /// The text of the `user` cookie, percent-decoded once. A value that
    /// cannot be percent-decoded is returned exactly as sent.
    fn user_cookie(&self) -> Option<String>;

    /// The plain-JSON descriptor held in the mirror, lowest priority.
    fn local_user(&self) -> Option<String>;
}

/// Session data carried by an incoming request.
pub struct RequestSession<'a> {
    jar: CookieJar,
    /// `user` value present in the header but dropped by the jar.
    undecodable_user: Option<String>,
    mirror: &'a UserMirror,
}

impl<'a> RequestSession<'a> {
    pub fn new(headers: &HeaderMap, mirror: &'a UserMirror) -> Self {
        let jar = CookieJar::from_headers(headers);
        let undecodable_user = match jar.get(USER_COOKIE) {
            Some(_) => None,
            None => raw_cookie(headers, USER_COOKIE),
        };
        if undecodable_user.is_some() {
            tracing::debug!("User cookie is not valid percent-encoding");
        }

        Self {
            jar,
            undecodable_user,
            mirror,
        }
    }

    fn cookie(&self, name: &str) -> Option<String> {
        self.jar
            .get(name)
            .map(|c| c.value().to_string())
            .filter(|v| !v.trim().is_empty())
    }
}

/// Undecoded value of cookie `name` straight from the `Cookie` headers.
fn raw_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl SessionAccessor for RequestSession<'_> {
    fn token(&self) -> Option<String> {
        self.cookie(TOKEN_COOKIE)
    }

    fn user_cookie(&self) -> Option<String> {
        self.cookie(USER_COOKIE)
            .or_else(|| self.undecodable_user.clone())
    }

    fn local_user(&self) -> Option<String> {
        self.token().and_then(|token| self.mirror.get(&token))
    }
}

/// Fixed session values, for callers that already hold them (and tests).
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    pub token: Option<String>,
    pub user_cookie: Option<String>,
    pub local_user: Option<String>,
}

impl StaticSession {
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_user_cookie(mut self, raw: impl Into<String>) -> Self {
        self.user_cookie = Some(raw.into());
        self
    }

    pub fn with_local_user(mut self, raw: impl Into<String>) -> Self {
        self.local_user = Some(raw.into());
        self
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.trim().is_empty())
}

impl SessionAccessor for StaticSession {
    fn token(&self) -> Option<String> {
        non_empty(&self.token)
    }

    fn user_cookie(&self) -> Option<String> {
        non_empty(&self.user_cookie)
    }

    fn local_user(&self) -> Option<String> {
        non_empty(&self.local_user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(cookie: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static(cookie));
        headers
    }

    #[test]
    fn test_request_session_reads_cookies_and_mirror() {
        let headers = headers("authToken=tok123; user=%7B%22id%22%3A%221%22%7D");
        let mirror = UserMirror::default();
        mirror.store("tok123", r#"{"clientId":"55"}"#);

        let session = RequestSession::new(&headers, &mirror);

        assert_eq!(session.token().as_deref(), Some("tok123"));
        assert_eq!(session.user_cookie().as_deref(), Some(r#"{"id":"1"}"#));
        assert_eq!(session.local_user().as_deref(), Some(r#"{"clientId":"55"}"#));
    }

    #[test]
    fn test_user_cookie_is_decoded_once() {
        // `%2522` is the encoding of the literal text `%22`.
        let headers = headers("user=%7B%22name%22%3A%22Remise%2050%2522%22%7D");
        let mirror = UserMirror::default();

        let session = RequestSession::new(&headers, &mirror);

        assert_eq!(
            session.user_cookie().as_deref(),
            Some(r#"{"name":"Remise 50%22"}"#)
        );
    }

    #[test]
    fn test_undecodable_user_cookie_is_kept_raw() {
        let headers = headers("authToken=tok; user=%7B%FF");
        let mirror = UserMirror::default();

        let session = RequestSession::new(&headers, &mirror);

        assert_eq!(session.user_cookie().as_deref(), Some("%7B%FF"));
    }

    #[test]
    fn test_empty_cookie_counts_as_missing() {
        let headers = headers("authToken=; user=");
        let mirror = UserMirror::default();

        let session = RequestSession::new(&headers, &mirror);

        assert_eq!(session.token(), None);
        assert_eq!(session.user_cookie(), None);
        assert_eq!(session.local_user(), None);
    }
}
