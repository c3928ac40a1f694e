// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session cookie construction and removal.

use super::{TOKEN_COOKIE, USER_COOKIE};
use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

const SESSION_TTL_DAYS: i64 = 7;

/// Cookies created at login.
///
/// `descriptor_json` is stored as is; the cookie jar percent-encodes values
/// when writing `Set-Cookie`. The token cookie is HttpOnly. The descriptor
/// cookie stays readable by the dashboard's scripts, which display the
/// account name from it.
pub fn session_cookies(token: &str, descriptor_json: &str, secure: bool) -> [Cookie<'static>; 2] {
    let token = Cookie::build((TOKEN_COOKIE, token.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::days(SESSION_TTL_DAYS))
        .build();

    let user = Cookie::build((USER_COOKIE, descriptor_json.to_string()))
        .http_only(false)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::days(SESSION_TTL_DAYS))
        .build();

    [token, user]
}

/// Removal cookies matching the paths used by [`session_cookies`].
pub fn clear_session_cookies() -> [Cookie<'static>; 2] {
    [TOKEN_COOKIE, USER_COOKIE].map(|name| {
        Cookie::build((name, ""))
            .path("/")
            .max_age(Duration::ZERO)
            .build()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_cookie_attributes() {
        let [token, user] = session_cookies("tok", r#"{"id":"1"}"#, true);
        assert_eq!(user.value(), r#"{"id":"1"}"#);

        let token = token.to_string();
        assert!(token.starts_with("authToken=tok"));
        assert!(token.contains("HttpOnly"));
        assert!(token.contains("Secure"));
        assert!(token.contains("SameSite=Lax"));
        assert!(token.contains("Path=/"));

        let user = user.to_string();
        assert!(user.starts_with("user="));
        assert!(!user.contains("HttpOnly"));
    }

    #[test]
    fn test_clear_session_cookies() {
        let cleared: Vec<String> = clear_session_cookies()
            .iter()
            .map(|c| c.to_string())
            .collect();

        assert!(cleared[0].starts_with("authToken="));
        assert!(cleared[1].starts_with("user="));
        for cookie in &cleared {
            assert!(cookie.contains("Max-Age=0"));
            assert!(cookie.contains("Path=/"));
        }
    }
}
