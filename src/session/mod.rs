// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session handling: cookie contract, session guard and account identity.
//!
//! The session is two cookies set at login, `authToken` (the backend's bearer
//! token) and `user` (a URL-encoded JSON descriptor of the account). Nothing
//! here verifies the token; the backend does that on every call.

pub mod accessor;
pub mod cookies;
pub mod descriptor;
pub mod guard;
pub mod identity;
pub mod mirror;
pub mod token;

pub use accessor::{RequestSession, SessionAccessor, StaticSession};
pub use descriptor::UserDescriptor;
pub use guard::{classify, evaluate, GuardMachine, GuardState, GuardVerdict, GuardView, PathClass};
pub use identity::{require_client_id, resolve_client_id, Account, ClientId};
pub use mirror::UserMirror;
pub use token::{decode_claims, TokenClaims};

use serde_json::Value;

/// Cookie holding the bearer token.
pub const TOKEN_COOKIE: &str = "authToken";
/// Cookie holding the URL-encoded user descriptor.
pub const USER_COOKIE: &str = "user";

/// A session that passed the guard.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: UserDescriptor,
}

/// Coerce a JSON scalar into an identifier string.
///
/// Strings count when they are not blank, numbers always count. Anything else
/// (null, booleans, arrays, objects) yields nothing.
pub(crate) fn coerce_identifier(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_identifier() {
        assert_eq!(coerce_identifier(&json!("42")), Some("42".to_string()));
        assert_eq!(coerce_identifier(&json!(700001)), Some("700001".to_string()));
        assert_eq!(coerce_identifier(&json!("  ")), None);
        assert_eq!(coerce_identifier(&json!(null)), None);
        assert_eq!(coerce_identifier(&json!(true)), None);
        assert_eq!(coerce_identifier(&json!({"id": 1})), None);
    }
}
