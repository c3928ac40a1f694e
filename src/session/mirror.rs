// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory mirror of user descriptors, keyed by session token.
//!
//! Written at login, dropped at logout or when the backend rejects the token.
//! The guard and the identity resolver only ever read it.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use std::sync::Arc;

/// Entries older than the session cookie lifetime are useless.
const MIRROR_TTL_DAYS: i64 = 7;

#[derive(Clone)]
struct MirrorEntry {
    descriptor_json: String,
    stored_at: DateTime<Utc>,
}

/// Shared per-instance descriptor cache. Cloning shares the same map.
#[derive(Clone, Default)]
pub struct UserMirror {
    entries: Arc<DashMap<String, MirrorEntry>>,
}

impl UserMirror {
    /// Remember the descriptor JSON returned with `token` at login.
    pub fn store(&self, token: &str, descriptor_json: &str) {
        let now = Utc::now();
        let cutoff = now - Duration::days(MIRROR_TTL_DAYS);
        self.entries.retain(|_, entry| entry.stored_at > cutoff);

        self.entries.insert(
            token.to_string(),
            MirrorEntry {
                descriptor_json: descriptor_json.to_string(),
                stored_at: now,
            },
        );
    }

    pub fn get(&self, token: &str) -> Option<String> {
        self.entries
            .get(token)
            .map(|entry| entry.descriptor_json.clone())
    }

    pub fn remove(&self, token: &str) {
        self.entries.remove(token);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
