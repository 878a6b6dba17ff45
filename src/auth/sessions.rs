// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rollcall Contributors

//! Bearer session tokens.
//!
//! Each successful authentication issues a fresh opaque token bound to one
//! account id; tokens are never reused across logins. Verification is an
//! exact lookup: unknown, malformed, or expired input yields `None`, never
//! an error. The store is an explicit injected value owned by `AppState`,
//! not a process-wide singleton.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use crate::auth::tokens::generate_token;
use crate::config::SESSION_TOKEN_LEN;

struct Session {
    account_id: u64,
    issued_at: DateTime<Utc>,
}

/// In-memory token → account id store with a fixed TTL.
pub struct SessionStore {
    entries: RwLock<HashMap<String, Session>>,
    ttl: Duration,
}

impl SessionStore {
    /// Create a store whose tokens expire `ttl_secs` after issuance.
    pub fn new(ttl_secs: i64) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: Duration::seconds(ttl_secs),
        }
    }

    /// Issue a fresh token bound to `account_id`.
    pub async fn issue(&self, account_id: u64) -> String {
        let token = generate_token(SESSION_TOKEN_LEN);
        let session = Session {
            account_id,
            issued_at: Utc::now(),
        };
        self.entries.write().await.insert(token.clone(), session);
        token
    }

    /// Resolve a token to its account id, or `None` for unknown, malformed,
    /// or expired tokens. Expired entries are evicted on sight.
    pub async fn verify(&self, token: &str) -> Option<u64> {
        {
            let entries = self.entries.read().await;
            let session = entries.get(token)?;
            if Utc::now() - session.issued_at < self.ttl {
                return Some(session.account_id);
            }
        }
        self.entries.write().await.remove(token);
        None
    }
}
