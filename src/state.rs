// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rollcall Contributors

use std::sync::Arc;

use crate::auth::SessionStore;
use crate::mailer::ActivationMailer;
use crate::storage::AccountDatabase;

/// Shared application state, constructed once per process and cloned per
/// request. Each collaborator is an explicit injected value.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountDatabase>,
    pub sessions: Arc<SessionStore>,
    pub mailer: Arc<dyn ActivationMailer>,
}

impl AppState {
    pub fn new(
        accounts: AccountDatabase,
        sessions: SessionStore,
        mailer: Arc<dyn ActivationMailer>,
    ) -> Self {
        Self {
            accounts: Arc::new(accounts),
            sessions: Arc::new(sessions),
            mailer,
        }
    }
}

/// Build a state over a throwaway database and a recording mailer.
#[cfg(test)]
pub fn test_state() -> (
    AppState,
    std::sync::Arc<crate::mailer::MockMailer>,
    tempfile::TempDir,
) {
    use crate::config::DEFAULT_SESSION_TTL_SECS;

    let dir = tempfile::TempDir::new().expect("temp dir");
    let accounts =
        AccountDatabase::open(&dir.path().join("accounts.redb")).expect("open test db");
    let mailer = crate::mailer::MockMailer::new();
    let state = AppState::new(
        accounts,
        SessionStore::new(DEFAULT_SESSION_TTL_SECS),
        mailer.clone(),
    );
    (state, mailer, dir)
}
