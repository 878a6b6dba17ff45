// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rollcall Contributors

//! One-time token activation.
//!
//! "Wrong token" and "already activated" are observably identical: both
//! fail [`UserError::InvalidToken`], because a consumed token's index entry
//! is gone. The consume-and-activate update is a single store transaction,
//! so concurrent attempts with the same token activate at most once. The
//! transaction runs on the blocking pool; it may have to wait for the
//! store's single write slot.

use std::sync::Arc;

use crate::error::UserError;
use crate::storage::{AccountDatabase, StoreError};

pub struct ActivationService {
    db: Arc<AccountDatabase>,
}

impl ActivationService {
    pub fn new(db: Arc<AccountDatabase>) -> Self {
        Self { db }
    }

    /// Consume an activation token, flipping its account to active and
    /// clearing the token.
    pub async fn activate(&self, token: &str) -> Result<(), UserError> {
        let db = Arc::clone(&self.db);
        let token = token.to_string();
        let activated = tokio::task::spawn_blocking(move || db.activate(&token))
            .await
            .map_err(StoreError::from)??;

        match activated {
            Some(account) => {
                tracing::info!(id = account.id, "account activated");
                Ok(())
            }
            None => Err(UserError::InvalidToken),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{AccountStatus, NewAccount};

    fn test_db() -> (Arc<AccountDatabase>, tempfile::TempDir) {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let db = AccountDatabase::open(&dir.path().join("accounts.redb")).expect("open db");
        (Arc::new(db), dir)
    }

    fn seed_pending(db: &AccountDatabase, token: &str) -> u64 {
        db.stage_account(NewAccount {
            username: "user1".to_string(),
            email: "user1@mail.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            activation_token: token.to_string(),
        })
        .unwrap()
        .commit()
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn activation_flips_status_and_clears_token() {
        let (db, _dir) = test_db();
        let id = seed_pending(&db, "aaaabbbbccccdddd");

        ActivationService::new(db.clone())
            .activate("aaaabbbbccccdddd")
            .await
            .unwrap();

        let account = db.find_by_id(id).unwrap().unwrap();
        assert_eq!(account.status, AccountStatus::Active);
        assert!(account.activation_token.is_none());
    }

    #[tokio::test]
    async fn second_activation_with_same_token_fails() {
        let (db, _dir) = test_db();
        seed_pending(&db, "aaaabbbbccccdddd");
        let service = ActivationService::new(db);

        service.activate("aaaabbbbccccdddd").await.unwrap();
        let err = service.activate("aaaabbbbccccdddd").await.unwrap_err();
        assert!(matches!(err, UserError::InvalidToken));
    }

    #[tokio::test]
    async fn wrong_token_fails_identically_to_consumed_token() {
        let (db, _dir) = test_db();
        seed_pending(&db, "aaaabbbbccccdddd");
        let service = ActivationService::new(db);

        let err = service.activate("0000111122223333").await.unwrap_err();
        assert!(matches!(err, UserError::InvalidToken));
    }
}
