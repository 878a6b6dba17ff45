// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rollcall Contributors

//! Transactional account registration.
//!
//! The defining property: registration is atomic across storage and
//! notification. The account row is staged inside an open write
//! transaction, the activation mail is dispatched, and only a successful
//! dispatch commits. A dispatch failure aborts the transaction, so no row,
//! index entry, or token survives a failed registration.
//!
//! The store has a single writer, so every transaction acquisition and
//! commit runs on the blocking pool; waiting on the write slot must not
//! occupy an async worker while another registration's mail is in flight.

use std::sync::Arc;

use crate::auth::password::hash_password;
use crate::auth::tokens::generate_token;
use crate::config::ACTIVATION_TOKEN_LEN;
use crate::error::UserError;
use crate::mailer::ActivationMailer;
use crate::storage::accounts::normalize_email;
use crate::storage::{AccountDatabase, NewAccount, StoreError, StoredAccount};

pub struct RegistrationService {
    db: Arc<AccountDatabase>,
    mailer: Arc<dyn ActivationMailer>,
}

impl RegistrationService {
    pub fn new(db: Arc<AccountDatabase>, mailer: Arc<dyn ActivationMailer>) -> Self {
        Self { db, mailer }
    }

    /// Register a new account.
    ///
    /// New accounts are always pending with a fresh 16-character activation
    /// token; any caller-supplied lifecycle hint was already dropped at the
    /// API boundary. Inputs are assumed syntactically valid (upstream
    /// contract); email uniqueness is enforced by the store inside the
    /// staging transaction.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<StoredAccount, UserError> {
        let email = normalize_email(email);
        let password_hash = hash_password(password)?;
        let token = generate_token(ACTIVATION_TOKEN_LEN);

        let db = Arc::clone(&self.db);
        let new = NewAccount {
            username: username.to_string(),
            email: email.clone(),
            password_hash,
            activation_token: token.clone(),
        };
        let staged = tokio::task::spawn_blocking(move || db.stage_account(new))
            .await
            .map_err(StoreError::from)?
            .map_err(|e| match e {
                StoreError::AlreadyExists(_) => UserError::EmailInUse,
                other => UserError::from(other),
            })?;

        match self.mailer.send_activation(&email, &token).await {
            Ok(()) => {
                let account = tokio::task::spawn_blocking(move || staged.commit())
                    .await
                    .map_err(StoreError::from)??;
                tracing::info!(id = account.id, "account registered, pending activation");
                Ok(account)
            }
            Err(e) => {
                tracing::warn!(error = %e, "activation mail dispatch failed, rolling back");
                tokio::task::spawn_blocking(move || staged.abort())
                    .await
                    .map_err(StoreError::from)??;
                Err(UserError::DispatchFailure)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::verify_password;
    use crate::mailer::MockMailer;
    use crate::storage::AccountStatus;

    fn test_db() -> (Arc<AccountDatabase>, tempfile::TempDir) {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let db = AccountDatabase::open(&dir.path().join("accounts.redb")).expect("open db");
        (Arc::new(db), dir)
    }

    #[tokio::test]
    async fn register_creates_pending_account_with_16_char_token() {
        let (db, _dir) = test_db();
        let mailer = MockMailer::new();
        let service = RegistrationService::new(db, mailer.clone());

        let account = service
            .register("user1", "user1@mail.com", "P4ssword")
            .await
            .unwrap();

        assert_eq!(account.status, AccountStatus::Pending);
        let token = account.activation_token.as_deref().unwrap();
        assert_eq!(token.len(), 16);
        // The dispatched token matches the persisted one.
        assert_eq!(mailer.last_token().as_deref(), Some(token));
        // Raw password is never stored; the hash verifies it.
        assert_ne!(account.password_hash, "P4ssword");
        assert!(verify_password("P4ssword", &account.password_hash));
    }

    #[tokio::test]
    async fn dispatch_failure_rolls_back_and_leaves_no_row() {
        let (db, _dir) = test_db();
        let mailer = MockMailer::new();
        mailer.set_failing(true);
        let service = RegistrationService::new(db.clone(), mailer);

        let err = service
            .register("user1", "user1@mail.com", "P4ssword")
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::DispatchFailure));
        assert!(db.find_by_email("user1@mail.com").unwrap().is_none());
    }

    #[tokio::test]
    async fn registration_succeeds_after_a_failed_attempt_with_same_email() {
        let (db, _dir) = test_db();
        let mailer = MockMailer::new();
        let service = RegistrationService::new(db, mailer.clone());

        mailer.set_failing(true);
        service
            .register("user1", "user1@mail.com", "P4ssword")
            .await
            .unwrap_err();

        // No residue from the failed attempt: the same email registers fine.
        mailer.set_failing(false);
        let account = service
            .register("user1", "user1@mail.com", "P4ssword")
            .await
            .unwrap();
        assert_eq!(account.email, "user1@mail.com");
    }

    #[tokio::test]
    async fn duplicate_email_fails_without_dispatching() {
        let (db, _dir) = test_db();
        let mailer = MockMailer::new();
        let service = RegistrationService::new(db, mailer.clone());

        service
            .register("user1", "user1@mail.com", "P4ssword")
            .await
            .unwrap();
        let err = service
            .register("other", "user1@mail.com", "P4ssword")
            .await
            .unwrap_err();

        assert!(matches!(err, UserError::EmailInUse));
        assert_eq!(mailer.sent().len(), 1);
    }

    #[tokio::test]
    async fn email_is_normalized_before_storage_and_dispatch() {
        let (db, _dir) = test_db();
        let mailer = MockMailer::new();
        let service = RegistrationService::new(db, mailer.clone());

        let account = service
            .register("user1", "  User1@Mail.COM ", "P4ssword")
            .await
            .unwrap();
        assert_eq!(account.email, "user1@mail.com");
        assert_eq!(mailer.sent()[0].0, "user1@mail.com");
    }

    #[tokio::test]
    async fn staged_registration_does_not_block_the_async_worker() {
        let (db, _dir) = test_db();
        let mailer = MockMailer::new();
        let service = RegistrationService::new(db.clone(), mailer);

        // A competing writer queued behind the in-flight registration; with
        // all store writes on the blocking pool, this single-threaded
        // runtime still drives the registration to completion.
        let contender = {
            let db = db.clone();
            tokio::task::spawn_blocking(move || db.update_username(9999, "nobody"))
        };

        service
            .register("user1", "user1@mail.com", "P4ssword")
            .await
            .unwrap();

        // The contender targets a missing id; it completes with NotFound
        // once the registration's transaction releases the write slot.
        let err = contender.await.unwrap().unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }
}
