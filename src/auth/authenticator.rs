// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rollcall Contributors

//! Credential verification against the account store.

use crate::auth::password::verify_password;
use crate::error::UserError;
use crate::storage::accounts::normalize_email;
use crate::storage::AccountDatabase;

/// The resolved identity of an authenticated caller.
///
/// Carries only what downstream authorization needs: never the hash, never
/// the activation token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    pub id: u64,
    pub username: String,
}

/// Verifies email + password and enforces the active-account policy.
pub struct CredentialAuthenticator<'a> {
    db: &'a AccountDatabase,
}

impl<'a> CredentialAuthenticator<'a> {
    pub fn new(db: &'a AccountDatabase) -> Self {
        Self { db }
    }

    /// Authenticate an email + password pair.
    ///
    /// Unknown email and wrong password both yield
    /// [`UserError::InvalidCredentials`] so callers cannot tell which case
    /// occurred. A correct password on a pending account yields
    /// [`UserError::AccountInactive`].
    pub fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedIdentity, UserError> {
        let account = self
            .db
            .find_by_email(&normalize_email(email))?
            .ok_or(UserError::InvalidCredentials)?;

        if !verify_password(password, &account.password_hash) {
            return Err(UserError::InvalidCredentials);
        }

        if !account.is_active() {
            return Err(UserError::AccountInactive);
        }

        Ok(AuthenticatedIdentity {
            id: account.id,
            username: account.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use crate::storage::{AccountDatabase, NewAccount};

    fn seed_account(db: &AccountDatabase, active: bool) -> u64 {
        let staged = db
            .stage_account(NewAccount {
                username: "user1".to_string(),
                email: "user1@mail.com".to_string(),
                password_hash: hash_password("P4ssword").unwrap(),
                activation_token: "aaaabbbbccccdddd".to_string(),
            })
            .unwrap();
        let account = staged.commit().unwrap();
        if active {
            db.activate("aaaabbbbccccdddd").unwrap();
        }
        account.id
    }

    fn test_db() -> (AccountDatabase, tempfile::TempDir) {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let db = AccountDatabase::open(&dir.path().join("accounts.redb")).expect("open db");
        (db, dir)
    }

    #[test]
    fn valid_credentials_yield_identity_only() {
        let (db, _dir) = test_db();
        let id = seed_account(&db, true);

        let identity = CredentialAuthenticator::new(&db)
            .authenticate("user1@mail.com", "P4ssword")
            .unwrap();
        assert_eq!(identity, AuthenticatedIdentity {
            id,
            username: "user1".to_string(),
        });
    }

    #[test]
    fn unknown_email_and_wrong_password_are_indistinguishable() {
        let (db, _dir) = test_db();
        seed_account(&db, true);
        let authenticator = CredentialAuthenticator::new(&db);

        let unknown = authenticator
            .authenticate("user1000@mail.com", "P4ssword")
            .unwrap_err();
        let wrong = authenticator
            .authenticate("user1@mail.com", "password")
            .unwrap_err();
        assert!(matches!(unknown, UserError::InvalidCredentials));
        assert!(matches!(wrong, UserError::InvalidCredentials));
    }

    #[test]
    fn pending_account_with_correct_password_is_inactive() {
        let (db, _dir) = test_db();
        seed_account(&db, false);

        let err = CredentialAuthenticator::new(&db)
            .authenticate("user1@mail.com", "P4ssword")
            .unwrap_err();
        assert!(matches!(err, UserError::AccountInactive));
    }

    #[test]
    fn email_lookup_is_normalized() {
        let (db, _dir) = test_db();
        seed_account(&db, true);

        let identity = CredentialAuthenticator::new(&db)
            .authenticate("  User1@Mail.COM ", "P4ssword")
            .unwrap();
        assert_eq!(identity.username, "user1");
    }
}
