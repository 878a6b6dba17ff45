// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rollcall Contributors

//! Typed account operations over the embedded database.
//!
//! Registration is two-phase: [`AccountDatabase::stage_account`] writes the
//! record and its index entries inside an open write transaction and hands
//! the transaction back as a [`StagedAccount`]. The caller commits after the
//! activation mail is dispatched, or aborts so that no row survives a
//! dispatch failure.

use chrono::{DateTime, Utc};
use redb::{ReadableDatabase, ReadableTable, WriteTransaction};
use serde::{Deserialize, Serialize};

use super::database::{
    AccountDatabase, StoreError, StoreResult, ACCOUNTS, EMAIL_INDEX, META, NEXT_ID_KEY,
    TOKEN_INDEX,
};

/// Lifecycle state of an account.
///
/// Accounts are created `Pending` and transition to `Active` exactly once
/// when their activation token is consumed. There is no reverse transition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AccountStatus {
    Pending,
    Active,
}

/// Account record as persisted in the `accounts` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredAccount {
    /// Store-assigned id, immutable after creation.
    pub id: u64,
    /// Unique display name.
    pub username: String,
    /// Unique, normalized login key.
    pub email: String,
    /// Salted one-way hash of the credential. Never the raw secret.
    pub password_hash: String,
    /// Lifecycle state.
    pub status: AccountStatus,
    /// Present only while the account is pending.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activation_token: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

impl StoredAccount {
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }
}

/// Input for staging a new account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub activation_token: String,
}

/// A staged registration holding its write transaction open.
///
/// The record and its index entries are invisible to readers until
/// [`commit`](Self::commit); [`abort`](Self::abort) discards all of them.
/// Dropping without committing also aborts.
pub struct StagedAccount {
    txn: WriteTransaction,
    account: StoredAccount,
}

impl StagedAccount {
    /// The staged record, as it will exist after commit.
    pub fn account(&self) -> &StoredAccount {
        &self.account
    }

    /// Make the staged account visible to readers.
    pub fn commit(self) -> StoreResult<StoredAccount> {
        self.txn.commit()?;
        Ok(self.account)
    }

    /// Discard the staged account. No table retains any trace of it.
    pub fn abort(self) -> StoreResult<()> {
        self.txn.abort()?;
        Ok(())
    }
}

/// Normalize an email for storage and lookup.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

impl AccountDatabase {
    /// Stage a new pending account inside an open write transaction.
    ///
    /// The email-uniqueness check runs inside the same transaction; redb's
    /// single-writer model makes it the authoritative backstop under races.
    /// Returns [`StoreError::AlreadyExists`] when the email is taken.
    pub fn stage_account(&self, new: NewAccount) -> StoreResult<StagedAccount> {
        let txn = self.db.begin_write()?;

        let duplicate = {
            let emails = txn.open_table(EMAIL_INDEX)?;
            // Bind before the table drops: the access guard borrows it.
            let found = emails.get(new.email.as_str())?.is_some();
            found
        };
        if duplicate {
            txn.abort()?;
            return Err(StoreError::AlreadyExists(format!(
                "account with email {}",
                new.email
            )));
        }

        let id = {
            let mut meta = txn.open_table(META)?;
            let next = meta.get(NEXT_ID_KEY)?.map(|g| g.value()).unwrap_or(1);
            meta.insert(NEXT_ID_KEY, next + 1)?;
            next
        };

        let account = StoredAccount {
            id,
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            status: AccountStatus::Pending,
            activation_token: Some(new.activation_token),
            created_at: Utc::now(),
        };

        {
            let mut emails = txn.open_table(EMAIL_INDEX)?;
            emails.insert(account.email.as_str(), id)?;

            let mut tokens = txn.open_table(TOKEN_INDEX)?;
            // Staged accounts always carry a token.
            if let Some(token) = account.activation_token.as_deref() {
                tokens.insert(token, id)?;
            }

            let json = serde_json::to_vec(&account)?;
            let mut accounts = txn.open_table(ACCOUNTS)?;
            accounts.insert(id, json.as_slice())?;
        }

        Ok(StagedAccount { txn, account })
    }

    /// Look up an account by id.
    pub fn find_by_id(&self, id: u64) -> StoreResult<Option<StoredAccount>> {
        let read_txn = self.db.begin_read()?;
        let accounts = read_txn.open_table(ACCOUNTS)?;
        match accounts.get(id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Look up an account by normalized email.
    pub fn find_by_email(&self, email: &str) -> StoreResult<Option<StoredAccount>> {
        let read_txn = self.db.begin_read()?;
        let emails = read_txn.open_table(EMAIL_INDEX)?;
        let id = match emails.get(email)? {
            Some(guard) => guard.value(),
            None => return Ok(None),
        };
        let accounts = read_txn.open_table(ACCOUNTS)?;
        match accounts.get(id)? {
            Some(guard) => Ok(Some(serde_json::from_slice(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Consume an activation token and activate its account.
    ///
    /// Removing the index entry and rewriting the record happen in one write
    /// transaction, so concurrent attempts with the same token resolve at
    /// most once; the loser sees `None`. A consumed token never matches
    /// again because its index entry is gone.
    pub fn activate(&self, token: &str) -> StoreResult<Option<StoredAccount>> {
        let txn = self.db.begin_write()?;

        let matched = {
            let mut tokens = txn.open_table(TOKEN_INDEX)?;
            // Bind before the table drops: the access guard borrows it.
            let removed = tokens.remove(token)?.map(|g| g.value());
            removed
        };
        let Some(id) = matched else {
            txn.abort()?;
            return Ok(None);
        };

        let updated = {
            let mut accounts = txn.open_table(ACCOUNTS)?;
            let existing: Option<StoredAccount> = match accounts.get(id)? {
                Some(guard) => Some(serde_json::from_slice(guard.value())?),
                None => None,
            };
            match existing {
                Some(mut account) => {
                    account.status = AccountStatus::Active;
                    account.activation_token = None;
                    let json = serde_json::to_vec(&account)?;
                    accounts.insert(id, json.as_slice())?;
                    Some(account)
                }
                None => None,
            }
        };

        match updated {
            Some(account) => {
                txn.commit()?;
                Ok(Some(account))
            }
            None => {
                txn.abort()?;
                Err(StoreError::NotFound(format!(
                    "account {id} referenced by activation token"
                )))
            }
        }
    }

    /// Update the display name of an existing account.
    pub fn update_username(&self, id: u64, username: &str) -> StoreResult<StoredAccount> {
        let txn = self.db.begin_write()?;

        let updated = {
            let mut accounts = txn.open_table(ACCOUNTS)?;
            let existing: Option<StoredAccount> = match accounts.get(id)? {
                Some(guard) => Some(serde_json::from_slice(guard.value())?),
                None => None,
            };
            match existing {
                Some(mut account) => {
                    account.username = username.to_string();
                    let json = serde_json::to_vec(&account)?;
                    accounts.insert(id, json.as_slice())?;
                    Some(account)
                }
                None => None,
            }
        };

        match updated {
            Some(account) => {
                txn.commit()?;
                Ok(account)
            }
            None => {
                txn.abort()?;
                Err(StoreError::NotFound(format!("account {id}")))
            }
        }
    }

    /// List active accounts in creation order, optionally excluding one id.
    pub fn list_active(&self, exclude: Option<u64>) -> StoreResult<Vec<StoredAccount>> {
        let read_txn = self.db.begin_read()?;
        let accounts = read_txn.open_table(ACCOUNTS)?;

        let mut matching = Vec::new();
        for entry in accounts.iter()? {
            let (_, value) = entry?;
            let account: StoredAccount = serde_json::from_slice(value.value())?;
            if account.is_active() && Some(account.id) != exclude {
                matching.push(account);
            }
        }
        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_db() -> (AccountDatabase, tempfile::TempDir) {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let db = AccountDatabase::open(&dir.path().join("accounts.redb")).expect("open db");
        (db, dir)
    }

    fn new_account(n: u32) -> NewAccount {
        NewAccount {
            username: format!("user{n}"),
            email: format!("user{n}@mail.com"),
            password_hash: "$argon2id$stub".to_string(),
            activation_token: format!("token-{n:011}"),
        }
    }

    #[test]
    fn staged_account_is_invisible_until_commit() {
        let (db, _dir) = test_db();
        let staged = db.stage_account(new_account(1)).unwrap();
        let account = staged.commit().unwrap();

        let loaded = db.find_by_email("user1@mail.com").unwrap().unwrap();
        assert_eq!(loaded, account);
        assert_eq!(loaded.status, AccountStatus::Pending);
        assert_eq!(loaded.activation_token.as_deref(), Some("token-00000000001"));
    }

    #[test]
    fn aborted_staging_leaves_no_trace() {
        let (db, _dir) = test_db();
        let staged = db.stage_account(new_account(1)).unwrap();
        staged.abort().unwrap();

        assert!(db.find_by_email("user1@mail.com").unwrap().is_none());
        // The email is free again for a fresh registration.
        let staged = db.stage_account(new_account(1)).unwrap();
        staged.commit().unwrap();
        assert!(db.find_by_email("user1@mail.com").unwrap().is_some());
    }

    #[test]
    fn duplicate_email_rejected() {
        let (db, _dir) = test_db();
        db.stage_account(new_account(1)).unwrap().commit().unwrap();

        let mut dup = new_account(2);
        dup.email = "user1@mail.com".to_string();
        let result = db.stage_account(dup);
        assert!(matches!(result, Err(StoreError::AlreadyExists(_))));
    }

    #[test]
    fn activate_consumes_token_exactly_once() {
        let (db, _dir) = test_db();
        let account = db.stage_account(new_account(1)).unwrap().commit().unwrap();
        let token = account.activation_token.clone().unwrap();

        let activated = db.activate(&token).unwrap().expect("first use matches");
        assert_eq!(activated.status, AccountStatus::Active);
        assert!(activated.activation_token.is_none());

        // Second use of the same token no longer resolves.
        assert!(db.activate(&token).unwrap().is_none());

        let loaded = db.find_by_id(account.id).unwrap().unwrap();
        assert!(loaded.is_active());
        assert!(loaded.activation_token.is_none());
    }

    #[test]
    fn activate_unknown_token_matches_nothing() {
        let (db, _dir) = test_db();
        assert!(db.activate("no-such-token").unwrap().is_none());
    }

    #[test]
    fn update_username_persists_and_missing_id_errors() {
        let (db, _dir) = test_db();
        let account = db.stage_account(new_account(1)).unwrap().commit().unwrap();

        let updated = db.update_username(account.id, "user1-updated").unwrap();
        assert_eq!(updated.username, "user1-updated");
        let loaded = db.find_by_id(account.id).unwrap().unwrap();
        assert_eq!(loaded.username, "user1-updated");

        let err = db.update_username(9999, "nobody").unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn list_active_filters_pending_and_excluded() {
        let (db, _dir) = test_db();
        for n in 1..=4 {
            let account = db.stage_account(new_account(n)).unwrap().commit().unwrap();
            // Activate all but user4.
            if n != 4 {
                let token = account.activation_token.unwrap();
                db.activate(&token).unwrap();
            }
        }

        let all_active = db.list_active(None).unwrap();
        assert_eq!(all_active.len(), 3);
        // Creation order is preserved.
        let names: Vec<_> = all_active.iter().map(|a| a.username.as_str()).collect();
        assert_eq!(names, ["user1", "user2", "user3"]);

        let excluding_first = db.list_active(Some(all_active[0].id)).unwrap();
        assert_eq!(excluding_first.len(), 2);
        assert!(excluding_first.iter().all(|a| a.username != "user1"));
    }

    #[test]
    fn delete_all_resets_records_and_sequence() {
        let (db, _dir) = test_db();
        db.stage_account(new_account(1)).unwrap().commit().unwrap();
        db.delete_all().unwrap();

        assert!(db.find_by_email("user1@mail.com").unwrap().is_none());
        let fresh = db.stage_account(new_account(2)).unwrap().commit().unwrap();
        assert_eq!(fresh.id, 1);
    }

    #[test]
    fn normalize_email_trims_and_lowercases() {
        assert_eq!(normalize_email("  User1@Mail.COM "), "user1@mail.com");
    }
}
