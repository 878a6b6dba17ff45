// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rollcall Contributors

//! Embedded account database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `accounts`: id → serialized account record (JSON bytes)
//! - `email_index`: email → id
//! - `activation_token_index`: activation token → id
//! - `meta`: key → counter (id sequence)

use std::path::Path;

use redb::{Database, TableDefinition};

/// Primary table: account id → serialized record (JSON bytes).
pub(super) const ACCOUNTS: TableDefinition<u64, &[u8]> = TableDefinition::new("accounts");

/// Unique index: normalized email → account id.
pub(super) const EMAIL_INDEX: TableDefinition<&str, u64> = TableDefinition::new("email_index");

/// Unique index: activation token → account id. Entries exist only while
/// the account is pending; activation removes them.
pub(super) const TOKEN_INDEX: TableDefinition<&str, u64> =
    TableDefinition::new("activation_token_index");

/// Meta table: sequence state (e.g. `next_account_id`).
pub(super) const META: TableDefinition<&str, u64> = TableDefinition::new("meta");

/// Meta key holding the next account id to assign.
pub(super) const NEXT_ID_KEY: &str = "next_account_id";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("storage task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("not found: {0}")]
    NotFound(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Embedded ACID account database.
///
/// Typed account operations live in [`super::accounts`].
pub struct AccountDatabase {
    pub(super) db: Database,
}

impl AccountDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StoreResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ACCOUNTS)?;
            let _ = write_txn.open_table(EMAIL_INDEX)?;
            let _ = write_txn.open_table(TOKEN_INDEX)?;
            let _ = write_txn.open_table(META)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Remove every record and reset the id sequence.
    ///
    /// Test-only reset capability; never called on a live request path.
    pub fn delete_all(&self) -> StoreResult<()> {
        let write_txn = self.db.begin_write()?;
        write_txn.delete_table(ACCOUNTS)?;
        write_txn.delete_table(EMAIL_INDEX)?;
        write_txn.delete_table(TOKEN_INDEX)?;
        write_txn.delete_table(META)?;
        {
            let _ = write_txn.open_table(ACCOUNTS)?;
            let _ = write_txn.open_table(EMAIL_INDEX)?;
            let _ = write_txn.open_table(TOKEN_INDEX)?;
            let _ = write_txn.open_table(META)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}
