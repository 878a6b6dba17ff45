// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rollcall Contributors

//! # Account Storage Module
//!
//! Persistent account storage backed by redb (pure Rust, ACID).
//!
//! ## Storage Layout
//!
//! A single database file `accounts.redb` holding:
//!
//! - `accounts`: id → serialized account record
//! - `email_index`: email → id (uniqueness backstop for registration)
//! - `activation_token_index`: token → id (one entry per pending account)
//! - `meta`: id sequence state
//!
//! ## Consistency Model
//!
//! Every multi-table mutation runs inside one redb write transaction. redb
//! serializes writers, so the email-uniqueness check and the conditional
//! consume-token update cannot interleave with a competing write. Staged
//! registrations become visible to readers only at commit; aborting leaves
//! no trace in any table.

pub mod accounts;
pub mod database;

pub use accounts::{AccountStatus, NewAccount, StagedAccount, StoredAccount};
pub use database::{AccountDatabase, StoreError, StoreResult};
