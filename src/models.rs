// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rollcall Contributors

//! # API Data Models
//!
//! Request and response structures for the REST API. All types derive
//! `Serialize`/`Deserialize` and `ToSchema` for JSON handling and OpenAPI
//! documentation.
//!
//! Responses only ever expose the safe projection of an account
//! (id, username, email); hashes, lifecycle state, and tokens never leave
//! the service.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::storage::StoredAccount;

/// Request to register a new account.
///
/// Any caller-supplied lifecycle hint (e.g. an `active` field) is ignored;
/// new accounts always start pending.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    /// Display name, 4-32 characters (validated upstream).
    pub username: String,
    /// Login email, unique per account.
    pub email: String,
    /// Raw password; only its hash is stored.
    pub password: String,
}

/// Safe projection of an account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserResponse {
    pub id: u64,
    pub username: String,
    pub email: String,
}

impl From<StoredAccount> for UserResponse {
    fn from(account: StoredAccount) -> Self {
        Self {
            id: account.id,
            username: account.username,
            email: account.email,
        }
    }
}

/// One page of the user directory.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserPage {
    /// Projected accounts on this page, in creation order.
    pub content: Vec<UserResponse>,
    /// Zero-based page index.
    pub page: u64,
    /// Page size after normalization.
    pub size: u64,
    /// Total number of pages for the matching accounts.
    #[serde(rename = "totalPages")]
    pub total_pages: u64,
}

/// Raw pagination parameters as received from the query string.
///
/// Kept as strings so non-numeric input normalizes to defaults instead of
/// failing deserialization.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct PageParams {
    /// Requested zero-based page index.
    pub page: Option<String>,
    /// Requested page size (1-10).
    pub size: Option<String>,
}

/// Request to update one's own account.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UserUpdateRequest {
    /// New display name.
    pub username: String,
}

/// Credentials presented for authentication.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Successful authentication result.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub id: u64,
    pub username: String,
    /// Fresh opaque bearer token bound to this account.
    pub token: String,
}
