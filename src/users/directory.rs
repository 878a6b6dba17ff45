// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rollcall Contributors

//! Paginated, privacy-filtered user directory.
//!
//! Normalization clamps instead of rejecting: out-of-range or non-numeric
//! size falls back to 10, negative or non-numeric page to 0. Only active
//! accounts are listed, projected to {id, username, email}, and the
//! authenticated caller never appears in their own listing.

use crate::config::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::error::UserError;
use crate::models::{UserPage, UserResponse};
use crate::storage::AccountDatabase;

/// Normalize a raw page index: non-numeric or negative input becomes 0.
pub fn normalize_page(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|page| *page >= 0)
        .map(|page| page as u64)
        .unwrap_or(0)
}

/// Normalize a raw page size: non-numeric, non-positive, or over-limit
/// input becomes the default.
pub fn normalize_size(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|size| *size > 0 && *size <= MAX_PAGE_SIZE as i64)
        .map(|size| size as u64)
        .unwrap_or(DEFAULT_PAGE_SIZE)
}

pub struct DirectoryPaginator<'a> {
    db: &'a AccountDatabase,
}

impl<'a> DirectoryPaginator<'a> {
    pub fn new(db: &'a AccountDatabase) -> Self {
        Self { db }
    }

    /// Produce one directory page from raw query input.
    ///
    /// `exclude` is the authenticated caller's id, if any.
    pub fn list(
        &self,
        raw_page: Option<&str>,
        raw_size: Option<&str>,
        exclude: Option<u64>,
    ) -> Result<UserPage, UserError> {
        let page = normalize_page(raw_page);
        let size = normalize_size(raw_size);

        let matching = self.db.list_active(exclude)?;
        let total_pages = (matching.len() as u64).div_ceil(size);

        let content = matching
            .into_iter()
            // Saturate: any in-range i64 page index is accepted, so the
            // offset may exceed u64 when multiplied by the size.
            .skip(page.saturating_mul(size) as usize)
            .take(size as usize)
            .map(UserResponse::from)
            .collect();

        Ok(UserPage {
            content,
            page,
            size,
            total_pages,
        })
    }

    /// Fetch one active account by id.
    ///
    /// A pending account is indistinguishable from a nonexistent one, so
    /// unactivated accounts cannot be enumerated.
    pub fn get_one(&self, id: u64) -> Result<UserResponse, UserError> {
        match self.db.find_by_id(id)? {
            Some(account) if account.is_active() => Ok(account.into()),
            _ => Err(UserError::NotFound),
        }
    }
}
