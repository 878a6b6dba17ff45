// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rollcall Contributors

//! One-way salted credential hashing with Argon2id.
//!
//! Hashes are PHC-formatted strings carrying algorithm, parameters, and
//! salt, so verification needs no side-channel state.

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

/// Credential hashing failed. Carries no secret material.
#[derive(Debug, thiserror::Error)]
#[error("credential hashing failed: {0}")]
pub struct PasswordError(String);

/// Hash a raw password with a fresh random salt.
pub fn hash_password(raw: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(raw.as_bytes(), &salt)
        .map_err(|e| PasswordError(e.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a raw password against a stored PHC hash.
///
/// A malformed stored hash verifies as false rather than erroring; callers
/// treat it exactly like a wrong password.
pub fn verify_password(raw: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Argon2::default()
        .verify_password(raw.as_bytes(), &parsed)
        .is_ok()
}
