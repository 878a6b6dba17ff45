// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rollcall Contributors

//! Opaque token generation.
//!
//! Tokens are random alphanumeric strings used purely as lookup keys: no
//! decodable structure, nothing derivable from them. Activation tokens are
//! 16 characters, session tokens 32 (see [`crate::config`]).

use rand::{distributions::Alphanumeric, Rng};

/// Generate an unguessable opaque token of the given length.
pub fn generate_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}
