// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rollcall Contributors

//! # Authentication Module
//!
//! Credential verification and bearer sessions for the Rollcall API.
//!
//! ## Auth Flow
//!
//! 1. A client registers and activates an account.
//! 2. `POST /v1/auth` verifies email + password and issues an opaque bearer
//!    token bound to the account id.
//! 3. Protected requests carry either scheme:
//!    - `Authorization: Basic <base64(email:password)>`
//!    - `Authorization: Bearer <token>`
//!
//! ## Security
//!
//! - Passwords are stored as Argon2id PHC strings; verification is
//!   constant-time inside the argon2 crate.
//! - Bearer tokens are unguessable opaque strings with no decodable
//!   structure; verification is an exact lookup.
//! - Unknown email and wrong password are indistinguishable to callers.
//! - Absence of identity is a valid resting state on optional-auth reads;
//!   write paths reject it as forbidden.

pub mod authenticator;
pub mod extractor;
pub mod password;
pub mod sessions;
pub mod tokens;

pub use authenticator::{AuthenticatedIdentity, CredentialAuthenticator};
pub use extractor::{Auth, OptionalAuth};
pub use sessions::SessionStore;
