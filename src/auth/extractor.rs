// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rollcall Contributors

//! Axum extractors for authenticated callers.
//!
//! Two independent credential schemes are accepted on the same header:
//!
//! - `Authorization: Basic <base64(email:password)>` — verified against the
//!   account store per request.
//! - `Authorization: Bearer <token>` — resolved through the session store.
//!
//! [`Auth`] rejects with Forbidden when no identity resolves; use it on
//! write paths. [`OptionalAuth`] never rejects; absence of identity is a
//! valid resting state on read paths.
//!
//! Authorization (e.g. "acting user must equal target user") is a separate,
//! later check in the handler: these extractors only resolve identity.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use base64::{engine::general_purpose::STANDARD, Engine};

use super::authenticator::{AuthenticatedIdentity, CredentialAuthenticator};
use crate::error::UserError;
use crate::state::AppState;

/// Extractor requiring a resolved identity. Rejects with Forbidden.
pub struct Auth(pub AuthenticatedIdentity);

impl FromRequestParts<AppState> for Auth {
    type Rejection = UserError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match resolve_identity(parts, state).await {
            Some(identity) => Ok(Auth(identity)),
            None => Err(UserError::Forbidden),
        }
    }
}

/// Extractor that resolves an identity when one is present.
///
/// Invalid or missing credentials yield `None` instead of rejecting.
pub struct OptionalAuth(pub Option<AuthenticatedIdentity>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(OptionalAuth(resolve_identity(parts, state).await))
    }
}

/// Resolve the caller's identity from the Authorization header, if any.
///
/// Every failure mode (missing header, bad encoding, bad credentials,
/// unknown token, pending account) collapses to `None`; nothing here
/// raises, so invalid credentials never leak which step failed.
async fn resolve_identity(parts: &Parts, state: &AppState) -> Option<AuthenticatedIdentity> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;

    if let Some(token) = header.strip_prefix("Bearer ") {
        let account_id = state.sessions.verify(token.trim()).await?;
        let account = state.accounts.find_by_id(account_id).ok().flatten()?;
        if !account.is_active() {
            return None;
        }
        return Some(AuthenticatedIdentity {
            id: account.id,
            username: account.username,
        });
    }

    if let Some(encoded) = header.strip_prefix("Basic ") {
        let decoded = STANDARD.decode(encoded.trim()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (email, password) = decoded.split_once(':')?;
        return CredentialAuthenticator::new(&state.accounts)
            .authenticate(email, password)
            .ok();
    }

    None
}
