// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rollcall Contributors

//! Typed failure kinds for the account lifecycle core.
//!
//! Every fallible operation surfaces one of these kinds; the HTTP mapping
//! lives here so handlers only ever return `Result<_, UserError>`. Internal
//! errors (storage, hashing) are logged and surfaced as an opaque 500.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::password::PasswordError;
use crate::storage::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// Registration uniqueness violation.
    #[error("E-mail in use")]
    EmailInUse,

    /// Activation token absent, wrong, or already consumed. All three cases
    /// are observably identical.
    #[error("This account is either not active or the token is invalid")]
    InvalidToken,

    /// Unknown email or wrong password. Never distinguishes the two.
    #[error("Incorrect credentials")]
    InvalidCredentials,

    /// Correct credentials, account still pending.
    #[error("Account is inactive")]
    AccountInactive,

    /// Target account absent or not active.
    #[error("User not found")]
    NotFound,

    /// Missing/invalid credentials on a protected write, or identity
    /// mismatch on a self-only mutation.
    #[error("You are not authorized to update user")]
    Forbidden,

    /// Activation mail could not be delivered; the registration was rolled
    /// back and nothing was persisted.
    #[error("E-mail failure")]
    DispatchFailure,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl UserError {
    /// HTTP status for this failure kind.
    pub fn status_code(&self) -> StatusCode {
        match self {
            UserError::EmailInUse | UserError::InvalidToken => StatusCode::BAD_REQUEST,
            UserError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            UserError::AccountInactive | UserError::Forbidden => StatusCode::FORBIDDEN,
            UserError::NotFound => StatusCode::NOT_FOUND,
            UserError::DispatchFailure => StatusCode::BAD_GATEWAY,
            UserError::Store(_) | UserError::Password(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "internal error");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(ErrorBody { message })).into_response()
    }
}
