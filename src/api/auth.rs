// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rollcall Contributors

//! Credential authentication endpoint.

use axum::{extract::State, Json};

use crate::{
    auth::CredentialAuthenticator,
    error::UserError,
    models::{CredentialsRequest, LoginResponse},
    state::AppState,
};

/// Exchange email/password credentials for a bearer session token.
///
/// Wrong email and wrong password are indistinguishable to the caller;
/// an unactivated account is the one distinct failure (403).
#[utoipa::path(
    post,
    path = "/v1/auth",
    tag = "Auth",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Session issued", body = LoginResponse),
        (status = 401, description = "Unknown email or wrong password"),
        (status = 403, description = "Account not yet activated"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<Json<LoginResponse>, UserError> {
    let identity = CredentialAuthenticator::new(&state.accounts)
        .authenticate(&request.email, &request.password)?;

    let token = state.sessions.issue(identity.id).await;
    tracing::info!(id = identity.id, "session issued");

    Ok(Json(LoginResponse {
        id: identity.id,
        username: identity.username,
        token,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SESSION_TOKEN_LEN;
    use crate::state::test_state;
    use crate::users::RegistrationService;
    use axum::http::StatusCode;

    async fn seed_account(state: &AppState, activate: bool) -> u64 {
        let account = RegistrationService::new(state.accounts.clone(), state.mailer.clone())
            .register("user1", "user1@mail.com", "P4ssword")
            .await
            .unwrap();
        if activate {
            let token = account.activation_token.as_deref().unwrap();
            state.accounts.activate(token).unwrap();
        }
        account.id
    }

    fn credentials(email: &str, password: &str) -> Json<CredentialsRequest> {
        Json(CredentialsRequest {
            email: email.to_string(),
            password: password.to_string(),
        })
    }

    #[tokio::test]
    async fn login_issues_verifiable_session_token() {
        let (state, _mailer, _dir) = test_state();
        let id = seed_account(&state, true).await;

        let Json(response) = login(
            State(state.clone()),
            credentials("user1@mail.com", "P4ssword"),
        )
        .await
        .unwrap();

        assert_eq!(response.id, id);
        assert_eq!(response.username, "user1");
        assert_eq!(response.token.len(), SESSION_TOKEN_LEN);
        assert_eq!(state.sessions.verify(&response.token).await, Some(id));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_fail_alike() {
        let (state, _mailer, _dir) = test_state();
        seed_account(&state, true).await;

        let wrong_password = login(
            State(state.clone()),
            credentials("user1@mail.com", "wrong"),
        )
        .await
        .unwrap_err();
        let unknown_email = login(
            State(state.clone()),
            credentials("nobody@mail.com", "P4ssword"),
        )
        .await
        .unwrap_err();

        assert_eq!(wrong_password.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_email.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn pending_account_is_rejected_even_with_valid_credentials() {
        let (state, _mailer, _dir) = test_state();
        seed_account(&state, false).await;

        let err = login(
            State(state.clone()),
            credentials("user1@mail.com", "P4ssword"),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }
}
