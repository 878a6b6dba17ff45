// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rollcall Contributors

//! User endpoints: registration, activation, directory, self-update.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    auth::{Auth, OptionalAuth},
    error::UserError,
    models::{PageParams, RegisterRequest, UserPage, UserResponse, UserUpdateRequest},
    state::AppState,
    storage::StoreError,
    users::directory::DirectoryPaginator,
    users::{ActivationService, RegistrationService},
};

/// Register a new account.
///
/// The account is created pending and an activation mail is dispatched;
/// if dispatch fails, nothing is persisted.
#[utoipa::path(
    post,
    path = "/v1/users",
    tag = "Users",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created, pending activation", body = UserResponse),
        (status = 400, description = "E-mail already in use"),
        (status = 502, description = "Activation mail could not be delivered"),
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<UserResponse>, UserError> {
    let service = RegistrationService::new(state.accounts.clone(), state.mailer.clone());
    let account = service
        .register(&request.username, &request.email, &request.password)
        .await?;
    Ok(Json(account.into()))
}

/// Consume an activation token.
#[utoipa::path(
    post,
    path = "/v1/users/token/{token}",
    tag = "Users",
    params(("token" = String, Path, description = "One-time activation token")),
    responses(
        (status = 200, description = "Account activated"),
        (status = 400, description = "Token absent, wrong, or already consumed"),
    )
)]
pub async fn activate(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<(), UserError> {
    ActivationService::new(state.accounts.clone())
        .activate(&token)
        .await
}

/// List active accounts, paginated.
///
/// Authentication is optional; when present, the caller is excluded from
/// the listing.
#[utoipa::path(
    get,
    path = "/v1/users",
    tag = "Users",
    params(PageParams),
    responses((status = 200, description = "One directory page", body = UserPage))
)]
pub async fn list_users(
    State(state): State<AppState>,
    OptionalAuth(identity): OptionalAuth,
    Query(params): Query<PageParams>,
) -> Result<Json<UserPage>, UserError> {
    let page = DirectoryPaginator::new(&state.accounts).list(
        params.page.as_deref(),
        params.size.as_deref(),
        identity.map(|i| i.id),
    )?;
    Ok(Json(page))
}

/// Fetch one active account.
#[utoipa::path(
    get,
    path = "/v1/users/{id}",
    tag = "Users",
    params(("id" = u64, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account projection", body = UserResponse),
        (status = 404, description = "Account absent or not active"),
    )
)]
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<UserResponse>, UserError> {
    let user = DirectoryPaginator::new(&state.accounts).get_one(id)?;
    Ok(Json(user))
}

/// Update one's own display name.
///
/// Authorization is a separate check after authentication: the resolved
/// identity must match the target id, otherwise the request is forbidden
/// even with valid credentials.
#[utoipa::path(
    put,
    path = "/v1/users/{id}",
    tag = "Users",
    params(("id" = u64, Path, description = "Account id")),
    request_body = UserUpdateRequest,
    security(("basic" = []), ("bearer" = [])),
    responses(
        (status = 200, description = "Updated projection", body = UserResponse),
        (status = 403, description = "Missing/invalid credentials or identity mismatch"),
    )
)]
pub async fn update_user(
    Auth(identity): Auth,
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<UserUpdateRequest>,
) -> Result<Json<UserResponse>, UserError> {
    if identity.id != id {
        return Err(UserError::Forbidden);
    }
    // Write transactions wait on the store's single write slot; keep that
    // wait off the async workers.
    let accounts = state.accounts.clone();
    let account =
        tokio::task::spawn_blocking(move || accounts.update_username(id, &request.username))
            .await
            .map_err(StoreError::from)??;
    Ok(Json(account.into()))
}
