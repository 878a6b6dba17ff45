// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rollcall Contributors

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        CredentialsRequest, LoginResponse, RegisterRequest, UserPage, UserResponse,
        UserUpdateRequest,
    },
    state::AppState,
};

pub mod auth;
pub mod health;
pub mod users;

pub fn router(state: AppState) -> Router {
    let v1_routes = Router::new()
        .route("/users", post(users::register).get(users::list_users))
        .route("/users/token/{token}", post(users::activate))
        .route(
            "/users/{id}",
            get(users::get_user).put(users::update_user),
        )
        .route("/auth", post(auth::login));

    Router::new()
        .nest("/v1", v1_routes)
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        users::register,
        users::activate,
        users::list_users,
        users::get_user,
        users::update_user,
        auth::login,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            RegisterRequest,
            UserResponse,
            UserPage,
            UserUpdateRequest,
            CredentialsRequest,
            LoginResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Users", description = "Registration, activation, and directory"),
        (name = "Auth", description = "Credential authentication and token issuance"),
        (name = "Health", description = "Service probes")
    )
)]
struct ApiDoc;
