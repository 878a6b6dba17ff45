// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rollcall Contributors

use std::{env, net::SocketAddr, path::PathBuf, sync::Arc};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rollcall::api::router;
use rollcall::auth::SessionStore;
use rollcall::config::{
    APP_BASE_URL_ENV, DATA_DIR_ENV, DEFAULT_APP_BASE_URL, DEFAULT_DATA_DIR,
    DEFAULT_MAIL_SENDER, DEFAULT_SESSION_TTL_SECS, HOST_ENV, MAIL_RELAY_URL_ENV,
    MAIL_SENDER_ENV, PORT_ENV, SESSION_TTL_SECS_ENV,
};
use rollcall::mailer::{ActivationMailer, HttpMailer, LogMailer};
use rollcall::state::AppState;
use rollcall::storage::AccountDatabase;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    if env::var("LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn build_mailer() -> Arc<dyn ActivationMailer> {
    let base_url =
        env::var(APP_BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_APP_BASE_URL.to_string());
    match env::var(MAIL_RELAY_URL_ENV) {
        Ok(relay_url) => {
            let sender =
                env::var(MAIL_SENDER_ENV).unwrap_or_else(|_| DEFAULT_MAIL_SENDER.to_string());
            tracing::info!(relay = %relay_url, "activation mail via HTTP relay");
            Arc::new(HttpMailer::new(relay_url, sender, base_url))
        }
        Err(_) => {
            tracing::warn!("no mail relay configured, activation links are logged only");
            Arc::new(LogMailer::new(base_url))
        }
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let data_dir =
        PathBuf::from(env::var(DATA_DIR_ENV).unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string()));
    let accounts = AccountDatabase::open(&data_dir.join("accounts.redb"))
        .expect("Failed to open account database");

    let session_ttl = env::var(SESSION_TTL_SECS_ENV)
        .ok()
        .and_then(|raw| raw.parse::<i64>().ok())
        .unwrap_or(DEFAULT_SESSION_TTL_SECS);

    let state = AppState::new(accounts, SessionStore::new(session_ttl), build_mailer());
    let app = router(state);

    let host = env::var(HOST_ENV).unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var(PORT_ENV)
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);
    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");
    tracing::info!("Rollcall server listening on http://{addr} (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to install shutdown handler");
        })
        .await
        .expect("Server failed");
}
