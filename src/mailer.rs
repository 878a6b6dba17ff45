// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rollcall Contributors

//! Activation mail dispatch.
//!
//! The mail transport itself is an external collaborator; this module only
//! defines the dispatch contract and two implementations: an HTTP relay
//! client for deployments and a log-only mailer for local development.
//! Dispatch failures are surfaced synchronously and never retried here;
//! retry policy, if any, belongs to the relay.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;

use crate::config::{DEFAULT_APP_BASE_URL, DEFAULT_MAIL_SENDER, MAIL_RELAY_TIMEOUT_SECS};

#[derive(Debug, thiserror::Error)]
pub enum MailerError {
    #[error("mail relay request failed: {0}")]
    Transport(String),

    #[error("mail relay returned status {0}")]
    RelayStatus(u16),
}

/// Delivers activation messages. May fail; callers decide what a failure
/// means (registration rolls back on it).
#[async_trait]
pub trait ActivationMailer: Send + Sync {
    async fn send_activation(&self, email: &str, token: &str) -> Result<(), MailerError>;
}

fn activation_link(base_url: &str, token: &str) -> String {
    format!("{base_url}/#/login?token={token}")
}

/// Dispatches activation mail through an HTTP mail relay.
pub struct HttpMailer {
    client: reqwest::Client,
    relay_url: String,
    sender: String,
    base_url: String,
}

impl HttpMailer {
    pub fn new(
        relay_url: impl Into<String>,
        sender: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            // Registration keeps a write transaction open across dispatch,
            // so a stalled relay must time out rather than hang.
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(MAIL_RELAY_TIMEOUT_SECS))
                .build()
                .expect("Failed to create HTTP client"),
            relay_url: relay_url.into(),
            sender: sender.into(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ActivationMailer for HttpMailer {
    async fn send_activation(&self, email: &str, token: &str) -> Result<(), MailerError> {
        let body = json!({
            "from": self.sender,
            "to": email,
            "subject": "Account Activation",
            "text": format!(
                "Please click below link to activate your account\n{}",
                activation_link(&self.base_url, token)
            ),
        });

        let response = self
            .client
            .post(&self.relay_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| MailerError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MailerError::RelayStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

/// Logs the activation link instead of dispatching it.
///
/// Used when no mail relay is configured (local development).
pub struct LogMailer {
    base_url: String,
}

impl LogMailer {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

impl Default for LogMailer {
    fn default() -> Self {
        Self::new(DEFAULT_APP_BASE_URL)
    }
}

#[async_trait]
impl ActivationMailer for LogMailer {
    async fn send_activation(&self, email: &str, token: &str) -> Result<(), MailerError> {
        tracing::info!(
            to = email,
            from = DEFAULT_MAIL_SENDER,
            link = %activation_link(&self.base_url, token),
            "activation mail (log-only mailer)"
        );
        Ok(())
    }
}

/// Recording mailer for tests; can be toggled to fail.
#[cfg(test)]
pub struct MockMailer {
    failing: std::sync::atomic::AtomicBool,
    sent: std::sync::Mutex<Vec<(String, String)>>,
}

#[cfg(test)]
impl MockMailer {
    pub fn new() -> std::sync::Arc<Self> {
        std::sync::Arc::new(Self {
            failing: std::sync::atomic::AtomicBool::new(false),
            sent: std::sync::Mutex::new(Vec::new()),
        })
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing
            .store(failing, std::sync::atomic::Ordering::SeqCst);
    }

    /// All `(email, token)` pairs dispatched so far.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Token of the most recent dispatch, if any.
    pub fn last_token(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|(_, t)| t.clone())
    }
}

#[cfg(test)]
#[async_trait]
impl ActivationMailer for MockMailer {
    async fn send_activation(&self, email: &str, token: &str) -> Result<(), MailerError> {
        if self.failing.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(MailerError::RelayStatus(502));
        }
        self.sent
            .lock()
            .unwrap()
            .push((email.to_string(), token.to_string()));
        Ok(())
    }
}
