// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rollcall Contributors

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Root directory for the account database | `./data` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `MAIL_RELAY_URL` | HTTP mail relay endpoint for activation mail | Log-only mailer when unset |
//! | `MAIL_SENDER` | From-address used on activation mail | `My App <info@my-app.com>` |
//! | `APP_BASE_URL` | Base URL embedded in activation links | `http://localhost:8080` |
//! | `SESSION_TTL_SECS` | Bearer token lifetime in seconds | `604800` (7 days) |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

/// Environment variable name for the account database directory.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Default account database directory when `DATA_DIR` is unset.
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Environment variable name for the server bind address.
pub const HOST_ENV: &str = "HOST";

/// Environment variable name for the server bind port.
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the HTTP mail relay endpoint.
///
/// When unset the service falls back to a log-only mailer that prints the
/// activation link instead of dispatching it.
pub const MAIL_RELAY_URL_ENV: &str = "MAIL_RELAY_URL";

/// Request timeout for the HTTP mail relay, in seconds.
///
/// Registration holds the store's single write slot open while the mail is
/// in flight, so the dispatch wait must be bounded.
pub const MAIL_RELAY_TIMEOUT_SECS: u64 = 10;

/// Environment variable name for the activation mail sender address.
pub const MAIL_SENDER_ENV: &str = "MAIL_SENDER";

/// Default sender address on activation mail.
pub const DEFAULT_MAIL_SENDER: &str = "My App <info@my-app.com>";

/// Environment variable name for the base URL embedded in activation links.
pub const APP_BASE_URL_ENV: &str = "APP_BASE_URL";

/// Default base URL for activation links.
pub const DEFAULT_APP_BASE_URL: &str = "http://localhost:8080";

/// Environment variable name for the session token lifetime in seconds.
pub const SESSION_TTL_SECS_ENV: &str = "SESSION_TTL_SECS";

/// Default session token lifetime (7 days).
pub const DEFAULT_SESSION_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Length of activation tokens mailed to new accounts.
pub const ACTIVATION_TOKEN_LEN: usize = 16;

/// Length of issued bearer session tokens.
pub const SESSION_TOKEN_LEN: usize = 32;

/// Directory page size used when the requested size is missing or out of range.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Largest directory page size a caller may request.
pub const MAX_PAGE_SIZE: u64 = 10;
