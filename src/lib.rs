// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rollcall Contributors

//! Rollcall - Account Lifecycle and User Directory Service
//!
//! This crate provides account registration with mailed activation tokens,
//! credential authentication with bearer sessions, and a paginated,
//! privacy-filtered user directory.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Credential verification, sessions, and request guards
//! - `users` - Registration, activation, and directory services
//! - `storage` - Embedded account store (redb)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod mailer;
pub mod models;
pub mod state;
pub mod storage;
pub mod users;
