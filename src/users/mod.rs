// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Rollcall Contributors

//! # User Lifecycle Services
//!
//! - [`registration`] - transactional account creation tied to activation
//!   mail dispatch
//! - [`activation`] - one-time token consumption (pending → active)
//! - [`directory`] - paginated, privacy-filtered listing and lookup

pub mod activation;
pub mod directory;
pub mod registration;

pub use activation::ActivationService;
pub use registration::RegistrationService;
