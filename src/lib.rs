// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Fansly API Server
//!
//! REST gateway that signs users in with a two-phase, single-use code
//! exchange and serves creator metadata behind signed session credentials.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers and router (Axum)
//! - `auth` - Pending codes, session credentials and request gates
//! - `config` - Environment-driven server configuration
//! - `creators` - Creator source and pagination
//! - `sweeper` - Background purge of expired pending codes

pub mod api;
pub mod auth;
pub mod config;
pub mod creators;
pub mod error;
pub mod logging;
pub mod models;
pub mod state;
pub mod sweeper;
