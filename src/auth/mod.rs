// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Two-phase sign-in and request gating for the API.
//!
//! ## Auth Flow
//!
//! 1. `POST /api/v1/auth/initiate` issues a pending auth code (10 minutes,
//!    single use) and points the user at the platform's security page.
//! 2. `POST /api/v1/auth/complete` redeems the code and returns a session
//!    credential (HS256 JWT, 24 hours by default).
//! 3. Clients send `Authorization: Bearer <credential>` on protected routes.
//!    The session gate verifies signature, issuer and time window, then
//!    stores the [`AuthenticatedUser`] in request extensions.
//!
//! Machine-to-machine routes use the API key gate instead. No route is
//! behind both gates.
//!
//! ## Security
//!
//! - Session credentials are stateless; there is no server-side revocation
//! - Verification failures all produce the same 401 body
//! - The credential secret is passed in at construction, never read from
//!   the environment during verification

pub mod api_key;
pub mod claims;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod pending;
pub mod session;

pub use api_key::ApiKeyPolicy;
pub use claims::{AuthenticatedUser, SessionClaims};
pub use error::AuthError;
pub use extractor::Session;
pub use middleware::{require_api_key, require_session};
pub use pending::{PendingAuthStore, RedeemError};
pub use session::{SessionError, SessionIssuer};
