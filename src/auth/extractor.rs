// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractor for the authenticated session user.
//!
//! ```rust,ignore
//! async fn my_handler(Session(user): Session) -> impl IntoResponse {
//!     // user.user_id is the verified subject
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use super::middleware::authenticate;
use super::{AuthError, AuthenticatedUser};
use crate::state::AppState;

/// Extractor for the user behind a verified session credential.
///
/// Reuses the user inserted by `require_session` when the route is gated;
/// otherwise verifies the `Authorization` header itself.
pub struct Session(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Session {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(Session(user));
        }

        authenticate(state, &parts.headers).map(Session)
    }
}
