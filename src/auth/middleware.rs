// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request gates for Axum.
//!
//! Two independent gates exist and each route picks exactly one:
//!
//! - [`require_session`]: `Authorization: Bearer <session credential>`.
//!   The verified user is inserted into request extensions.
//! - [`require_api_key`]: `X-API-Key` header or `api_key` query parameter.
//!   Health and sign-in paths always pass.
//!
//! ```rust,ignore
//! let protected = Router::new()
//!     .route("/api/v1/creators", get(list_creators))
//!     .route_layer(axum::middleware::from_fn_with_state(
//!         state.clone(),
//!         require_session,
//!     ));
//! ```

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::api_key::{extract_api_key, is_public_path};
use super::{AuthError, AuthenticatedUser};
use crate::state::AppState;

/// Session credential gate.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match authenticate(&state, request.headers()) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            tracing::warn!(
                path = %request.uri().path(),
                reason = %e,
                "Rejected request without a valid session"
            );
            e.into_response()
        }
    }
}

/// API key gate.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if is_public_path(request.uri().path()) {
        return next.run(request).await;
    }

    let accepted = extract_api_key(request.headers(), request.uri().query())
        .is_some_and(|key| state.api_keys.accepts(&key));

    if accepted {
        return next.run(request).await;
    }

    tracing::warn!(path = %request.uri().path(), "Invalid or missing API key");
    AuthError::InvalidApiKey.into_response()
}

/// Parse the header and verify the session credential it carries.
pub(crate) fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<AuthenticatedUser, AuthError> {
    let token = bearer_token(headers)?;
    Ok(state.sessions.verify(token)?)
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// Rejects before any verification when the header is missing, not
/// `Bearer`, or carries an empty token.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthHeader)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }
    Ok(token)
}
