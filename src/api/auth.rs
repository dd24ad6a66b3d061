// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Two-phase sign-in endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use uuid::Uuid;

use crate::{
    auth::AuthError,
    error::ApiError,
    models::{CompleteAuthRequest, CompleteAuthResponse, InitiateAuthResponse},
    state::AppState,
};

/// Characters of a code that may appear in logs.
const LOGGED_CODE_PREFIX: usize = 6;

#[utoipa::path(
    post,
    path = "/api/v1/auth/initiate",
    tag = "Auth",
    responses(
        (status = 200, description = "Pending auth code issued", body = InitiateAuthResponse),
        (status = 500, description = "Code generation failed")
    )
)]
pub async fn initiate(
    State(state): State<AppState>,
) -> Result<Json<InitiateAuthResponse>, ApiError> {
    let issued = state.pending.issue().map_err(|e| {
        tracing::error!(error = %e, "Failed to generate auth code");
        ApiError::internal("Failed to start authentication")
    })?;

    tracing::info!(
        code = %redact(&issued.code),
        expires_at = %issued.expires_at,
        "Issued pending auth code"
    );

    Ok(Json(InitiateAuthResponse {
        url: state.config.upstream_security_url.to_string(),
        token: issued.code,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/complete",
    request_body = CompleteAuthRequest,
    tag = "Auth",
    responses(
        (status = 200, description = "Session credential issued", body = CompleteAuthResponse),
        (status = 400, description = "Malformed request body"),
        (status = 401, description = "Invalid or expired authentication token"),
        (status = 500, description = "Signing failed")
    )
)]
pub async fn complete(
    State(state): State<AppState>,
    payload: Result<Json<CompleteAuthRequest>, JsonRejection>,
) -> Result<Json<CompleteAuthResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| {
        tracing::warn!(error = %e.body_text(), "Invalid auth completion request");
        ApiError::bad_request("Invalid request")
    })?;

    if let Err(e) = state.pending.redeem(&request.auth_token) {
        tracing::warn!(
            code = %redact(&request.auth_token),
            reason = %e,
            "Rejected auth code"
        );
        return Err(AuthError::from(e).into());
    }

    // No upstream account linkage exists yet, so each sign-in gets its own
    // opaque subject.
    let subject = format!("user_{}", Uuid::new_v4().simple());
    let issued = state.sessions.issue(&subject).map_err(|e| {
        tracing::error!(error = %e, "Failed to sign session credential");
        ApiError::internal("Failed to generate token")
    })?;

    tracing::info!(
        subject = %subject,
        user_agent = %request.user_agent,
        expires_at = %issued.expires_at,
        "Issued session credential"
    );

    Ok(Json(CompleteAuthResponse {
        token: issued.token,
        expires_in: state.sessions.ttl().num_seconds(),
    }))
}

fn redact(code: &str) -> String {
    let prefix: String = code.chars().take(LOGGED_CODE_PREFIX).collect();
    format!("{prefix}…")
}
