// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! Credential failures are deliberately coarse: a bad signature, a malformed
//! token and an expired token all render as the same 401 body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use super::pending::RedeemError;
use super::session::SessionError;

/// Authentication error type.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No authorization header present
    #[error("Authorization header is required")]
    MissingAuthHeader,
    /// Header present but not `Bearer <token>`
    #[error("Invalid authorization header format")]
    InvalidAuthHeader,
    /// Session credential failed verification
    #[error("Invalid or expired token")]
    InvalidToken,
    /// Pending auth code unknown, consumed or expired
    #[error("Invalid or expired authentication token")]
    InvalidAuthCode,
    /// API key missing or rejected by the key policy
    #[error("Invalid or missing API key")]
    InvalidApiKey,
    /// Signing or randomness failure; detail is logged, never rendered
    #[error("Internal authentication error")]
    Internal,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: String,
}

impl AuthError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeader
            | AuthError::InvalidToken
            | AuthError::InvalidAuthCode
            | AuthError::InvalidApiKey => StatusCode::UNAUTHORIZED,
            AuthError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RedeemError> for AuthError {
    fn from(_: RedeemError) -> Self {
        AuthError::InvalidAuthCode
    }
}

impl From<SessionError> for AuthError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidOrExpired => AuthError::InvalidToken,
            SessionError::MissingSecret | SessionError::Signing(_) => {
                tracing::error!(error = %err, "Session credential operation failed");
                AuthError::Internal
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn missing_auth_returns_401() {
        let response = AuthError::MissingAuthHeader.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["error"], "Authorization header is required");
    }

    #[tokio::test]
    async fn internal_error_hides_detail() {
        let err: AuthError = SessionError::MissingSecret.into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"error":"Internal authentication error"}"#);
    }

    #[test]
    fn redeem_failures_are_indistinguishable() {
        let expired: AuthError = RedeemError::Expired.into();
        let missing: AuthError = RedeemError::NotFound.into();
        assert_eq!(expired.to_string(), missing.to_string());
        assert_eq!(expired.status_code(), StatusCode::UNAUTHORIZED);
    }
}
