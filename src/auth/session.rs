// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session credential issuing and verification.
//!
//! Session credentials are HS256 JWTs signed with the process-wide
//! credential secret. Nothing is stored server-side: a credential is valid
//! when its signature checks out under the secret, its issuer matches, and
//! the current time lies within `[nbf, exp]`. Any process sharing the secret
//! can verify credentials issued by any other.
//!
//! Verification failures collapse into [`SessionError::InvalidOrExpired`]
//! so callers cannot tell a bad signature from an expired token.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use super::claims::{AuthenticatedUser, SessionClaims};

/// Issuer claim written into every session credential.
pub const DEFAULT_ISSUER: &str = "fansly-api";

/// Default session credential lifetime (24 hours).
pub const DEFAULT_SESSION_TTL_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("credential secret is not configured")]
    MissingSecret,
    #[error("failed to sign session credential: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
    #[error("Invalid or expired token")]
    InvalidOrExpired,
}

/// A signed session credential together with its expiry.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Signs and verifies session credentials with one symmetric secret.
pub struct SessionIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl: Duration,
    validation: Validation,
}

impl SessionIssuer {
    /// Create an issuer for `secret` with the default issuer and lifetime.
    pub fn new(secret: &[u8]) -> Result<Self, SessionError> {
        if secret.is_empty() {
            return Err(SessionError::MissingSecret);
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            issuer: DEFAULT_ISSUER.to_string(),
            ttl: Duration::seconds(DEFAULT_SESSION_TTL_SECS),
            validation: build_validation(DEFAULT_ISSUER),
        })
    }

    /// Set the issuer claim written and expected.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self.validation = build_validation(&self.issuer);
        self
    }

    /// Set the credential lifetime.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a credential for `subject`, valid from now.
    pub fn issue(&self, subject: &str) -> Result<IssuedSession, SessionError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue a credential as if the current time were `now`.
    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>) -> Result<IssuedSession, SessionError> {
        let expires_at = now + self.ttl;
        let claims = SessionClaims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.issuer.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(SessionError::Signing)?;

        Ok(IssuedSession { token, expires_at })
    }

    /// Verify a credential and return the authenticated user.
    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, SessionError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a credential as if the current time were `now`.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<AuthenticatedUser, SessionError> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Session credential rejected");
                SessionError::InvalidOrExpired
            })?;

        let claims = token_data.claims;
        if !claims.is_valid_at(now) {
            tracing::debug!(
                nbf = claims.nbf,
                exp = claims.exp,
                "Session credential outside its validity window"
            );
            return Err(SessionError::InvalidOrExpired);
        }

        Ok(AuthenticatedUser::from_claims(claims))
    }
}

/// Signature, algorithm, issuer and claim presence are checked by
/// `jsonwebtoken`; the time window is checked against an explicit clock in
/// [`SessionIssuer::verify_at`].
fn build_validation(issuer: &str) -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["sub", "iat", "nbf", "exp", "iss"]);
    validation.set_issuer(&[issuer]);
    validation
}
