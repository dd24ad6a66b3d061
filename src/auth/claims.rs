// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session claims and authenticated user representation.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Claims carried by a session credential.
///
/// The set is fixed; tokens carrying other shapes fail to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,

    /// Issued at timestamp
    pub iat: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,
}

impl SessionClaims {
    /// Whether `now` lies inside `[nbf, exp]`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        let now = now.timestamp();
        self.nbf <= now && now <= self.exp
    }
}

/// Authenticated user information extracted from a verified session
/// credential.
///
/// The session gate stores this in request extensions; handlers read it
/// through the `Session` extractor.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Subject of the session credential
    pub user_id: String,

    /// Token expiration
    pub expires_at: DateTime<Utc>,
}

impl AuthenticatedUser {
    /// Create from verified claims.
    pub fn from_claims(claims: SessionClaims) -> Self {
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            user_id: claims.sub,
            expires_at,
        }
    }
}
