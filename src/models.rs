// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures used by the REST API. All types derive
//! `ToSchema` for OpenAPI documentation.
//!
//! ## Model Categories
//!
//! - **Auth**: Two-phase sign-in requests and responses
//! - **Creators**: Cached creator metadata and pagination
//! - **Placeholders**: Bodies for endpoints that are not implemented yet

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// =============================================================================
// Auth Models
// =============================================================================

/// Response to `POST /api/v1/auth/initiate`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InitiateAuthResponse {
    /// Page where the user retrieves their platform token
    #[schema(example = "https://fansly.com/account/security")]
    pub url: String,
    /// Pending auth code to redeem within 10 minutes
    pub token: String,
}

/// Body of `POST /api/v1/auth/complete`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompleteAuthRequest {
    /// Pending auth code from the initiate step
    pub auth_token: String,
    /// Client user agent, recorded for diagnostics
    #[serde(default)]
    pub user_agent: String,
}

/// Response to a successful `POST /api/v1/auth/complete`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CompleteAuthResponse {
    /// Session credential for `Authorization: Bearer`
    pub token: String,
    /// Seconds until the credential expires
    #[schema(example = 86400)]
    pub expires_in: i64,
}

// =============================================================================
// Creator Models
// =============================================================================

/// A content creator as cached from the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Creator {
    pub id: String,
    pub name: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub is_verified: bool,
    pub is_following: bool,
    pub last_updated: DateTime<Utc>,
}

/// Pagination metadata for list responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PageMeta {
    /// Creators available before pagination
    pub total: usize,
    /// Creators in this page
    pub count: usize,
    pub per_page: usize,
    /// 1-based page number
    pub current_page: usize,
    pub total_pages: usize,
}

/// A page of creators.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatorPage {
    pub data: Vec<Creator>,
    pub meta: PageMeta,
}

// =============================================================================
// Placeholder Models
// =============================================================================

/// Body returned by endpoints that are not implemented yet (HTTP 501).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NotImplementedResponse {
    pub message: String,
    #[serde(rename = "creatorId", skip_serializing_if = "Option::is_none")]
    pub creator_id: Option<String>,
    #[serde(rename = "mediaId", skip_serializing_if = "Option::is_none")]
    pub media_id: Option<String>,
}

impl NotImplementedResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            creator_id: None,
            media_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_request_defaults_user_agent() {
        let request: CompleteAuthRequest =
            serde_json::from_str(r#"{"auth_token":"abc"}"#).unwrap();
        assert_eq!(request.auth_token, "abc");
        assert!(request.user_agent.is_empty());
    }

    #[test]
    fn creator_omits_missing_avatar() {
        let creator = Creator {
            id: "1".to_string(),
            name: "Example".to_string(),
            username: "example".to_string(),
            avatar_url: None,
            is_verified: true,
            is_following: false,
            last_updated: Utc::now(),
        };
        let json = serde_json::to_value(&creator).unwrap();
        assert!(json.get("avatar_url").is_none());
        assert_eq!(json["is_verified"], true);
    }

    #[test]
    fn not_implemented_uses_camel_case_ids() {
        let mut body = NotImplementedResponse::new("Get media not yet implemented");
        body.creator_id = Some("c1".to_string());
        body.media_id = Some("m1".to_string());

        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["creatorId"], "c1");
        assert_eq!(json["mediaId"], "m1");
    }
}
