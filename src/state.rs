// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use chrono::Duration;

use crate::auth::{ApiKeyPolicy, PendingAuthStore, SessionError, SessionIssuer};
use crate::config::ServerConfig;
use crate::creators::{CreatorSource, MockCreatorSource};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub pending: Arc<PendingAuthStore>,
    pub sessions: Arc<SessionIssuer>,
    pub api_keys: Arc<ApiKeyPolicy>,
    pub creators: Arc<dyn CreatorSource>,
}

impl AppState {
    /// Build the state from validated configuration and the resolved
    /// credential secret.
    pub fn new(config: ServerConfig, secret: &[u8]) -> Result<Self, SessionError> {
        let sessions = SessionIssuer::new(secret)?
            .with_issuer(config.jwt_issuer.clone())
            .with_ttl(Duration::seconds(config.session_ttl_secs));
        let pending = PendingAuthStore::new(Duration::seconds(config.auth_code_ttl_secs));
        let api_keys = ApiKeyPolicy::from_keys(config.api_keys.clone());

        Ok(Self {
            config: Arc::new(config),
            pending: Arc::new(pending),
            sessions: Arc::new(sessions),
            api_keys: Arc::new(api_keys),
            creators: Arc::new(MockCreatorSource::new()),
        })
    }

    /// Replace the creator source.
    pub fn with_creator_source(mut self, source: Arc<dyn CreatorSource>) -> Self {
        self.creators = source;
        self
    }
}

#[cfg(test)]
impl AppState {
    pub(crate) fn for_tests() -> Self {
        Self::new(ServerConfig::default(), b"test-secret").expect("test state")
    }
}
