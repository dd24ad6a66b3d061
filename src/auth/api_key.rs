// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! API key lookup and acceptance policy for machine-to-machine routes.

use std::collections::HashSet;

use axum::http::HeaderMap;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Query parameter used when the header is absent.
pub const API_KEY_QUERY_PARAM: &str = "api_key";

/// Paths reachable without a key (health checks).
const PUBLIC_PATHS: &[&str] = &["/", "/health", "/api/v1/health"];

/// Path prefixes reachable without a key (the sign-in flow).
const PUBLIC_PREFIXES: &[&str] = &["/api/v1/auth/"];

/// Whether `path` bypasses the API key gate.
pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path) || PUBLIC_PREFIXES.iter().any(|p| path.starts_with(p))
}

/// Read the API key from the header, falling back to the query string.
///
/// Empty values count as absent.
pub fn extract_api_key(headers: &HeaderMap, query: Option<&str>) -> Option<String> {
    let from_header = headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    if let Some(key) = from_header {
        return Some(key.to_string());
    }

    query.and_then(|q| {
        url::form_urlencoded::parse(q.as_bytes())
            .find(|(name, _)| name == API_KEY_QUERY_PARAM)
            .map(|(_, value)| value.into_owned())
            .filter(|v| !v.is_empty())
    })
}

/// Which API keys are accepted.
#[derive(Debug, Clone, Default)]
pub enum ApiKeyPolicy {
    /// Any non-empty key. Placeholder until keys come from a managed store.
    #[default]
    AnyNonEmpty,
    /// Only keys in a static allow-list.
    AllowList(HashSet<String>),
}

impl ApiKeyPolicy {
    /// Build a policy from an optional list of configured keys.
    pub fn from_keys(keys: Option<Vec<String>>) -> Self {
        match keys {
            Some(keys) if !keys.is_empty() => ApiKeyPolicy::AllowList(keys.into_iter().collect()),
            _ => ApiKeyPolicy::AnyNonEmpty,
        }
    }

    pub fn accepts(&self, key: &str) -> bool {
        if key.is_empty() {
            return false;
        }
        match self {
            ApiKeyPolicy::AnyNonEmpty => true,
            ApiKeyPolicy::AllowList(keys) => keys.contains(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn health_and_auth_paths_are_public() {
        assert!(is_public_path("/"));
        assert!(is_public_path("/health"));
        assert!(is_public_path("/api/v1/health"));
        assert!(is_public_path("/api/v1/auth/initiate"));
        assert!(is_public_path("/api/v1/auth/complete"));

        assert!(!is_public_path("/api/v1/creators"));
        assert!(!is_public_path("/api/v1/healthz"));
        assert!(!is_public_path("/api/v1/auth"));
    }

    #[test]
    fn header_takes_precedence_over_query() {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_static("from-header"));

        let key = extract_api_key(&headers, Some("api_key=from-query"));
        assert_eq!(key.as_deref(), Some("from-header"));
    }

    #[test]
    fn query_is_used_when_header_missing_or_empty() {
        let mut headers = HeaderMap::new();
        assert_eq!(
            extract_api_key(&headers, Some("limit=5&api_key=k%201")).as_deref(),
            Some("k 1")
        );

        headers.insert(API_KEY_HEADER, HeaderValue::from_static(""));
        assert_eq!(
            extract_api_key(&headers, Some("api_key=q")).as_deref(),
            Some("q")
        );
    }

    #[test]
    fn missing_key_is_none() {
        let headers = HeaderMap::new();
        assert_eq!(extract_api_key(&headers, None), None);
        assert_eq!(extract_api_key(&headers, Some("api_key=")), None);
        assert_eq!(extract_api_key(&headers, Some("other=1")), None);
    }

    #[test]
    fn default_policy_accepts_any_non_empty_key() {
        let policy = ApiKeyPolicy::default();
        assert!(policy.accepts("anything"));
        assert!(!policy.accepts(""));
    }

    #[test]
    fn allow_list_policy_rejects_unknown_keys() {
        let policy = ApiKeyPolicy::from_keys(Some(vec!["k1".to_string(), "k2".to_string()]));
        assert!(policy.accepts("k1"));
        assert!(!policy.accepts("k3"));

        assert!(matches!(
            ApiKeyPolicy::from_keys(Some(Vec::new())),
            ApiKeyPolicy::AnyNonEmpty
        ));
    }
}
