// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    auth::Session,
    creators::{paginate, CreatorSourceError, ListParams, SortField, SortOrder},
    error::ApiError,
    models::{CreatorPage, NotImplementedResponse},
    state::AppState,
};

/// Query parameters for `GET /api/v1/creators`.
///
/// Numeric values are parsed leniently, so they are taken as strings.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListCreatorsQuery {
    /// Page size (default 20, max 100)
    pub limit: Option<String>,
    /// Creators to skip (default 0)
    pub offset: Option<String>,
    /// `name` or `last_updated` (default `name`)
    pub sort: Option<String>,
    /// `asc` or `desc` (default `asc`)
    pub order: Option<String>,
}

impl ListCreatorsQuery {
    fn params(&self) -> Result<ListParams, ApiError> {
        let sort = SortField::parse(self.sort.as_deref().unwrap_or("")).ok_or_else(|| {
            ApiError::bad_request("Invalid sort field. Must be one of: name, last_updated")
        })?;
        let order = SortOrder::parse(self.order.as_deref().unwrap_or(""))
            .ok_or_else(|| ApiError::bad_request("Invalid order. Must be one of: asc, desc"))?;

        Ok(ListParams {
            sort,
            order,
            ..ListParams::default()
        }
        .with_raw_paging(self.limit.as_deref(), self.offset.as_deref()))
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/creators",
    params(ListCreatorsQuery),
    tag = "Creators",
    security(("bearer" = [])),
    responses(
        (status = 200, body = CreatorPage),
        (status = 400, description = "Invalid sort or order"),
        (status = 401, description = "Missing or invalid session credential"),
        (status = 500, description = "Creator source failed")
    )
)]
pub async fn list_creators(
    Session(user): Session,
    State(state): State<AppState>,
    Query(query): Query<ListCreatorsQuery>,
) -> Result<Json<CreatorPage>, ApiError> {
    let params = query.params()?;

    tracing::info!(
        user_id = %user.user_id,
        limit = params.limit,
        offset = params.offset,
        sort = ?params.sort,
        order = ?params.order,
        "Listing creators"
    );

    let creators = state.creators.creators().map_err(|e: CreatorSourceError| {
        tracing::error!(error = %e, "Failed to get creators");
        ApiError::internal("Failed to fetch creators")
    })?;

    Ok(Json(paginate(creators, &params)))
}

#[utoipa::path(
    get,
    path = "/api/v1/creators/{creator_id}/content",
    params(("creator_id" = String, Path, description = "Creator ID")),
    tag = "Creators",
    security(("api_key" = [])),
    responses((status = 501, body = NotImplementedResponse))
)]
pub async fn get_creator_content(
    Path(creator_id): Path<String>,
) -> (StatusCode, Json<NotImplementedResponse>) {
    tracing::info!(creator_id = %creator_id, "Get creator content requested");

    let mut body = NotImplementedResponse::new("Get creator content not yet implemented");
    body.creator_id = Some(creator_id);
    (StatusCode::NOT_IMPLEMENTED, Json(body))
}

#[utoipa::path(
    get,
    path = "/api/v1/creators/{creator_id}/media/{media_id}",
    params(
        ("creator_id" = String, Path, description = "Creator ID"),
        ("media_id" = String, Path, description = "Media ID")
    ),
    tag = "Creators",
    security(("api_key" = [])),
    responses((status = 501, body = NotImplementedResponse))
)]
pub async fn get_media(
    Path((creator_id, media_id)): Path<(String, String)>,
) -> (StatusCode, Json<NotImplementedResponse>) {
    tracing::info!(creator_id = %creator_id, media_id = %media_id, "Get media requested");

    let mut body = NotImplementedResponse::new("Get media not yet implemented");
    body.creator_id = Some(creator_id);
    body.media_id = Some(media_id);
    (StatusCode::NOT_IMPLEMENTED, Json(body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthenticatedUser;
    use crate::creators::{CreatorSource, MockCreatorSource};
    use crate::models::Creator;
    use chrono::Utc;
    use std::sync::Arc;

    struct FailingSource;

    impl CreatorSource for FailingSource {
        fn creators(&self) -> Result<Vec<Creator>, CreatorSourceError> {
            Err(CreatorSourceError::NotAuthenticated)
        }
    }

    fn session() -> Session {
        Session(AuthenticatedUser {
            user_id: "user_test".to_string(),
            expires_at: Utc::now(),
        })
    }

    fn query(pairs: &[(&str, &str)]) -> ListCreatorsQuery {
        let mut q = ListCreatorsQuery::default();
        for (k, v) in pairs {
            let v = Some(v.to_string());
            match *k {
                "limit" => q.limit = v,
                "offset" => q.offset = v,
                "sort" => q.sort = v,
                "order" => q.order = v,
                _ => {}
            }
        }
        q
    }

    #[tokio::test]
    async fn list_creators_returns_sorted_page() {
        let state = AppState::for_tests().with_creator_source(Arc::new(MockCreatorSource::new()));

        let Json(page) = list_creators(
            session(),
            State(state),
            Query(query(&[("sort", "last_updated"), ("order", "desc")])),
        )
        .await
        .expect("list creators");

        assert_eq!(page.meta.total, 2);
        assert_eq!(page.meta.per_page, 20);
        assert_eq!(page.data[0].id, "2");
    }

    #[tokio::test]
    async fn list_creators_rejects_unknown_sort() {
        let err = list_creators(
            session(),
            State(AppState::for_tests()),
            Query(query(&[("sort", "followers")])),
        )
        .await
        .expect_err("invalid sort");

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            err.message,
            "Invalid sort field. Must be one of: name, last_updated"
        );
    }

    #[tokio::test]
    async fn list_creators_rejects_unknown_order() {
        let err = list_creators(
            session(),
            State(AppState::for_tests()),
            Query(query(&[("order", "sideways")])),
        )
        .await
        .expect_err("invalid order");

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn list_creators_reports_source_failure() {
        let state = AppState::for_tests().with_creator_source(Arc::new(FailingSource));

        let err = list_creators(session(), State(state), Query(query(&[])))
            .await
            .expect_err("source failure");

        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Failed to fetch creators");
    }

    #[tokio::test]
    async fn placeholders_return_501() {
        let (status, Json(body)) = get_media(Path(("c1".to_string(), "m1".to_string()))).await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(body.media_id.as_deref(), Some("m1"));

        let (status, Json(body)) = get_creator_content(Path("c1".to_string())).await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(body.creator_id.as_deref(), Some("c1"));
    }
}
