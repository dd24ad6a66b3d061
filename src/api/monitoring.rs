// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{http::StatusCode, Json};

use crate::models::NotImplementedResponse;

#[utoipa::path(
    post,
    path = "/api/v1/monitoring/start",
    tag = "Monitoring",
    security(("api_key" = [])),
    responses((status = 501, body = NotImplementedResponse))
)]
pub async fn start_monitoring() -> (StatusCode, Json<NotImplementedResponse>) {
    tracing::info!("Start monitoring requested");
    (
        StatusCode::NOT_IMPLEMENTED,
        Json(NotImplementedResponse::new("Start monitoring not yet implemented")),
    )
}

#[utoipa::path(
    post,
    path = "/api/v1/monitoring/stop",
    tag = "Monitoring",
    security(("api_key" = [])),
    responses((status = 501, body = NotImplementedResponse))
)]
pub async fn stop_monitoring() -> (StatusCode, Json<NotImplementedResponse>) {
    tracing::info!("Stop monitoring requested");
    (
        StatusCode::NOT_IMPLEMENTED,
        Json(NotImplementedResponse::new("Stop monitoring not yet implemented")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn monitoring_endpoints_are_placeholders() {
        let (status, Json(body)) = start_monitoring().await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        assert!(body.creator_id.is_none());

        let (status, _) = stop_monitoring().await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    }
}
