// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::{require_api_key, require_session, AuthenticatedUser},
    models::{
        CompleteAuthRequest, CompleteAuthResponse, Creator, CreatorPage, InitiateAuthResponse,
        NotImplementedResponse, PageMeta,
    },
    state::AppState,
};

pub mod auth;
pub mod creators;
pub mod health;
pub mod monitoring;

pub const REQUEST_TIMEOUT_SECS: u64 = 60;

pub fn router(state: AppState) -> Router {
    let public_routes = Router::<AppState>::new()
        .route("/", get(health::health))
        .route("/health", get(health::health))
        .route("/api/v1/health", get(health::health))
        .route("/api/v1/auth/initiate", post(auth::initiate))
        .route("/api/v1/auth/complete", post(auth::complete));

    let session_routes = Router::<AppState>::new()
        .route("/api/v1/creators", get(creators::list_creators))
        .route_layer(from_fn_with_state(state.clone(), require_session));

    let api_key_routes = Router::<AppState>::new()
        .route(
            "/api/v1/creators/{creator_id}/content",
            get(creators::get_creator_content),
        )
        .route(
            "/api/v1/creators/{creator_id}/media/{media_id}",
            get(creators::get_media),
        )
        .route("/api/v1/monitoring/start", post(monitoring::start_monitoring))
        .route("/api/v1/monitoring/stop", post(monitoring::stop_monitoring))
        .route_layer(from_fn_with_state(state.clone(), require_api_key));

    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-");
            // Path only: the query may carry an API key.
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                path = %request.uri().path(),
                request_id = %request_id,
            )
        }))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        ))
        .layer(CorsLayer::permissive());

    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .merge(api_key_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(middleware)
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("X-API-Key"))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::initiate,
        auth::complete,
        creators::list_creators,
        creators::get_creator_content,
        creators::get_media,
        monitoring::start_monitoring,
        monitoring::stop_monitoring
    ),
    components(
        schemas(
            health::HealthResponse,
            InitiateAuthResponse,
            CompleteAuthRequest,
            CompleteAuthResponse,
            Creator,
            CreatorPage,
            PageMeta,
            NotImplementedResponse,
            AuthenticatedUser
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness probes"),
        (name = "Auth", description = "Two-phase sign-in"),
        (name = "Creators", description = "Creator metadata"),
        (name = "Monitoring", description = "Content monitoring control")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
    use serde_json::Value;
    use tower::ServiceExt;

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn sign_in(app: &Router) -> String {
        let (status, initiated) = send(app, post_json("/api/v1/auth/initiate", "")).await;
        assert_eq!(status, StatusCode::OK);
        let code = initiated["token"].as_str().unwrap().to_string();

        let body = serde_json::json!({ "auth_token": code, "user_agent": "tests" }).to_string();
        let (status, completed) = send(app, post_json("/api/v1/auth/complete", &body)).await;
        assert_eq!(status, StatusCode::OK);
        completed["token"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn router_builds_with_all_routes() {
        let app = router(AppState::for_tests());
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn health_paths_are_public() {
        let app = router(AppState::for_tests());
        for path in ["/", "/health", "/api/v1/health"] {
            let (status, body) = send(&app, get_request(path)).await;
            assert_eq!(status, StatusCode::OK, "{path}");
            assert_eq!(body, serde_json::json!({ "status": "ok" }));
        }
    }

    #[tokio::test]
    async fn sign_in_then_list_creators() {
        let app = router(AppState::for_tests());
        let token = sign_in(&app).await;

        let request = Request::builder()
            .uri("/api/v1/creators?sort=last_updated&order=desc&limit=1")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let (status, page) = send(&app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["data"].as_array().unwrap().len(), 1);
        assert_eq!(page["data"][0]["username"], "creator2");
        assert_eq!(page["meta"]["total"], 2);
        assert_eq!(page["meta"]["total_pages"], 2);
    }

    #[tokio::test]
    async fn complete_reports_session_lifetime() {
        let app = router(AppState::for_tests());
        let (_, initiated) = send(&app, post_json("/api/v1/auth/initiate", "")).await;
        let body = serde_json::json!({ "auth_token": initiated["token"] }).to_string();

        let (status, completed) = send(&app, post_json("/api/v1/auth/complete", &body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(completed["expires_in"], 86_400);
    }

    #[tokio::test]
    async fn auth_code_cannot_be_reused() {
        let app = router(AppState::for_tests());
        let (_, initiated) = send(&app, post_json("/api/v1/auth/initiate", "")).await;
        let body = serde_json::json!({ "auth_token": initiated["token"] }).to_string();

        let (first, _) = send(&app, post_json("/api/v1/auth/complete", &body)).await;
        assert_eq!(first, StatusCode::OK);

        let (second, err) = send(&app, post_json("/api/v1/auth/complete", &body)).await;
        assert_eq!(second, StatusCode::UNAUTHORIZED);
        assert_eq!(err["error"], "Invalid or expired authentication token");
    }

    #[tokio::test]
    async fn unknown_auth_code_is_rejected() {
        let app = router(AppState::for_tests());
        let (status, err) = send(
            &app,
            post_json("/api/v1/auth/complete", r#"{"auth_token":"never-issued"}"#),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(err["error"], "Invalid or expired authentication token");
    }

    #[tokio::test]
    async fn malformed_complete_body_is_bad_request() {
        let app = router(AppState::for_tests());
        let (status, err) = send(&app, post_json("/api/v1/auth/complete", "{not json")).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(err["error"], "Invalid request");
    }

    #[tokio::test]
    async fn creators_require_session() {
        let app = router(AppState::for_tests());

        let (status, err) = send(&app, get_request("/api/v1/creators")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(err["error"], "Authorization header is required");

        let request = Request::builder()
            .uri("/api/v1/creators")
            .header(AUTHORIZATION, "Bearer not-a-credential")
            .body(Body::empty())
            .unwrap();
        let (status, err) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(err["error"], "Invalid or expired token");
    }

    #[tokio::test]
    async fn invalid_sort_is_bad_request() {
        let app = router(AppState::for_tests());
        let token = sign_in(&app).await;

        let request = Request::builder()
            .uri("/api/v1/creators?sort=popularity")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let (status, err) = send(&app, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            err["error"],
            "Invalid sort field. Must be one of: name, last_updated"
        );
    }

    #[tokio::test]
    async fn placeholders_require_api_key() {
        let app = router(AppState::for_tests());

        let (status, err) = send(&app, get_request("/api/v1/creators/c1/content")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(err["error"], "Invalid or missing API key");

        let request = Request::builder()
            .uri("/api/v1/creators/c1/media/m9")
            .header("x-api-key", "local-key")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(body["creatorId"], "c1");
        assert_eq!(body["mediaId"], "m9");

        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/monitoring/start?api_key=local-key")
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, request).await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let app = router(AppState::for_tests());
        let response = app.oneshot(get_request("/health")).await.unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[test]
    fn openapi_declares_security_schemes() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer"));
        assert!(components.security_schemes.contains_key("api_key"));
        assert!(doc.paths.paths.contains_key("/api/v1/creators"));
    }
}
