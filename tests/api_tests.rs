use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use hacktoberfest_checker::{config::AppConfig, create_app, AppState};
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot`

fn test_state() -> Arc<AppState> {
    let config = AppConfig {
        max_search_pages: 1,
        merge_check_concurrency_limit: 2,
        github_token: None,
        static_dir: None,
    };
    Arc::new(AppState::new(config).expect("Failed to create state"))
}

#[tokio::test]
async fn test_index_status() {
    // 1. Create app
    let app = create_app(test_state());

    // 2. Send request
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    // 3. Assert
    assert_eq!(response.status(), StatusCode::OK);

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body_json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    assert_eq!(body_json["status"], "200");
}

#[tokio::test]
async fn test_api_status() {
    let app = create_app(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body_json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();

    assert_eq!(body_json["status"], "API ok");
}

#[tokio::test]
async fn test_pull_requests_route_rejects_missing_body() {
    let app = create_app(test_state());

    // No body at all: axum rejects the request before the handler runs.
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/getPullRequestsData")
                .header("content-type", "application/json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_unmatched_route_is_404_without_static_dir() {
    let app = create_app(test_state());

    let response = app
        .oneshot(
            Request::builder()
                .uri("/some/frontend/route")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
