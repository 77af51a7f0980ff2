pub mod config;
pub mod fetcher;
pub mod github;
pub mod query;
pub mod records;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use config::AppConfig;
use fetcher::{PullRequestsResponse, RepositoriesResponse, UserDetailsResponse};
use github::GitHubClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

#[derive(Serialize)]
pub struct StatusResponse {
    status: &'static str,
}

#[derive(Deserialize)]
pub struct PullRequestsRequest {
    pub username: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReposQuery {
    #[serde(default = "default_repos_page")]
    pub page: u32,
    #[serde(default = "default_repos_per_page")]
    pub per_page: u8,
}

fn default_repos_page() -> u32 {
    1
}

fn default_repos_per_page() -> u8 {
    20
}

/// Shared application state accessible to all request handlers.
pub struct AppState {
    /// Client for the GitHub REST API, constructed once at startup.
    pub github: GitHubClient,
    /// Application configuration loaded from environment variables.
    pub config: AppConfig,
}

impl AppState {
    /// Initializes the application state, including the GitHub client.
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let github = GitHubClient::new(config.github_token.clone())?;
        Ok(Self { github, config })
    }
}

pub fn create_app(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/", get(get_index))
        .route("/api/v1/", get(get_api_status))
        .route("/api/v1/getPullRequestsData", post(get_pull_requests_data))
        .route("/api/v1/getHacktoberfestRepos", get(get_hacktoberfest_repos))
        .route("/api/v1/getUserDetails/{username}", get(get_user_details));

    // In production the built frontend is served for any unmatched route.
    if let Some(static_dir) = &state.config.static_dir {
        let serve_dir = ServeDir::new(static_dir)
            .not_found_service(ServeFile::new(format!("{static_dir}/index.html")));
        app = app.fallback_service(serve_dir);
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn get_index() -> Json<StatusResponse> {
    Json(StatusResponse { status: "200" })
}

pub async fn get_api_status() -> Json<StatusResponse> {
    Json(StatusResponse { status: "API ok" })
}

pub async fn get_pull_requests_data(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PullRequestsRequest>,
) -> Result<Json<PullRequestsResponse>, (StatusCode, String)> {
    match fetcher::fetch_pull_requests_data(&state.github, &state.config, &request.username).await {
        Ok(response) => {
            tracing::debug!(
                username = %request.username,
                count = response.data.len(),
                "Returning pull requests"
            );
            Ok(Json(response))
        }
        Err(e) => {
            tracing::error!("Failed to fetch PRs for {}: {}", request.username, e);
            Err(map_github_error(&e))
        }
    }
}

pub async fn get_hacktoberfest_repos(
    Query(params): Query<ReposQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<RepositoriesResponse>, (StatusCode, String)> {
    match fetcher::fetch_hacktoberfest_repos(&state.github, params.page, params.per_page).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::error!("Failed to fetch event repos (page {}): {}", params.page, e);
            Err(map_github_error(&e))
        }
    }
}

pub async fn get_user_details(
    Path(username): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<UserDetailsResponse>, (StatusCode, String)> {
    match fetcher::fetch_user_details(&state.github, &username).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::error!("Failed to fetch user details for {}: {}", username, e);
            Err(map_github_error(&e))
        }
    }
}

/// Maps an upstream failure to an HTTP status for the client.
fn map_github_error(e: &anyhow::Error) -> (StatusCode, String) {
    if let Some(octocrab::Error::GitHub { source, .. }) = e.downcast_ref::<octocrab::Error>() {
        let message = source.message.to_lowercase();
        if message.contains("rate limit") {
            return (
                StatusCode::TOO_MANY_REQUESTS,
                "GitHub Rate Limit Exceeded".to_string(),
            );
        }
        if message.contains("not found") {
            return (StatusCode::NOT_FOUND, "Not Found".to_string());
        }
    }

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal Server Error".to_string(),
    )
}
