pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::{
    Router,
    extract::FromRef,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use repochat_agent_client::{AgentClient, DEFAULT_AGENT_BASE};
use repochat_github::GithubClient;

/// Server configuration, read once from the environment at startup and never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub github_token: Option<String>,
    pub agent_base_url: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let github_token = std::env::var("GITHUB_TOKEN").ok().filter(|s| !s.is_empty());
        let agent_base_url = std::env::var("AGENT_SERVICE_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_AGENT_BASE.to_string());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5000);
        Self {
            github_token,
            agent_base_url,
            port,
        }
    }
}

/// Application state shared across all handlers: the two long-lived upstream
/// clients.
#[derive(Clone)]
pub struct AppState {
    pub github: Arc<GithubClient>,
    pub agent: Arc<AgentClient>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            github: Arc::new(GithubClient::new(config.github_token.clone())),
            agent: Arc::new(AgentClient::new(&config.agent_base_url)),
        }
    }
}

impl FromRef<AppState> for Arc<GithubClient> {
    fn from_ref(state: &AppState) -> Self {
        state.github.clone()
    }
}

impl FromRef<AppState> for Arc<AgentClient> {
    fn from_ref(state: &AppState) -> Self {
        state.agent.clone()
    }
}

/// Build the application router with CORS, tracing and all routes attached.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .route("/source-code", get(routes::github::source_code))
        .route("/validate-github-url", post(routes::github::validate_url))
        .route("/gather-files", post(routes::github::gather_files))
        .route("/check-session", post(routes::agent::check_session))
        .route("/create-session", post(routes::agent::create_session))
        .route("/chat", post(routes::agent::chat))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
