use repochat_server::{AppConfig, AppState, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "repochat_server=info,tower_http=info".into()),
        )
        .init();

    let config = AppConfig::from_env();
    if config.github_token.is_none() {
        tracing::warn!("GITHUB_TOKEN not set — unauthenticated GitHub API rate limits apply");
    }
    tracing::info!("agent service at {}", config.agent_base_url);

    let state = AppState::new(&config);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!("listening on 0.0.0.0:{}", config.port);
    axum::serve(listener, app).await?;

    Ok(())
}
