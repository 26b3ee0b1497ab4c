// Entry point for the editorial review service

use anyhow::{Context, Result};
use editorial::api::{build_router, AppState};
use editorial::config::AppConfig;
use editorial::lifecycle::ArticleLifecycleManager;
use editorial::roles::RegistryHandle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,editorial=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    let registry = config.registry().context("Invalid role weight configuration")?;
    tracing::info!(
        roles = ?registry.voting_roles(),
        total_weight = registry.total_weight(),
        "Role weights loaded"
    );

    let lifecycle = ArticleLifecycleManager::in_memory(RegistryHandle::new(registry));
    let app = build_router(AppState::new(lifecycle, config.conflict_retries));

    let addr = config.bind_addr();
    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
