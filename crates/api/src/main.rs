use anyhow::Context;

use pharmacie_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pharmacie_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let coordinator = pharmacie_api::app::services::build_services(&config).await?;

    let app = pharmacie_api::app::build_app(coordinator);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
