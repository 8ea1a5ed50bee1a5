use anyhow::Context;

use pharmacie_infra::{AppConfig, ConfiguredCatalog, ConfiguredTransport};
use pharmacie_replenishment::RunCoordinator;

/// Coordinator wired with the backends chosen by configuration.
pub type AppCoordinator = RunCoordinator<ConfiguredCatalog, ConfiguredTransport>;

/// Select storage and transport once, at startup.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppCoordinator> {
    let catalog = ConfiguredCatalog::from_config(config)
        .await
        .context("failed to initialise catalog storage")?;
    let transport = ConfiguredTransport::from_backend(&config.mail)
        .context("failed to initialise mail transport")?;
    tracing::info!(transport = transport.name(), "mail transport selected");

    Ok(RunCoordinator::new(catalog, transport))
}
