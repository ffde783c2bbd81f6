use std::error::Error;

use mcserver::{load_registries, ServerConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    tracing::info!("Loading registries...");

    let config = ServerConfig::load()?;
    let catalogs = registry::install(load_registries(&config)?)?;

    tracing::info!(
        "Registries installed: {} blocks, {} materials, {} entity types.",
        catalogs.blocks.len(),
        catalogs.materials.len(),
        catalogs.entity_types.len()
    );

    Ok(())
}
