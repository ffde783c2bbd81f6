use registry::{
    parse_blocks, parse_entity_types, parse_items, register_blocks, register_entity_types,
    register_items, Catalogs, KnownNames, Result,
};

pub mod config;

pub use config::ServerConfig;

/// Parses every registry document named by `config` and binds it to freshly seeded catalogs.
///
/// All documents are parsed before anything is bound, so a broken document never leaves
/// half-annotated catalogs behind.
pub fn load_registries(config: &ServerConfig) -> Result<Catalogs> {
    let names = KnownNames::from_path(&config.names_path)?;
    let blocks = parse_blocks(&config.blocks_path)?;
    let items = parse_items(&config.registries_path)?;
    let entity_types = parse_entity_types(&config.registries_path)?;

    let mut catalogs = names.seed_catalogs()?;
    let policy = config.bind_policy();

    let blocks = register_blocks(&mut catalogs.blocks, &blocks, policy)?;
    let items = register_items(&mut catalogs.materials, &catalogs.blocks, &items, policy)?;
    let entity_types = register_entity_types(&mut catalogs.entity_types, &entity_types, policy)?;

    tracing::info!(
        "Loaded registries: {} blocks ({} states), {} items, {} entity types.",
        blocks.bound,
        catalogs.blocks.state_count(),
        items.bound,
        entity_types.bound
    );

    Ok(catalogs)
}
