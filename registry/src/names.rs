use std::path::Path;

use getset::Getters;
use serde::Deserialize;

use crate::{
    catalog::{BlockTable, Catalogs, EntityTypeTable, MaterialTable},
    error::Result,
    identifier::normalize_name,
    parse::read_document,
};

/// The names every runtime catalog is seeded with, as listed by a registries name dump
/// (`{"block": [...], "item": [...], "entity_type": [...]}`).
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq, Getters)]
#[get = "pub"]
pub struct KnownNames {
    #[serde(default)]
    block: Vec<String>,
    #[serde(default)]
    item: Vec<String>,
    #[serde(default)]
    entity_type: Vec<String>,
}

impl KnownNames {
    pub fn new(block: Vec<String>, item: Vec<String>, entity_type: Vec<String>) -> Self {
        Self {
            block,
            item,
            entity_type,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = read_document(path.as_ref())?;
        Self::from_slice(&bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Builds empty catalogs holding every known name.
    pub fn seed_catalogs(&self) -> Result<Catalogs> {
        let catalogs = Catalogs {
            blocks: BlockTable::from_names(normalize_all(&self.block)?),
            materials: MaterialTable::from_names(normalize_all(&self.item)?),
            entity_types: EntityTypeTable::from_names(normalize_all(&self.entity_type)?),
        };

        tracing::debug!(
            "Seeded catalogs with {} blocks, {} materials and {} entity types.",
            catalogs.blocks.len(),
            catalogs.materials.len(),
            catalogs.entity_types.len()
        );

        Ok(catalogs)
    }
}

fn normalize_all(names: &[String]) -> Result<Vec<String>> {
    names
        .iter()
        .map(|name| normalize_name(name).map_err(Into::into))
        .collect()
}
