use crate::{
    catalog::{BlockCatalog, EntityTypeCatalog, MaterialCatalog},
    error::{RegistryError, Result},
    record::{CatalogKind, RegistryBlock, RegistryEntityType, RegistryItem},
};

/// What to do with a record naming an entry the runtime catalog does not have.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BindPolicy {
    /// Fail the pass with [`RegistryError::UnknownEntry`].
    #[default]
    Strict,
    /// Log the record and carry on.
    Skip,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BindReport {
    pub bound: usize,
    pub skipped: usize,
}

impl BindReport {
    fn resolve<H>(
        &mut self,
        handle: Option<H>,
        kind: CatalogKind,
        name: &str,
        policy: BindPolicy,
    ) -> Result<Option<H>> {
        match (handle, policy) {
            (Some(handle), _) => {
                self.bound += 1;
                Ok(Some(handle))
            }
            (None, BindPolicy::Strict) => Err(RegistryError::UnknownEntry {
                kind,
                name: name.to_owned(),
            }),
            (None, BindPolicy::Skip) => {
                tracing::warn!("Skipping {} {}, it has no runtime counterpart.", kind, name);
                self.skipped += 1;
                Ok(None)
            }
        }
    }
}

/// Initializes every block with its default state and registers all of its states.
pub fn register_blocks<C>(
    catalog: &mut C,
    blocks: &[RegistryBlock],
    policy: BindPolicy,
) -> Result<BindReport>
where
    C: BlockCatalog,
{
    let mut report = BindReport::default();

    for registry_block in blocks {
        let name = registry_block.name();
        let Some(block) = report.resolve(catalog.resolve(name), CatalogKind::Block, name, policy)?
        else {
            continue;
        };

        catalog.init_block(block, registry_block.default_id());
        for state in registry_block.states() {
            catalog.add_block_alternative(block, state.id(), state.properties_values());
        }
    }

    tracing::debug!(
        "Registered {} blocks ({} skipped).",
        report.bound,
        report.skipped
    );

    Ok(report)
}

/// Assigns protocol ids to materials, attaching the block of the same name when there is one.
///
/// Must run after [`register_blocks`] filled `blocks`.
pub fn register_items<M, B>(
    materials: &mut M,
    blocks: &B,
    items: &[RegistryItem],
    policy: BindPolicy,
) -> Result<BindReport>
where
    M: MaterialCatalog<Block = B::Handle>,
    B: BlockCatalog,
{
    let mut report = BindReport::default();

    for item in items {
        let name = item.name();
        let Some(material) =
            report.resolve(materials.resolve(name), CatalogKind::Item, name, policy)?
        else {
            continue;
        };

        materials.set_identifier(material, item.item_id(), blocks.resolve(name));
    }

    tracing::debug!(
        "Registered {} items ({} skipped).",
        report.bound,
        report.skipped
    );

    Ok(report)
}

pub fn register_entity_types<C>(
    catalog: &mut C,
    entity_types: &[RegistryEntityType],
    policy: BindPolicy,
) -> Result<BindReport>
where
    C: EntityTypeCatalog,
{
    let mut report = BindReport::default();

    for registry_entity_type in entity_types {
        let name = registry_entity_type.name();
        let Some(entity_type) = report.resolve(
            catalog.resolve(name),
            CatalogKind::EntityType,
            name,
            policy,
        )?
        else {
            continue;
        };

        catalog.set_identifier(entity_type, registry_entity_type.entity_id());
    }

    tracing::debug!(
        "Registered {} entity types ({} skipped).",
        report.bound,
        report.skipped
    );

    Ok(report)
}
