use std::fmt::Display;

use getset::{CopyGetters, Getters};

use crate::error::{RegistryError, Result};

/// Numeric identifier of a block state on the wire.
pub type StateId = u16;

/// Numeric identifier of an item or entity type on the wire.
pub type ProtocolId = u16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    Block,
    Item,
    EntityType,
}

impl CatalogKind {
    /// Key of this catalog's object inside a registries document.
    pub fn registry_key(self) -> &'static str {
        match self {
            CatalogKind::Block => "minecraft:block",
            CatalogKind::Item => "minecraft:item",
            CatalogKind::EntityType => "minecraft:entity_type",
        }
    }
}

impl Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            CatalogKind::Block => "block",
            CatalogKind::Item => "item",
            CatalogKind::EntityType => "entity type",
        })
    }
}

/// A block type with every state permutation of its properties.
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct RegistryBlock {
    #[getset(get = "pub")]
    name: String,
    /// Property names in declaration order.
    #[getset(get = "pub")]
    properties_identifiers: Vec<String>,
    /// Allowed values of each property, aligned with `properties_identifiers`.
    #[getset(get = "pub")]
    properties_allowed_values: Vec<Vec<String>>,
    #[getset(get = "pub")]
    states: Vec<BlockState>,
    #[getset(get_copy = "pub")]
    default_id: StateId,
    #[getset(get = "pub")]
    default_properties_values: Vec<String>,
    default_index: usize,
}

impl RegistryBlock {
    /// Assembles a block, picking up its default state.
    ///
    /// Fails unless exactly one state is marked default and every state carries one value
    /// per declared property.
    pub(crate) fn new(
        name: String,
        properties: Vec<(String, Vec<String>)>,
        states: Vec<BlockState>,
    ) -> Result<Self> {
        let (properties_identifiers, properties_allowed_values): (Vec<_>, Vec<_>) =
            properties.into_iter().unzip();

        if let Some(state) = states
            .iter()
            .find(|state| state.properties_values.len() != properties_identifiers.len())
        {
            return Err(RegistryError::malformed(
                &name,
                format!(
                    "state {} has {} property values, block declares {}",
                    state.id,
                    state.properties_values.len(),
                    properties_identifiers.len()
                ),
            ));
        }

        let mut defaults = states
            .iter()
            .enumerate()
            .filter(|(_, state)| state.is_default);
        let (default_index, default) = match (defaults.next(), defaults.next()) {
            (Some(default), None) => default,
            (None, _) => return Err(RegistryError::malformed(&name, "no default state")),
            (Some((_, first)), Some((_, second))) => {
                return Err(RegistryError::malformed(
                    &name,
                    format!(
                        "states {} and {} are both marked default",
                        first.id, second.id
                    ),
                ))
            }
        };
        let default_id = default.id;
        let default_properties_values = default.properties_values.clone();

        Ok(Self {
            name,
            properties_identifiers,
            properties_allowed_values,
            states,
            default_id,
            default_properties_values,
            default_index,
        })
    }

    pub fn default_state(&self) -> &BlockState {
        &self.states[self.default_index]
    }

    /// Looks up the state whose property values match `values` positionally.
    pub fn state_with<S: AsRef<str>>(&self, values: &[S]) -> Option<&BlockState> {
        self.states.iter().find(|state| state.matches(values))
    }
}

/// One property-value permutation of a [`RegistryBlock`].
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct BlockState {
    #[getset(get_copy = "pub")]
    id: StateId,
    #[getset(get_copy = "pub")]
    is_default: bool,
    /// Values aligned with the owning block's property identifiers.
    #[getset(get = "pub")]
    properties_values: Vec<String>,
}

impl BlockState {
    pub(crate) fn new(id: StateId, is_default: bool, properties_values: Vec<String>) -> Self {
        Self {
            id,
            is_default,
            properties_values,
        }
    }

    pub fn matches<S: AsRef<str>>(&self, values: &[S]) -> bool {
        self.properties_values.len() == values.len()
            && self
                .properties_values
                .iter()
                .zip(values)
                .all(|(own, other)| own == other.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct RegistryItem {
    #[getset(get = "pub")]
    name: String,
    #[getset(get_copy = "pub")]
    item_id: ProtocolId,
}

#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct RegistryEntityType {
    #[getset(get = "pub")]
    name: String,
    #[getset(get_copy = "pub")]
    entity_id: ProtocolId,
}

/// A record of a catalog listed under `entries` with a `protocol_id`.
pub(crate) trait ProtocolEntry: Sized {
    const KIND: CatalogKind;

    fn new(name: String, id: ProtocolId) -> Self;
}

impl ProtocolEntry for RegistryItem {
    const KIND: CatalogKind = CatalogKind::Item;

    fn new(name: String, item_id: ProtocolId) -> Self {
        Self { name, item_id }
    }
}

impl ProtocolEntry for RegistryEntityType {
    const KIND: CatalogKind = CatalogKind::EntityType;

    fn new(name: String, entity_id: ProtocolId) -> Self {
        Self { name, entity_id }
    }
}
