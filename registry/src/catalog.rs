//! Runtime catalogs annotated by the binder.
//!
//! Each table is seeded once with the fixed set of names the server knows about and never
//! grows afterwards. Binding fills in protocol identifiers and block states, after which the
//! tables are frozen with [`install`] and only read.

use std::{collections::HashMap, fmt::Debug, ops::Deref, sync::OnceLock};

use getset::{CopyGetters, Getters};
use thiserror::Error;

use crate::record::{ProtocolId, StateId};

/// Block side of the binder: resolves names and records state permutations.
pub trait BlockCatalog {
    type Handle: Copy;

    fn resolve(&self, name: &str) -> Option<Self::Handle>;

    fn init_block(&mut self, block: Self::Handle, default_id: StateId);

    /// Registers `properties_values` as the state `id` of `block`.
    fn add_block_alternative(
        &mut self,
        block: Self::Handle,
        id: StateId,
        properties_values: &[String],
    );
}

pub trait MaterialCatalog {
    type Handle: Copy;
    type Block: Copy;

    fn resolve(&self, name: &str) -> Option<Self::Handle>;

    fn set_identifier(
        &mut self,
        material: Self::Handle,
        id: ProtocolId,
        block: Option<Self::Block>,
    );
}

pub trait EntityTypeCatalog {
    type Handle: Copy;

    fn resolve(&self, name: &str) -> Option<Self::Handle>;

    fn set_identifier(&mut self, entity_type: Self::Handle, id: ProtocolId);
}

/// An entry of a [`NamedTable`], addressed by its own handle type.
pub trait CatalogEntry: Debug + Clone {
    type Handle: Copy + Debug;

    fn with_name(name: String) -> Self;

    fn handle(index: usize) -> Self::Handle;

    fn index(handle: Self::Handle) -> usize;
}

/// Entries seeded from a fixed list of names, looked up by name or handle.
#[derive(Debug, Clone)]
pub struct NamedTable<E: CatalogEntry> {
    entries: Vec<E>,
    by_name: HashMap<String, E::Handle>,
}

impl<E: CatalogEntry> Default for NamedTable<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            by_name: HashMap::new(),
        }
    }
}

impl<E: CatalogEntry> NamedTable<E> {
    /// Seeds the table with `names`. Repeated names map to their first handle.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for name in names {
            let name = name.into();
            if table.by_name.contains_key(&name) {
                continue;
            }
            table
                .by_name
                .insert(name.clone(), E::handle(table.entries.len()));
            table.entries.push(E::with_name(name));
        }
        table
    }

    pub fn get(&self, name: &str) -> Option<E::Handle> {
        self.by_name.get(name).copied()
    }

    pub fn entry(&self, handle: E::Handle) -> &E {
        &self.entries[E::index(handle)]
    }

    fn entry_mut(&mut self, handle: E::Handle) -> &mut E {
        &mut self.entries[E::index(handle)]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (E::Handle, &E)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (E::handle(i), entry))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockHandle(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialHandle(u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityTypeHandle(u32);

/// A concrete state of a block, as registered by the binder.
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct BlockAlternative {
    #[getset(get_copy = "pub")]
    id: StateId,
    #[getset(get = "pub")]
    properties_values: Vec<String>,
}

#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct BlockEntry {
    #[getset(get = "pub")]
    name: String,
    /// `None` until the binder initializes the block.
    #[getset(get_copy = "pub")]
    default_id: Option<StateId>,
    #[getset(get = "pub")]
    alternatives: Vec<BlockAlternative>,
    by_properties: HashMap<Vec<String>, StateId>,
}

impl CatalogEntry for BlockEntry {
    type Handle = BlockHandle;

    fn with_name(name: String) -> Self {
        Self {
            name,
            default_id: None,
            alternatives: Vec::new(),
            by_properties: HashMap::new(),
        }
    }

    fn handle(index: usize) -> BlockHandle {
        BlockHandle(index as u32)
    }

    fn index(handle: BlockHandle) -> usize {
        handle.0 as usize
    }
}

/// Blocks with their states, indexed by property values and by state id.
#[derive(Debug, Clone, Default)]
pub struct BlockTable {
    names: NamedTable<BlockEntry>,
    by_state: HashMap<StateId, (BlockHandle, usize)>,
}

impl BlockTable {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: NamedTable::from_names(names),
            by_state: HashMap::new(),
        }
    }

    pub fn default_state_id(&self, block: BlockHandle) -> Option<StateId> {
        self.entry(block).default_id
    }

    pub fn alternatives(&self, block: BlockHandle) -> &[BlockAlternative] {
        &self.entry(block).alternatives
    }

    /// The state of `block` whose property values are exactly `values`.
    pub fn state_id_for<S: AsRef<str>>(&self, block: BlockHandle, values: &[S]) -> Option<StateId> {
        let key: Vec<String> = values.iter().map(|v| v.as_ref().to_owned()).collect();
        self.entry(block).by_properties.get(&key).copied()
    }

    pub fn block_of(&self, state: StateId) -> Option<BlockHandle> {
        self.by_state.get(&state).map(|&(block, _)| block)
    }

    pub fn alternative(&self, state: StateId) -> Option<&BlockAlternative> {
        self.by_state
            .get(&state)
            .map(|&(block, index)| &self.entry(block).alternatives[index])
    }

    pub fn properties_of(&self, state: StateId) -> Option<&[String]> {
        self.alternative(state)
            .map(|alternative| alternative.properties_values.as_slice())
    }

    pub fn state_count(&self) -> usize {
        self.by_state.len()
    }
}

impl Deref for BlockTable {
    type Target = NamedTable<BlockEntry>;

    fn deref(&self) -> &Self::Target {
        &self.names
    }
}

impl BlockCatalog for BlockTable {
    type Handle = BlockHandle;

    fn resolve(&self, name: &str) -> Option<BlockHandle> {
        self.get(name)
    }

    fn init_block(&mut self, block: BlockHandle, default_id: StateId) {
        self.names.entry_mut(block).default_id = Some(default_id);
    }

    fn add_block_alternative(
        &mut self,
        block: BlockHandle,
        id: StateId,
        properties_values: &[String],
    ) {
        let entry = self.names.entry_mut(block);
        entry.by_properties.insert(properties_values.to_vec(), id);
        entry.alternatives.push(BlockAlternative {
            id,
            properties_values: properties_values.to_vec(),
        });
        self.by_state.insert(id, (block, entry.alternatives.len() - 1));
    }
}

#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct MaterialEntry {
    #[getset(get = "pub")]
    name: String,
    #[getset(get_copy = "pub")]
    protocol_id: Option<ProtocolId>,
    /// The block placed by this material, if it is placeable.
    #[getset(get_copy = "pub")]
    block: Option<BlockHandle>,
}

impl CatalogEntry for MaterialEntry {
    type Handle = MaterialHandle;

    fn with_name(name: String) -> Self {
        Self {
            name,
            protocol_id: None,
            block: None,
        }
    }

    fn handle(index: usize) -> MaterialHandle {
        MaterialHandle(index as u32)
    }

    fn index(handle: MaterialHandle) -> usize {
        handle.0 as usize
    }
}

#[derive(Debug, Clone, Default)]
pub struct MaterialTable {
    names: NamedTable<MaterialEntry>,
    by_protocol_id: HashMap<ProtocolId, MaterialHandle>,
}

impl MaterialTable {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: NamedTable::from_names(names),
            by_protocol_id: HashMap::new(),
        }
    }

    pub fn by_protocol_id(&self, id: ProtocolId) -> Option<MaterialHandle> {
        self.by_protocol_id.get(&id).copied()
    }

    pub fn block_of(&self, material: MaterialHandle) -> Option<BlockHandle> {
        self.entry(material).block
    }

    pub fn is_block(&self, material: MaterialHandle) -> bool {
        self.entry(material).block.is_some()
    }
}

impl Deref for MaterialTable {
    type Target = NamedTable<MaterialEntry>;

    fn deref(&self) -> &Self::Target {
        &self.names
    }
}

impl MaterialCatalog for MaterialTable {
    type Handle = MaterialHandle;
    type Block = BlockHandle;

    fn resolve(&self, name: &str) -> Option<MaterialHandle> {
        self.get(name)
    }

    fn set_identifier(
        &mut self,
        material: MaterialHandle,
        id: ProtocolId,
        block: Option<BlockHandle>,
    ) {
        let entry = self.names.entry_mut(material);
        if let Some(previous) = entry.protocol_id.replace(id) {
            self.by_protocol_id.remove(&previous);
        }
        entry.block = block;
        self.by_protocol_id.insert(id, material);
    }
}

#[derive(Debug, Clone, Getters, CopyGetters)]
pub struct EntityTypeEntry {
    #[getset(get = "pub")]
    name: String,
    #[getset(get_copy = "pub")]
    protocol_id: Option<ProtocolId>,
}

impl CatalogEntry for EntityTypeEntry {
    type Handle = EntityTypeHandle;

    fn with_name(name: String) -> Self {
        Self {
            name,
            protocol_id: None,
        }
    }

    fn handle(index: usize) -> EntityTypeHandle {
        EntityTypeHandle(index as u32)
    }

    fn index(handle: EntityTypeHandle) -> usize {
        handle.0 as usize
    }
}

#[derive(Debug, Clone, Default)]
pub struct EntityTypeTable {
    names: NamedTable<EntityTypeEntry>,
    by_protocol_id: HashMap<ProtocolId, EntityTypeHandle>,
}

impl EntityTypeTable {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: NamedTable::from_names(names),
            by_protocol_id: HashMap::new(),
        }
    }

    pub fn by_protocol_id(&self, id: ProtocolId) -> Option<EntityTypeHandle> {
        self.by_protocol_id.get(&id).copied()
    }
}

impl Deref for EntityTypeTable {
    type Target = NamedTable<EntityTypeEntry>;

    fn deref(&self) -> &Self::Target {
        &self.names
    }
}

impl EntityTypeCatalog for EntityTypeTable {
    type Handle = EntityTypeHandle;

    fn resolve(&self, name: &str) -> Option<EntityTypeHandle> {
        self.get(name)
    }

    fn set_identifier(&mut self, entity_type: EntityTypeHandle, id: ProtocolId) {
        let entry = self.names.entry_mut(entity_type);
        if let Some(previous) = entry.protocol_id.replace(id) {
            self.by_protocol_id.remove(&previous);
        }
        self.by_protocol_id.insert(id, entity_type);
    }
}

/// The three runtime catalogs of a server.
#[derive(Debug, Clone, Default)]
pub struct Catalogs {
    pub blocks: BlockTable,
    pub materials: MaterialTable,
    pub entity_types: EntityTypeTable,
}

static CATALOGS: OnceLock<Catalogs> = OnceLock::new();

/// Freezes `catalogs` as the process-wide catalogs. Only the first call succeeds.
pub fn install(catalogs: Catalogs) -> Result<&'static Catalogs, CatalogError> {
    let mut pending = Some(catalogs);
    let installed = CATALOGS.get_or_init(|| pending.take().unwrap_or_default());
    match pending {
        None => Ok(installed),
        Some(_) => Err(CatalogError::AlreadyInstalled),
    }
}

/// The process-wide catalogs, once installed.
pub fn catalogs() -> Option<&'static Catalogs> {
    CATALOGS.get()
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalogs are already installed")]
    AlreadyInstalled,
}
