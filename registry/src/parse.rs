//! Decoding of the block and registries documents into records.
//!
//! Object key order is significant in these documents (property values of a state line up
//! with the property names of their block), so objects are decoded into ordered entry lists
//! rather than hash maps.

use std::{collections::HashSet, fmt, fs, marker::PhantomData, path::Path};

use derive_more::From;
use serde::{
    de::{DeserializeSeed, IgnoredAny, MapAccess, Visitor},
    Deserialize, Deserializer,
};
use serde_json::Value;

use crate::{
    error::{RegistryError, Result},
    identifier::normalize_name,
    record::{
        BlockState, CatalogKind, ProtocolEntry, ProtocolId, RegistryBlock, RegistryEntityType,
        RegistryItem, StateId,
    },
};

/// The records of one catalog.
#[derive(Debug, Clone, PartialEq, Eq, From)]
pub enum ParsedCatalog {
    Blocks(Vec<RegistryBlock>),
    Items(Vec<RegistryItem>),
    EntityTypes(Vec<RegistryEntityType>),
}

impl ParsedCatalog {
    pub fn kind(&self) -> CatalogKind {
        match self {
            ParsedCatalog::Blocks(_) => CatalogKind::Block,
            ParsedCatalog::Items(_) => CatalogKind::Item,
            ParsedCatalog::EntityTypes(_) => CatalogKind::EntityType,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ParsedCatalog::Blocks(blocks) => blocks.len(),
            ParsedCatalog::Items(items) => items.len(),
            ParsedCatalog::EntityTypes(entity_types) => entity_types.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Reads the document at `path` and decodes the catalog selected by `kind`.
///
/// [`CatalogKind::Block`] expects a blocks document, the other kinds a registries document.
pub fn parse_catalog(path: impl AsRef<Path>, kind: CatalogKind) -> Result<ParsedCatalog> {
    let bytes = read_document(path.as_ref())?;
    parse_catalog_from_slice(&bytes, kind)
}

pub fn parse_catalog_from_slice(bytes: &[u8], kind: CatalogKind) -> Result<ParsedCatalog> {
    Ok(match kind {
        CatalogKind::Block => parse_blocks_from_slice(bytes)?.into(),
        CatalogKind::Item => parse_items_from_slice(bytes)?.into(),
        CatalogKind::EntityType => parse_entity_types_from_slice(bytes)?.into(),
    })
}

pub fn parse_blocks(path: impl AsRef<Path>) -> Result<Vec<RegistryBlock>> {
    let bytes = read_document(path.as_ref())?;
    parse_blocks_from_slice(&bytes)
}

pub fn parse_items(path: impl AsRef<Path>) -> Result<Vec<RegistryItem>> {
    let bytes = read_document(path.as_ref())?;
    parse_items_from_slice(&bytes)
}

pub fn parse_entity_types(path: impl AsRef<Path>) -> Result<Vec<RegistryEntityType>> {
    let bytes = read_document(path.as_ref())?;
    parse_entity_types_from_slice(&bytes)
}

pub fn parse_blocks_from_slice(bytes: &[u8]) -> Result<Vec<RegistryBlock>> {
    let document: OrderedMap<BlockDescriptor> = serde_json::from_slice(bytes)?;

    let mut names = HashSet::with_capacity(document.0.len());
    let mut state_ids = HashSet::new();
    let mut blocks = Vec::with_capacity(document.0.len());

    for (identifier, descriptor) in document.0 {
        let name = normalize_name(&identifier)?;
        if !names.insert(name.clone()) {
            return Err(RegistryError::malformed(name, "declared more than once"));
        }
        blocks.push(build_block(name, descriptor, &mut state_ids)?);
    }

    tracing::debug!(
        "Parsed {} blocks with {} states.",
        blocks.len(),
        state_ids.len()
    );

    Ok(blocks)
}

pub fn parse_items_from_slice(bytes: &[u8]) -> Result<Vec<RegistryItem>> {
    parse_protocol_entries(bytes)
}

pub fn parse_entity_types_from_slice(bytes: &[u8]) -> Result<Vec<RegistryEntityType>> {
    parse_protocol_entries(bytes)
}

pub(crate) fn read_document(path: &Path) -> Result<Vec<u8>> {
    tracing::trace!("Reading registry document {}...", path.display());
    fs::read(path).map_err(|err| RegistryError::read(path.to_path_buf(), err))
}

fn build_block(
    name: String,
    descriptor: BlockDescriptor,
    state_ids: &mut HashSet<StateId>,
) -> Result<RegistryBlock> {
    let properties = descriptor.properties.unwrap_or_default().0;
    let mut states = Vec::with_capacity(descriptor.states.len());

    for state in descriptor.states {
        if !state_ids.insert(state.id) {
            return Err(RegistryError::malformed(
                name,
                format!("state id {} is already taken", state.id),
            ));
        }

        let state_properties = state.properties.unwrap_or_default().0;
        let in_declared_order = state_properties.len() == properties.len()
            && state_properties
                .iter()
                .zip(&properties)
                .all(|((key, _), (declared, _))| key == declared);
        if !in_declared_order {
            return Err(RegistryError::malformed(
                name,
                format!(
                    "properties of state {} do not follow the declared properties",
                    state.id
                ),
            ));
        }

        let values = state_properties
            .into_iter()
            .map(|(key, value)| match value {
                Value::String(value) => Ok(value),
                other => Err(RegistryError::malformed(
                    &name,
                    format!(
                        "value {} of property {} in state {} is not a string",
                        other, key, state.id
                    ),
                )),
            })
            .collect::<Result<Vec<_>>>()?;
        states.push(BlockState::new(state.id, state.default, values));
    }

    RegistryBlock::new(name, properties, states)
}

fn parse_protocol_entries<E: ProtocolEntry>(bytes: &[u8]) -> Result<Vec<E>> {
    let key = E::KIND.registry_key();

    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    let registry = SelectedRegistry { key }.deserialize(&mut deserializer)?;
    deserializer.end()?;

    let registry =
        registry.ok_or_else(|| RegistryError::malformed(key, "catalog object is missing"))?;

    let mut names = HashSet::with_capacity(registry.entries.0.len());
    let mut ids = HashSet::with_capacity(registry.entries.0.len());
    let mut entries = Vec::with_capacity(registry.entries.0.len());

    for (identifier, descriptor) in registry.entries.0 {
        let name = normalize_name(&identifier)?;
        if !names.insert(name.clone()) {
            return Err(RegistryError::malformed(name, "declared more than once"));
        }
        if !ids.insert(descriptor.protocol_id) {
            return Err(RegistryError::malformed(
                name,
                format!("protocol id {} is already taken", descriptor.protocol_id),
            ));
        }
        entries.push(E::new(name, descriptor.protocol_id));
    }

    tracing::debug!("Parsed {} {} entries.", entries.len(), E::KIND);

    Ok(entries)
}

#[derive(Deserialize)]
struct BlockDescriptor {
    /// Property name to allowed values.
    #[serde(default)]
    properties: Option<OrderedMap<Vec<String>>>,
    states: Vec<StateDescriptor>,
}

#[derive(Deserialize)]
struct StateDescriptor {
    id: StateId,
    #[serde(default, deserialize_with = "marker_present")]
    default: bool,
    #[serde(default)]
    properties: Option<OrderedMap<Value>>,
}

#[derive(Deserialize)]
struct ProtocolRegistry {
    entries: OrderedMap<ProtocolDescriptor>,
}

#[derive(Deserialize)]
struct ProtocolDescriptor {
    protocol_id: ProtocolId,
}

/// Any value counts, `null` and `false` included.
fn marker_present<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    IgnoredAny::deserialize(deserializer).map(|_| true)
}

/// A JSON object decoded with its key order intact.
struct OrderedMap<V>(Vec<(String, V)>);

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<'de, V> Deserialize<'de> for OrderedMap<V>
where
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V> Visitor<'de> for OrderedMapVisitor<V>
        where
            V: Deserialize<'de>,
        {
            type Value = OrderedMap<V>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a JSON object")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, V>()? {
                    entries.push(entry);
                }
                Ok(OrderedMap(entries))
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// Decodes only the catalog object stored under `key`, skipping every other registry.
struct SelectedRegistry {
    key: &'static str,
}

impl<'de> DeserializeSeed<'de> for SelectedRegistry {
    type Value = Option<ProtocolRegistry>;

    fn deserialize<D>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for SelectedRegistry {
    type Value = Option<ProtocolRegistry>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a registries object")
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut selected = None;
        while let Some(key) = map.next_key::<String>()? {
            if key == self.key {
                selected = Some(map.next_value()?);
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const BLOCKS: &str = r#"
        {
            "minecraft:air": {
                "states": [{ "id": 0, "default": true }]
            },
            "minecraft:lever": {
                "properties": {
                    "face": ["floor", "wall", "ceiling"],
                    "powered": ["true", "false"]
                },
                "states": [
                    { "id": 5, "properties": { "face": "floor", "powered": "true" } },
                    { "id": 6, "default": true, "properties": { "face": "floor", "powered": "false" } },
                    { "id": 7, "properties": { "face": "wall", "powered": "true" } },
                    { "id": 8, "properties": { "face": "wall", "powered": "false" } },
                    { "id": 9, "properties": { "face": "ceiling", "powered": "true" } },
                    { "id": 10, "properties": { "face": "ceiling", "powered": "false" } }
                ]
            },
            "minecraft:stone": {
                "states": [{ "id": 1, "default": true }]
            }
        }
    "#;

    const REGISTRIES: &str = r#"
        {
            "minecraft:sound_event": {
                "entries": { "minecraft:ambient.cave": { "protocol_id": "not a number" } }
            },
            "minecraft:item": {
                "default": "minecraft:air",
                "protocol_id": 6,
                "entries": {
                    "minecraft:air": { "protocol_id": 0 },
                    "minecraft:stone": { "protocol_id": 1 },
                    "minecraft:stick": { "protocol_id": 5 }
                }
            },
            "minecraft:entity_type": {
                "entries": {
                    "minecraft:zombie": { "protocol_id": 54 },
                    "minecraft:armor_stand": { "protocol_id": 2 }
                }
            }
        }
    "#;

    #[test]
    fn single_state_block() {
        let blocks =
            parse_blocks_from_slice(br#"{"minecraft:foo": {"states":[{"id":1,"default":true}]}}"#)
                .unwrap();

        assert_eq!(blocks.len(), 1);
        let block = &blocks[0];
        assert_eq!(block.name(), "FOO");
        assert_eq!(block.default_id(), 1);
        assert!(block.properties_identifiers().is_empty());
        assert_eq!(block.states().len(), 1);
        assert_eq!(block.states()[0].id(), 1);
        assert!(block.states()[0].is_default());
        assert!(block.states()[0].properties_values().is_empty());
    }

    #[test]
    fn blocks_keep_document_order() {
        let blocks = parse_blocks_from_slice(BLOCKS.as_bytes()).unwrap();
        let names: Vec<_> = blocks.iter().map(|block| block.name().as_str()).collect();
        assert_eq!(names, ["AIR", "LEVER", "STONE"]);

        let lever = &blocks[1];
        assert_eq!(lever.properties_identifiers(), &["face", "powered"]);
        assert_eq!(
            lever.properties_allowed_values()[0],
            ["floor", "wall", "ceiling"]
        );
        assert_eq!(lever.default_id(), 6);
        assert_eq!(lever.default_properties_values(), &["floor", "false"]);
        let ids: Vec<_> = lever.states().iter().map(BlockState::id).collect();
        assert_eq!(ids, [5, 6, 7, 8, 9, 10]);
        assert_eq!(lever.states()[4].properties_values(), &["ceiling", "true"]);
    }

    #[test]
    fn parsed_blocks_hold_their_invariants() {
        let blocks = parse_blocks_from_slice(BLOCKS.as_bytes()).unwrap();
        let mut ids = HashSet::new();

        for block in &blocks {
            let defaults: Vec<_> = block.states().iter().filter(|s| s.is_default()).collect();
            assert_eq!(defaults.len(), 1);
            assert_eq!(defaults[0].id(), block.default_id());

            for state in block.states() {
                assert_eq!(
                    state.properties_values().len(),
                    block.properties_identifiers().len()
                );
                assert!(ids.insert(state.id()));
            }
        }
    }

    #[test]
    fn default_marker_value_is_ignored() {
        let blocks = parse_blocks_from_slice(
            br#"{
                "minecraft:a": {"states": [{"id": 3, "default": false}]},
                "minecraft:b": {"states": [{"id": 4, "default": null}]}
            }"#,
        )
        .unwrap();
        assert_eq!(blocks[0].default_id(), 3);
        assert_eq!(blocks[1].default_id(), 4);
    }

    #[test]
    fn block_structure_errors() {
        let cases: &[&[u8]] = &[
            br#"{"minecraft:a": {"states": [{"id": 1}]}}"#,
            br#"{"minecraft:a": {"states": [{"id": 1, "default": true}, {"id": 1}]}}"#,
            br#"{"minecraft:a": {"states": [{"id": 1, "default": true}]},
                 "minecraft:b": {"states": [{"id": 1, "default": true}]}}"#,
            br#"{"minecraft:a": {
                    "properties": {"x": ["1", "2"], "y": ["1", "2"]},
                    "states": [{"id": 1, "default": true, "properties": {"y": "1", "x": "1"}}]
                }}"#,
            br#"{"minecraft:a": {
                    "properties": {"x": ["1", "2"]},
                    "states": [{"id": 1, "default": true}]
                }}"#,
            br#"{"minecraft:a": {
                    "properties": {"x": ["1"]},
                    "states": [{"id": 1, "default": true, "properties": {"x": 1}}]
                }}"#,
        ];

        for case in cases {
            let result = parse_blocks_from_slice(case);
            assert!(
                matches!(result, Err(RegistryError::Malformed { .. })),
                "{:?}",
                result
            );
        }
    }

    #[test]
    fn block_decode_errors() {
        let cases: &[&[u8]] = &[
            b"{",
            br#"{"minecraft:a": {"properties": {}}}"#,
            br#"{"minecraft:a": {"states": [{"default": true}]}}"#,
            br#"{"minecraft:a": {"states": [{"id": 70000, "default": true}]}}"#,
            br#"["minecraft:a"]"#,
        ];

        for case in cases {
            let result = parse_blocks_from_slice(case);
            assert!(
                matches!(result, Err(RegistryError::Decode(_))),
                "{:?}",
                result
            );
        }
    }

    #[test]
    fn mixed_case_names() {
        let blocks = parse_blocks_from_slice(
            br#"{"Minecraft:Foo": {"states": [{"id": 1, "default": true}]}}"#,
        )
        .unwrap();
        assert_eq!(blocks[0].name(), "FOO");

        let items = parse_items_from_slice(
            br#"{"minecraft:item": {"entries": {"minecraft:Stick": {"protocol_id": 5}}}}"#,
        )
        .unwrap();
        assert_eq!(items[0].name(), "STICK");
    }

    #[test]
    fn invalid_block_name() {
        let result = parse_blocks_from_slice(
            br#"{"minecraft:oak log": {"states": [{"id": 1, "default": true}]}}"#,
        );
        assert!(matches!(result, Err(RegistryError::Identifier(_))));
    }

    #[test]
    fn items() {
        let items = parse_items_from_slice(
            br#"{"minecraft:item":{"entries":{"minecraft:stick":{"protocol_id":5}}}}"#,
        )
        .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name(), "STICK");
        assert_eq!(items[0].item_id(), 5);

        let items = parse_items_from_slice(REGISTRIES.as_bytes()).unwrap();
        let names: Vec<_> = items.iter().map(|item| item.name().as_str()).collect();
        assert_eq!(names, ["AIR", "STONE", "STICK"]);
    }

    #[test]
    fn entity_types() {
        let entity_types = parse_entity_types_from_slice(REGISTRIES.as_bytes()).unwrap();
        assert_eq!(entity_types.len(), 2);
        assert_eq!(entity_types[0].name(), "ZOMBIE");
        assert_eq!(entity_types[0].entity_id(), 54);
        assert_eq!(entity_types[1].name(), "ARMOR_STAND");
        assert_eq!(entity_types[1].entity_id(), 2);
    }

    #[test]
    fn protocol_entry_errors() {
        let result = parse_entity_types_from_slice(br#"{"minecraft:item": {"entries": {}}}"#);
        assert!(matches!(result, Err(RegistryError::Malformed { .. })));

        let result =
            parse_items_from_slice(br#"{"minecraft:item": {"entries": {"minecraft:a": {}}}}"#);
        assert!(matches!(result, Err(RegistryError::Decode(_))));

        let result = parse_items_from_slice(
            br#"{"minecraft:item": {"entries": {
                "minecraft:a": {"protocol_id": 1},
                "minecraft:b": {"protocol_id": 1}
            }}}"#,
        );
        assert!(matches!(result, Err(RegistryError::Malformed { .. })));

        let result = parse_items_from_slice(br#"{"minecraft:item": {"entries": {}}} trailing"#);
        assert!(matches!(result, Err(RegistryError::Decode(_))));
    }

    #[test]
    fn catalog_selector() {
        let catalog =
            parse_catalog_from_slice(REGISTRIES.as_bytes(), CatalogKind::EntityType).unwrap();
        assert_eq!(catalog.kind(), CatalogKind::EntityType);
        assert_eq!(catalog.len(), 2);

        let catalog = parse_catalog_from_slice(BLOCKS.as_bytes(), CatalogKind::Block).unwrap();
        assert!(matches!(catalog, ParsedCatalog::Blocks(ref blocks) if blocks.len() == 3));
    }

    #[test]
    fn documents_on_disk() {
        let dir = tempfile::tempdir().unwrap();

        let missing = parse_blocks(dir.path().join("blocks.json"));
        assert!(matches!(missing, Err(RegistryError::NotFound { .. })));
        assert!(!missing.unwrap_err().is_structural());

        let path = dir.path().join("registries.json");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(REGISTRIES.as_bytes()).unwrap();
        drop(file);

        let catalog = parse_catalog(&path, CatalogKind::Item).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(parse_entity_types(&path).unwrap().len(), 2);
        assert!(matches!(
            parse_blocks(&path),
            Err(RegistryError::Decode(_))
        ));
    }
}
