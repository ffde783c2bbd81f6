//! Static game data registries.
//!
//! Block, item and entity type documents are parsed into records ([`parse`]), which the
//! binder ([`bind`]) applies to the runtime catalogs ([`catalog`]).

pub mod bind;
pub mod catalog;
pub mod error;
pub mod identifier;
pub mod names;
pub mod parse;
pub mod record;

pub use bind::{register_blocks, register_entity_types, register_items, BindPolicy, BindReport};
pub use catalog::{catalogs, install, Catalogs};
pub use error::{RegistryError, Result};
pub use identifier::{normalize_name, Identifier, IdentifierParseError};
pub use names::KnownNames;
pub use parse::{parse_blocks, parse_catalog, parse_entity_types, parse_items, ParsedCatalog};
pub use record::{
    BlockState, CatalogKind, ProtocolId, RegistryBlock, RegistryEntityType, RegistryItem, StateId,
};
