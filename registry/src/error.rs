use std::{io, path::PathBuf};

use thiserror::Error;

use crate::{identifier::IdentifierParseError, record::CatalogKind};

pub type Result<T> = std::result::Result<T, RegistryError>;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry document {} not found", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to read registry document {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("registry document could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("malformed registry entry {name}: {reason}")]
    Malformed { name: String, reason: String },
    #[error(transparent)]
    Identifier(#[from] IdentifierParseError),
    #[error("{kind} {name} has no runtime counterpart")]
    UnknownEntry { kind: CatalogKind, name: String },
}

impl RegistryError {
    pub(crate) fn malformed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        RegistryError::Malformed {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn read(path: PathBuf, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => RegistryError::NotFound { path, source },
            _ => RegistryError::Io { path, source },
        }
    }

    /// Whether the document was present but could not be turned into records.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            RegistryError::Decode(_)
                | RegistryError::Malformed { .. }
                | RegistryError::Identifier(_)
        )
    }
}
