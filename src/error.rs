//! Error types returned by the data providers.

use crate::config::ConfigError;
use crate::model::EntityKind;
use thiserror::Error;

/// Errors surfaced to the resolver layer.
///
/// Only the visibility gate produces [`DataError::NotFound`]. Every failure of a
/// collaborator (repository, config source, content filter, theme provider) is
/// carried unchanged in [`DataError::Collaborator`].
#[derive(Debug, Error)]
pub enum DataError {
    #[error("{kind} `{id}` does not exist")]
    NotFound { kind: EntityKind, id: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Collaborator(#[from] anyhow::Error),
}

impl DataError {
    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Whether the entity was missing or not publicly visible.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T, E = DataError> = std::result::Result<T, E>;
