//! Error type shared by the persistence layer and the catalog facade.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Update or delete addressed a position or id that does not exist. The
    /// collection is left untouched.
    #[error("{entity} {key} not found")]
    NotFound { entity: &'static str, key: String },
    /// A required field was missing; nothing was persisted.
    #[error("{0}")]
    Validation(String),
    #[error("storage failure: {0}")]
    Storage(#[from] rusqlite::Error),
    #[error("serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("csv export failure: {0}")]
    Csv(#[from] csv::Error),
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
}

impl CatalogError {
    pub(crate) fn tour_at(index: usize) -> Self {
        CatalogError::NotFound {
            entity: "Tour at position",
            key: index.to_string(),
        }
    }

    pub(crate) fn tour_id(id: &str) -> Self {
        CatalogError::NotFound {
            entity: "Tour",
            key: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound { .. })
    }
}

pub type Result<T, E = CatalogError> = std::result::Result<T, E>;
