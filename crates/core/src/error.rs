use crate::generator::GeneratorError;
use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Invalid content: {0}")]
    InvalidContent(String),

    #[error("Content generation failed: {0}")]
    Generator(#[from] GeneratorError),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    pub fn draft_not_found(id: DbId) -> Self {
        Self::NotFound { entity: "Draft", id }
    }

    /// Versions are addressed by their per-project number, so `id` here is
    /// the version number rather than the global version id.
    pub fn version_not_found(version_number: i32) -> Self {
        Self::NotFound {
            entity: "Version",
            id: DbId::from(version_number),
        }
    }
}
