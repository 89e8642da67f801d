use crate::repository::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum EmlError {
    /// A required query or parameter could not be constructed (missing or invalid identifier).
    #[error("{0}")]
    Build(String),

    /// A required row or row set failed its cardinality expectation.
    #[error("{0}")]
    NotFound(String),

    #[error("upstream store error: {0}")]
    Upstream(#[from] StoreError),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("EML rendering error: {0}")]
    Wire(#[from] eml::EmlWireError),
}

impl EmlError {
    /// Returns `true` for failures caused by the caller's input rather than the system.
    ///
    /// Build and not-found failures mean the referenced identifier does not name a complete,
    /// consistent record.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            EmlError::Build(_) | EmlError::NotFound(_) | EmlError::InvalidInput(_)
        )
    }
}

pub type EmlResult<T> = std::result::Result<T, EmlError>;
