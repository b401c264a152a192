//! Error types for the stage catalog

/// Errors raised when parsing catalog identifiers from their wire names
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// Name does not match any stage
    #[error("unknown stage: '{0}'")]
    UnknownStage(String),

    /// Name does not match any professional role
    #[error("unknown professional role: '{0}'")]
    UnknownRole(String),

    /// Name does not match any document type
    #[error("unknown document type: '{0}'")]
    UnknownDocumentType(String),
}
