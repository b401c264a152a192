//! Error types for the journey engine
//!
//! Provides error handling for:
//! - Missing lands, documents, transactions and engagements
//! - Ownership violations
//! - Attempts to work a locked stage
//! - Business precondition failures
//! - Storage and directory collaborator failures

use crate::types::{LandId, TransactionId};
use landpath_catalog::StageId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of resource an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    /// A land and its journey
    Land,
    /// A document in the ledger
    Document,
    /// An acquisition transaction
    Transaction,
    /// A professional-service engagement
    Engagement,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Resource::Land => "land",
            Resource::Document => "document",
            Resource::Transaction => "transaction",
            Resource::Engagement => "engagement",
        })
    }
}

/// Main engine error type
#[derive(Debug, thiserror::Error)]
pub enum JourneyError {
    /// Referenced resource does not exist
    #[error("{resource} not found: {id}")]
    NotFound {
        /// Kind of the missing resource
        resource: Resource,
        /// Id as the caller gave it
        id: String,
    },

    /// Caller does not own the resource
    #[error("caller does not own {resource} {id}")]
    Forbidden {
        /// Kind of the guarded resource
        resource: Resource,
        /// Id of the resource
        id: String,
    },

    /// Stage lies beyond the current stage plus one
    #[error("stage {stage} is locked while the current stage is {current}")]
    InvalidTransition {
        /// Stage the caller tried to work
        stage: StageId,
        /// Land's current stage at the time
        current: StageId,
    },

    /// Business precondition violated
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Persistence collaborator failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Directory collaborator failed
    #[error("directory error: {0}")]
    Directory(#[from] DirectoryError),
}

impl JourneyError {
    /// Create not-found error
    #[inline]
    pub fn not_found(resource: Resource, id: impl fmt::Display) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// Create forbidden error
    #[inline]
    pub fn forbidden(resource: Resource, id: impl fmt::Display) -> Self {
        Self::Forbidden {
            resource,
            id: id.to_string(),
        }
    }

    /// Classification for the request-handling layer
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Forbidden { .. } => ErrorKind::Forbidden,
            Self::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            Self::InvalidState(_) => ErrorKind::InvalidState,
            Self::Store(_) | Self::Directory(_) => ErrorKind::Collaborator,
        }
    }

    /// Check if error is retryable
    ///
    /// Engine errors describe caller or business mistakes and never are;
    /// only an unavailable collaborator is.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Store(StoreError::Unavailable(_)) | Self::Directory(DirectoryError::Unavailable(_))
        )
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Resource missing
    NotFound,
    /// Ownership mismatch
    Forbidden,
    /// Locked stage
    InvalidTransition,
    /// Business precondition
    InvalidState,
    /// Store or directory failure
    Collaborator,
}

/// Journey store errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Land id already present
    #[error("land {0} already exists")]
    DuplicateLand(LandId),

    /// One-to-one transaction link would be broken
    #[error("transaction {transaction} already linked to land {land}")]
    TransactionAlreadyLinked {
        /// Transaction being registered
        transaction: TransactionId,
        /// Land it already belongs to
        land: LandId,
    },

    /// Write refers to a land the store does not hold
    #[error("land {0} missing from store")]
    MissingLand(LandId),

    /// Write was planned against state that has since changed
    #[error("conflicting write: {0}")]
    Conflict(String),

    /// Backend unavailable
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// External directory errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    /// Backend unavailable
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

/// Unrecognized stage status name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown stage status: '{0}'")]
pub struct UnknownStatus(pub String);

/// Unrecognized land size unit name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown land size unit: '{0}'")]
pub struct UnknownSizeUnit(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn journey_error_display() {
        let err = JourneyError::not_found(Resource::Land, "01J0000000000000000000000");
        assert!(err.to_string().contains("land not found"));

        let err = JourneyError::InvalidTransition {
            stage: StageId::TitleRegistration,
            current: StageId::SurveySitePlan,
        };
        assert_eq!(
            err.to_string(),
            "stage TITLE_REGISTRATION is locked while the current stage is SURVEY_SITE_PLAN"
        );
    }

    #[test]
    fn journey_error_kind() {
        assert_eq!(
            JourneyError::forbidden(Resource::Engagement, "x").kind(),
            ErrorKind::Forbidden
        );
        assert_eq!(
            JourneyError::InvalidState("already linked".into()).kind(),
            ErrorKind::InvalidState
        );
        assert_eq!(
            JourneyError::from(StoreError::Unavailable("down".into())).kind(),
            ErrorKind::Collaborator
        );
    }

    #[test]
    fn journey_error_is_retryable() {
        assert!(JourneyError::from(StoreError::Unavailable("down".into())).is_retryable());
        assert!(JourneyError::from(DirectoryError::Unavailable("down".into())).is_retryable());
        assert!(!JourneyError::from(StoreError::MissingLand(LandId::new())).is_retryable());
        assert!(!JourneyError::not_found(Resource::Document, "d").is_retryable());
        assert!(!JourneyError::InvalidState("not completed".into()).is_retryable());
    }
}
