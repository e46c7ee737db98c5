//! Error taxonomy shared by the result model and the workflow layer.

use crate::category::Category;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CleanupError {
    #[error("{category} already contains an item with id '{id}'")]
    DuplicateIdentity { category: Category, id: String },

    #[error("{category} has no item with id '{id}'")]
    UnknownIdentity { category: Category, id: String },

    #[error("similar pair '{id}' refers to the same file twice: {path}")]
    SamePairPaths { id: String, path: String },

    #[error("a scan is already running")]
    ScanInProgress,

    #[error("no target folder selected")]
    NoTargetFolder,

    #[error("nothing is selected")]
    NothingSelected,

    #[error("no destination folder selected")]
    NoDestination,

    #[error("no operation is waiting for confirmation")]
    NoPendingOperation,

    /// A folder dialog, settings file, scanner or file operation failed.
    #[error("{operation} failed: {source:#}")]
    Collaborator {
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl CleanupError {
    pub fn collaborator(operation: &'static str, source: anyhow::Error) -> Self {
        Self::Collaborator { operation, source }
    }
}

pub type Result<T> = std::result::Result<T, CleanupError>;
