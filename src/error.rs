use thiserror::Error as ThisError;

/// Error type used at the storage seam. Both the AWS client and test doubles box their failures into it.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(ThisError, Debug)]
pub enum RmError {
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },

    #[error("Failed to establish AWS credentials: {0}")]
    Credential(#[source] BoxError),

    #[error("Listing of page {page} failed: {source}")]
    List {
        page: usize,
        #[source]
        source: BoxError,
    },

    #[error("Bulk delete of page {page} failed: {source}")]
    BatchRequest {
        page: usize,
        #[source]
        source: BoxError,
    },
}

impl RmError {
    pub(crate) fn invalid_path(path: &str, reason: &'static str) -> Self {
        RmError::InvalidPath {
            path: path.to_owned(),
            reason,
        }
    }

    /// process exit code used by the binary for fatal errors
    pub fn exit_code(&self) -> u8 {
        match self {
            RmError::List { .. } => 1,
            RmError::InvalidPath { .. } => 2,
            RmError::Credential(_) => 3,
            // recorded in the report, never ends a run
            RmError::BatchRequest { .. } => 0,
        }
    }
}
