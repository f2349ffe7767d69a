use std::fmt;

use async_trait::async_trait;

use crate::error::BoxError;

/// Key of an object, unique within its bucket.
pub type ObjectKey = String;

/// Provider-imposed maximum number of keys in one bulk-delete request (and in one listed page).
pub const MAX_BATCH_SIZE: usize = 1000;

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// position of the page in the listing, counting from 0.
    pub index: usize,
    pub keys: Vec<ObjectKey>,
    pub next_cursor: Option<String>,
    pub is_truncated: bool,
}

impl Page {
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// A key the bulk-delete response reported as not deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFailure {
    pub key: ObjectKey,
    pub code: Option<String>,
    pub message: Option<String>,
}

impl KeyFailure {
    pub fn new(key: impl Into<ObjectKey>, code: Option<String>, message: Option<String>) -> Self {
        Self {
            key: key.into(),
            code,
            message,
        }
    }
}

impl fmt::Display for KeyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.code.as_deref().unwrap_or("UnknownError"))?;
        if let Some(message) = &self.message {
            write!(f, " ({message})")?;
        }
        Ok(())
    }
}

/// The two requests the delete pipeline needs from an object store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch a single page of keys under `prefix`. The returned page has index 0; the lister numbers the pages.
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        max_keys: usize,
        continuation: Option<String>,
    ) -> Result<Page, BoxError>;

    /// Delete all `keys` in one bulk request and return the keys that could not be deleted.
    async fn delete_keys(&self, bucket: &str, keys: &[ObjectKey]) -> Result<Vec<KeyFailure>, BoxError>;
}
