use tracing::{debug, warn};

use crate::error::RmError;
use crate::report::DeleteOutcome;
use crate::store::{ObjectStore, Page};

/// Delete all keys of `page` with exactly one bulk-delete request.
/// Failures never propagate; both a failed request and failed keys end up in the returned outcome.
pub async fn delete_batch(store: &dyn ObjectStore, bucket: &str, page: Page) -> DeleteOutcome {
    let key_count = page.keys.len();

    match store.delete_keys(bucket, &page.keys).await {
        Ok(failures) if failures.is_empty() => {
            debug!("Deleted {key_count} objects of page {}", page.index);
            DeleteOutcome::deleted(page.index, key_count)
        }
        Ok(failures) => {
            warn!(
                "Page {}: {} of {key_count} objects could not be deleted",
                page.index,
                failures.len()
            );
            DeleteOutcome::partial(page.index, key_count, failures)
        }
        Err(source) => {
            let err = RmError::BatchRequest {
                page: page.index,
                source,
            };
            warn!("{err}");
            DeleteOutcome::request_failed(page.index, key_count, &err)
        }
    }
}
