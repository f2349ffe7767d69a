use std::sync::Arc;

use futures::{stream::FuturesUnordered, StreamExt};
use tokio::{sync::Semaphore, task::JoinHandle};
use tracing::{debug, error, info};

use crate::deleter::delete_batch;
use crate::error::RmError;
use crate::lister::list_pages;
use crate::report::{AggregateReport, DeleteOutcome, RunReport};
use crate::s3_path::S3Path;
use crate::store::{ObjectStore, MAX_BATCH_SIZE};

pub const DEFAULT_MAX_IN_FLIGHT: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteConfig {
    /// number of keys requested per listed page (and thus per bulk delete)
    pub page_size: usize,
    /// maximum number of bulk deletes running at the same time
    pub max_in_flight: usize,
}

impl Default for DeleteConfig {
    fn default() -> Self {
        Self {
            page_size: MAX_BATCH_SIZE,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }
}

impl DeleteConfig {
    /// Page size is capped by the maximum size of a bulk delete.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.clamp(1, MAX_BATCH_SIZE);
        self
    }

    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }
}

/// Drives the listing and runs a bulk delete per non-empty page concurrently.
pub struct Coordinator {
    store: Arc<dyn ObjectStore>,
    config: DeleteConfig,
}

impl Coordinator {
    pub fn new(store: Arc<dyn ObjectStore>, config: DeleteConfig) -> Self {
        Self { store, config }
    }

    /// Delete everything under `path`.
    ///
    /// Listing is sequential; deletes run alongside it, at most `max_in_flight` at a time. When no permit is free
    /// the listing waits. After listing ends, normally or with an error, all dispatched deletes are awaited
    /// before the report is returned. A listing error stops further listing but never cancels a dispatched delete.
    pub async fn run(&self, path: &S3Path) -> RunReport {
        let semaphore = Arc::new(Semaphore::new(self.config.max_in_flight));
        let pages = list_pages(Arc::clone(&self.store), path.clone(), self.config.page_size);
        futures::pin_mut!(pages);

        let mut pending = FuturesUnordered::new();
        let mut pages_listed = 0_usize;
        let mut listing_error = None;

        info!("Listing objects under {path}");
        while let Some(next) = pages.next().await {
            let page = match next {
                Ok(page) => page,
                Err(err) => {
                    error!("{err}");
                    listing_error = Some(err);
                    break;
                }
            };
            pages_listed += 1;

            if page.is_empty() {
                debug!("Page {} is empty, nothing to dispatch", page.index);
                continue;
            }

            // the semaphore is never closed, so a missing permit can not happen
            let permit = Arc::clone(&semaphore).acquire_owned().await.ok();
            let store = Arc::clone(&self.store);
            let bucket = path.bucket.clone();
            let (index, key_count) = (page.index, page.keys.len());
            debug!("Dispatching delete of page {index} ({key_count} keys)");

            let handle = tokio::spawn(async move {
                let _permit = permit;
                delete_batch(store.as_ref(), &bucket, page).await
            });
            pending.push(join_batch(index, key_count, handle));
        }

        info!(
            "Listed {pages_listed} pages, waiting for {} delete batches to finish",
            pending.len()
        );
        let report = drain(pending).await;

        if listing_error.is_none() && report.is_empty() {
            info!("No objects to delete.");
        }

        RunReport {
            report,
            pages_listed,
            listing_error,
        }
    }
}

/// Await one dispatched batch. A task that did not finish normally counts as a failed request for its page.
async fn join_batch(page: usize, key_count: usize, handle: JoinHandle<DeleteOutcome>) -> DeleteOutcome {
    match handle.await {
        Ok(outcome) => outcome,
        Err(join_err) => {
            let err = RmError::BatchRequest {
                page,
                source: join_err.to_string().into(),
            };
            error!("{err}");
            DeleteOutcome::request_failed(page, key_count, &err)
        }
    }
}

/// Collect outcomes in completion order; the report keeps them sorted by page.
async fn drain<F>(mut pending: FuturesUnordered<F>) -> AggregateReport
where
    F: std::future::Future<Output = DeleteOutcome>,
{
    let mut report = AggregateReport::new();
    while let Some(outcome) = pending.next().await {
        report.push(outcome);
    }
    report
}
