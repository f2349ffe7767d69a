//! Recursive deletion of all objects under an `s3://bucket/prefix` path.
//!
//! The listing is paginated and each page is removed with a single bulk-delete request.
//! Bulk deletes run concurrently with the listing (bounded by [`DeleteConfig::max_in_flight`])
//! and their outcomes are collected in an [`AggregateReport`].

pub mod client;
pub mod coordinator;
pub mod deleter;
pub mod error;
pub mod lister;
pub mod report;
pub mod s3_aux;
pub mod s3_path;
pub mod store;

pub use client::{get_client, get_region_client, REGION};
pub use coordinator::{Coordinator, DeleteConfig, DEFAULT_MAX_IN_FLIGHT};
pub use deleter::delete_batch;
pub use error::{BoxError, RmError};
pub use lister::list_pages;
pub use report::{AggregateReport, BatchStatus, DeleteOutcome, RunReport};
pub use s3_path::S3Path;
pub use store::{KeyFailure, ObjectKey, ObjectStore, Page, MAX_BATCH_SIZE};
