use async_trait::async_trait;
use aws_sdk_s3::model::{Delete, ObjectIdentifier};
use aws_sdk_s3::output::{DeleteObjectsOutput, ListObjectsV2Output};
use aws_sdk_s3::{Client, Error};
use tracing::trace;

use crate::error::BoxError;
use crate::store::{KeyFailure, ObjectKey, ObjectStore, Page, MAX_BATCH_SIZE};

/// list a single page of objects (ListObjectsV2) under the prefix, continuing from `continuation` when given.
pub async fn list_objects_page(
    client: &Client,
    bucket_name: &str,
    prefix: &str,
    max_keys: usize,
    continuation: Option<String>,
) -> Result<Page, Error> {
    let max_keys = max_keys.clamp(1, MAX_BATCH_SIZE) as i32;
    let objects: ListObjectsV2Output = client
        .list_objects_v2()
        .bucket(bucket_name)
        .prefix(prefix)
        .max_keys(max_keys)
        .set_continuation_token(continuation)
        .send()
        .await?;

    let keys: Vec<ObjectKey> = objects
        .contents()
        .unwrap_or_default()
        .iter()
        .filter_map(|obj| obj.key().map(str::to_owned))
        .collect();
    trace!("Listed {} keys in bucket {bucket_name} under '{prefix}'", keys.len());

    Ok(Page {
        index: 0,
        keys,
        next_cursor: objects.next_continuation_token().map(str::to_owned),
        is_truncated: objects.is_truncated(),
    })
}

/// delete the keys with a single DeleteObjects request. Quiet mode is used, so the response only lists the failures.
pub async fn delete_objects(client: &Client, bucket_name: &str, keys: &[ObjectKey]) -> Result<Vec<KeyFailure>, Error> {
    let delete_objects: Vec<ObjectIdentifier> = keys
        .iter()
        .map(|key| ObjectIdentifier::builder().key(key).build())
        .collect();

    let output: DeleteObjectsOutput = client
        .delete_objects()
        .bucket(bucket_name)
        .delete(Delete::builder().set_objects(Some(delete_objects)).quiet(true).build())
        .send()
        .await?;

    let failures = output
        .errors()
        .unwrap_or_default()
        .iter()
        .map(|err| {
            KeyFailure::new(
                err.key().unwrap_or_default(),
                err.code().map(str::to_owned),
                err.message().map(str::to_owned),
            )
        })
        .collect();
    Ok(failures)
}

#[async_trait]
impl ObjectStore for Client {
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        max_keys: usize,
        continuation: Option<String>,
    ) -> Result<Page, BoxError> {
        Ok(list_objects_page(self, bucket, prefix, max_keys, continuation).await?)
    }

    async fn delete_keys(&self, bucket: &str, keys: &[ObjectKey]) -> Result<Vec<KeyFailure>, BoxError> {
        Ok(delete_objects(self, bucket, keys).await?)
    }
}
