use std::sync::Arc;

use futures::stream::{self, Stream};
use tracing::debug;

use crate::error::RmError;
use crate::s3_path::S3Path;
use crate::store::{ObjectStore, Page};

enum Cursor {
    Start,
    Continue(String),
    /// the previous page was truncated without handing out a token
    Missing,
    Exhausted,
}

/// Lazily list all pages under `path`. Pages are requested one at a time, each with the cursor of its predecessor.
/// The stream ends after the first page that is not truncated, or after the first error.
pub fn list_pages(
    store: Arc<dyn ObjectStore>,
    path: S3Path,
    page_size: usize,
) -> impl Stream<Item = Result<Page, RmError>> {
    stream::try_unfold((0_usize, Cursor::Start), move |(index, cursor)| {
        let store = Arc::clone(&store);
        let path = path.clone();
        async move {
            let continuation = match cursor {
                Cursor::Start => None,
                Cursor::Continue(token) => Some(token),
                Cursor::Missing => {
                    return Err(RmError::List {
                        page: index,
                        source: format!("page {} is truncated but carries no continuation token", index - 1).into(),
                    })
                }
                Cursor::Exhausted => return Ok(None),
            };

            let mut page = store
                .list_page(&path.bucket, &path.prefix, page_size, continuation)
                .await
                .map_err(|source| RmError::List { page: index, source })?;
            page.index = index;
            debug!("Listed page {index} with {} keys (truncated={})", page.keys.len(), page.is_truncated);

            let next = match (page.is_truncated, &page.next_cursor) {
                (false, _) => Cursor::Exhausted,
                (true, Some(token)) => Cursor::Continue(token.clone()),
                (true, None) => Cursor::Missing,
            };

            Ok::<_, RmError>(Some((page, (index + 1, next))))
        }
    })
}
