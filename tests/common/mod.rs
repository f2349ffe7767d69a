#![allow(dead_code)]

use std::collections::{BTreeSet, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use s3_rm::{BoxError, KeyFailure, ObjectKey, ObjectStore, Page};

/// In-memory object store. The continuation token is the last key of the previous page,
/// so listing stays consistent while deletes remove keys concurrently.
#[derive(Default)]
pub struct MockStore {
    objects: Mutex<BTreeSet<ObjectKey>>,
    /// fixed pages, used instead of `objects` when set
    script: Option<Vec<Vec<ObjectKey>>>,
    /// drop the continuation token of this scripted page
    missing_token_at: Option<usize>,
    fail_list_at: Option<usize>,
    denied_keys: HashSet<ObjectKey>,
    /// a bulk delete naming one of these keys fails as a whole
    poisoned_keys: HashSet<ObjectKey>,
    /// deleting one of these keys panics inside the delete task
    panic_keys: HashSet<ObjectKey>,
    delete_delay: Duration,

    list_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    delete_calls: Mutex<Vec<Vec<ObjectKey>>>,
}

impl MockStore {
    /// `count` objects named `{prefix}obj-00000` and up
    pub fn with_objects(prefix: &str, count: usize) -> Self {
        let objects = (0..count).map(|i| format!("{prefix}obj-{i:05}")).collect();
        Self {
            objects: Mutex::new(objects),
            ..Default::default()
        }
    }

    pub fn scripted(pages: Vec<Vec<&str>>) -> Self {
        let pages = pages
            .into_iter()
            .map(|keys| keys.into_iter().map(str::to_owned).collect())
            .collect();
        Self {
            script: Some(pages),
            ..Default::default()
        }
    }

    pub fn add_objects(self, keys: &[&str]) -> Self {
        self.objects.lock().unwrap().extend(keys.iter().map(|k| k.to_string()));
        self
    }

    pub fn fail_list_at(mut self, call: usize) -> Self {
        self.fail_list_at = Some(call);
        self
    }

    pub fn missing_token_at(mut self, page: usize) -> Self {
        self.missing_token_at = Some(page);
        self
    }

    pub fn deny(mut self, key: &str) -> Self {
        self.denied_keys.insert(key.to_owned());
        self
    }

    pub fn poison(mut self, key: &str) -> Self {
        self.poisoned_keys.insert(key.to_owned());
        self
    }

    pub fn panic_on(mut self, key: &str) -> Self {
        self.panic_keys.insert(key.to_owned());
        self
    }

    pub fn delete_delay(mut self, delay: Duration) -> Self {
        self.delete_delay = delay;
        self
    }

    pub fn remaining(&self) -> Vec<ObjectKey> {
        self.objects.lock().unwrap().iter().cloned().collect()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> Vec<Vec<ObjectKey>> {
        self.delete_calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn scripted_page(&self, script: &[Vec<ObjectKey>], continuation: Option<String>) -> Page {
        let idx: usize = continuation.map(|c| c.parse().unwrap()).unwrap_or(0);
        let is_truncated = idx + 1 < script.len();
        let next_cursor = (is_truncated && self.missing_token_at != Some(idx)).then(|| (idx + 1).to_string());
        Page {
            index: 0,
            keys: script.get(idx).cloned().unwrap_or_default(),
            next_cursor,
            is_truncated,
        }
    }
}

#[async_trait]
impl ObjectStore for MockStore {
    async fn list_page(
        &self,
        _bucket: &str,
        prefix: &str,
        max_keys: usize,
        continuation: Option<String>,
    ) -> Result<Page, BoxError> {
        let call = self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list_at == Some(call) {
            return Err("network error: connection reset by peer".into());
        }
        if let Some(script) = &self.script {
            return Ok(self.scripted_page(script, continuation));
        }

        let objects = self.objects.lock().unwrap();
        let mut matching = objects
            .iter()
            .filter(|key| key.starts_with(prefix))
            .filter(|key| continuation.as_ref().map_or(true, |after| *key > after));
        let keys: Vec<ObjectKey> = matching.by_ref().take(max_keys).cloned().collect();
        let is_truncated = matching.next().is_some();
        Ok(Page {
            index: 0,
            next_cursor: if is_truncated { keys.last().cloned() } else { None },
            keys,
            is_truncated,
        })
    }

    async fn delete_keys(&self, _bucket: &str, keys: &[ObjectKey]) -> Result<Vec<KeyFailure>, BoxError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.delete_calls.lock().unwrap().push(keys.to_vec());

        tokio::time::sleep(self.delete_delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(key) = keys.iter().find(|key| self.panic_keys.contains(*key)) {
            panic!("store crashed while deleting {key}");
        }
        if keys.iter().any(|key| self.poisoned_keys.contains(key)) {
            return Err("SlowDown: please reduce your request rate".into());
        }

        let mut objects = self.objects.lock().unwrap();
        let mut failures = Vec::new();
        for key in keys {
            if self.denied_keys.contains(key) {
                failures.push(KeyFailure::new(
                    key.clone(),
                    Some("AccessDenied".to_owned()),
                    Some("Access Denied".to_owned()),
                ));
            } else {
                objects.remove(key);
            }
        }
        Ok(failures)
    }
}
