use std::fmt;

use crate::error::RmError;
use crate::store::KeyFailure;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStatus {
    /// every key of the page was deleted
    Deleted,
    /// the request completed, but these keys were not deleted
    PartialFailure(Vec<KeyFailure>),
    /// the bulk-delete request itself failed, so it is unknown which keys are gone
    RequestFailed(String),
}

/// Result of the bulk delete of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub page: usize,
    pub key_count: usize,
    pub status: BatchStatus,
}

impl DeleteOutcome {
    pub fn deleted(page: usize, key_count: usize) -> Self {
        Self {
            page,
            key_count,
            status: BatchStatus::Deleted,
        }
    }

    /// An empty list of failures is a plain success.
    pub fn partial(page: usize, key_count: usize, failures: Vec<KeyFailure>) -> Self {
        if failures.is_empty() {
            return Self::deleted(page, key_count);
        }
        Self {
            page,
            key_count,
            status: BatchStatus::PartialFailure(failures),
        }
    }

    pub fn request_failed(page: usize, key_count: usize, err: &RmError) -> Self {
        Self {
            page,
            key_count,
            status: BatchStatus::RequestFailed(err.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, BatchStatus::Deleted)
    }

    pub fn key_failures(&self) -> &[KeyFailure] {
        match &self.status {
            BatchStatus::PartialFailure(failures) => failures,
            _ => &[],
        }
    }

    /// Keys presumed deleted. Nothing is counted for a failed request.
    pub fn keys_deleted(&self) -> usize {
        match &self.status {
            BatchStatus::Deleted => self.key_count,
            BatchStatus::PartialFailure(failures) => self.key_count.saturating_sub(failures.len()),
            BatchStatus::RequestFailed(_) => 0,
        }
    }
}

/// All delete outcomes of a run, ordered by page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateReport {
    outcomes: Vec<DeleteOutcome>,
}

impl AggregateReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert keeping page order; outcomes may arrive in any order.
    pub fn push(&mut self, outcome: DeleteOutcome) {
        let pos = self.outcomes.partition_point(|o| o.page <= outcome.page);
        self.outcomes.insert(pos, outcome);
    }

    pub fn outcomes(&self) -> &[DeleteOutcome] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// true when no page reported any failure
    pub fn is_clean(&self) -> bool {
        self.outcomes.iter().all(DeleteOutcome::is_success)
    }

    pub fn keys_attempted(&self) -> usize {
        self.outcomes.iter().map(|o| o.key_count).sum()
    }

    pub fn keys_deleted(&self) -> usize {
        self.outcomes.iter().map(DeleteOutcome::keys_deleted).sum()
    }

    /// all per-key failures with the page they belong to
    pub fn key_failures(&self) -> impl Iterator<Item = (usize, &KeyFailure)> {
        self.outcomes
            .iter()
            .flat_map(|o| o.key_failures().iter().map(move |f| (o.page, f)))
    }

    pub fn request_failures(&self) -> impl Iterator<Item = (usize, &str)> {
        self.outcomes.iter().filter_map(|o| match &o.status {
            BatchStatus::RequestFailed(msg) => Some((o.page, msg.as_str())),
            _ => None,
        })
    }
}

impl fmt::Display for AggregateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Deleted {} of {} objects in {} batches",
            self.keys_deleted(),
            self.keys_attempted(),
            self.len()
        )?;
        if self.is_clean() {
            return write!(f, ", no errors.");
        }
        write!(f, ". Errors:")?;
        for (page, msg) in self.request_failures() {
            write!(f, "\n  page {page}: {msg}")?;
        }
        for (page, failure) in self.key_failures() {
            write!(f, "\n  page {page}: {failure}")?;
        }
        Ok(())
    }
}

/// Everything a run produced: the report plus the listing error that ended it early, if any.
#[derive(Debug)]
pub struct RunReport {
    pub report: AggregateReport,
    pub pages_listed: usize,
    pub listing_error: Option<RmError>,
}

impl RunReport {
    /// true when nothing was listed that needed deletion
    pub fn nothing_to_delete(&self) -> bool {
        self.listing_error.is_none() && self.report.is_empty()
    }
}
