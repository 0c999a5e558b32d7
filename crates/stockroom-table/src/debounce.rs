//! Debounced text filter commits
//!
//! Each filter field owns at most one pending commit. A new keystroke aborts
//! the field's pending task and schedules a fresh one, so only the value that
//! stays quiet for the full delay ever reaches the table. Fields debounce
//! independently of one another.

use std::collections::HashMap;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::model::DataTable;

/// Quiet period before a text filter value is committed
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Which text input a value belongs to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FilterField {
    Global,
    Column(String),
}

impl FilterField {
    pub fn column(column_id: impl Into<String>) -> Self {
        Self::Column(column_id.into())
    }
}

/// A settled filter value ready to be applied; `None` clears the filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCommit {
    pub field: FilterField,
    pub value: Option<String>,
}

/// Cancel-and-restart timers for filter text inputs
pub struct FilterDebouncer {
    delay: Duration,
    pending: HashMap<FilterField, JoinHandle<()>>,
    tx: mpsc::UnboundedSender<FilterCommit>,
    rx: mpsc::UnboundedReceiver<FilterCommit>,
}

impl Default for FilterDebouncer {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterDebouncer {
    pub fn new() -> Self {
        Self::with_delay(DEFAULT_DEBOUNCE)
    }

    pub fn with_delay(delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            delay,
            pending: HashMap::new(),
            tx,
            rx,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Record raw input for a field, replacing any pending commit.
    ///
    /// Empty text commits as `None`. Returns `false` when no tokio runtime
    /// is available: the value is then committed immediately, undebounced.
    pub fn input(&mut self, field: FilterField, text: impl Into<String>) -> bool {
        let text = text.into();
        let commit = FilterCommit {
            value: (!text.is_empty()).then_some(text),
            field: field.clone(),
        };

        if let Some(previous) = self.pending.remove(&field) {
            previous.abort();
        }

        let Ok(handle) = Handle::try_current() else {
            tracing::error!(?field, "no async runtime, committing filter without debounce");
            let _ = self.tx.send(commit);
            return false;
        };

        let tx = self.tx.clone();
        let delay = self.delay;
        let task = handle.spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver lives as long as the debouncer, which aborts us on drop
            let _ = tx.send(commit);
        });
        self.pending.insert(field, task);
        true
    }

    /// Drop a field's pending commit without applying it
    pub fn cancel(&mut self, field: &FilterField) -> bool {
        match self.pending.remove(field) {
            Some(task) => {
                let was_pending = !task.is_finished();
                task.abort();
                was_pending
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, task) in self.pending.drain() {
            task.abort();
        }
    }

    /// Whether a commit is scheduled but has not fired yet
    pub fn is_pending(&self, field: &FilterField) -> bool {
        self.pending.get(field).is_some_and(|task| !task.is_finished())
    }

    /// Take a commit that has already fired, if any
    pub fn try_next_commit(&mut self) -> Option<FilterCommit> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next commit to fire
    pub async fn next_commit(&mut self) -> Option<FilterCommit> {
        self.rx.recv().await
    }

    /// Apply every commit that has fired so far; returns how many were applied
    pub fn apply_ready<T>(&mut self, table: &mut DataTable<T>) -> usize {
        let mut applied = 0;
        while let Some(commit) = self.try_next_commit() {
            tracing::debug!(field = ?commit.field, value = ?commit.value, "applying debounced filter");
            table.apply_filter_commit(commit);
            applied += 1;
        }
        self.pending.retain(|_, task| !task.is_finished());
        applied
    }
}

impl Drop for FilterDebouncer {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

impl std::fmt::Debug for FilterDebouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterDebouncer")
            .field("delay", &self.delay)
            .field("pending", &self.pending.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commits_immediately_without_runtime() {
        let mut debouncer = FilterDebouncer::new();
        assert!(!debouncer.input(FilterField::Global, "shirt"));

        assert_eq!(
            debouncer.try_next_commit(),
            Some(FilterCommit {
                field: FilterField::Global,
                value: Some("shirt".into()),
            })
        );
        assert!(!debouncer.is_pending(&FilterField::Global));
    }

    #[test]
    fn test_empty_input_clears() {
        let mut debouncer = FilterDebouncer::new();
        debouncer.input(FilterField::column("name"), "");

        let commit = debouncer.try_next_commit().unwrap();
        assert_eq!(commit.field, FilterField::column("name"));
        assert_eq!(commit.value, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_nothing_fires_before_delay() {
        let mut debouncer = FilterDebouncer::new();
        assert!(debouncer.input(FilterField::Global, "s"));

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert_eq!(debouncer.try_next_commit(), None);
        assert!(debouncer.is_pending(&FilterField::Global));

        let commit = debouncer.next_commit().await.unwrap();
        assert_eq!(commit.value.as_deref(), Some("s"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_commit() {
        let mut debouncer = FilterDebouncer::new();
        debouncer.input(FilterField::Global, "shirt");
        assert!(debouncer.cancel(&FilterField::Global));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(debouncer.try_next_commit(), None);
    }
}
