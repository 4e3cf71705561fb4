// ABOUTME: Debounced search input with cancellation and stale-response gating
// ABOUTME: Keystrokes update the display value immediately; commits fire after 300ms of inactivity

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::trace;

/// Quiet period before a search commit fires
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// A committed search value. The sequence number increases with every
/// keystroke, so consumers can correlate responses with the query that
/// produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCommit {
    pub seq: u64,
    pub value: String,
}

/// Owns the debounce timer for the search box. Each keystroke cancels
/// the pending commit and schedules a new one; dropping the debouncer
/// cancels any pending commit.
pub struct SearchDebouncer {
    display: String,
    seq: u64,
    delay: Duration,
    pending: Option<JoinHandle<()>>,
    tx: watch::Sender<SearchCommit>,
}

impl SearchDebouncer {
    /// Create a debouncer with the standard 300ms delay. The receiver
    /// observes committed values; its initial value is the empty search.
    pub fn new() -> (Self, watch::Receiver<SearchCommit>) {
        Self::with_delay(SEARCH_DEBOUNCE)
    }

    pub fn with_delay(delay: Duration) -> (Self, watch::Receiver<SearchCommit>) {
        let (tx, rx) = watch::channel(SearchCommit {
            seq: 0,
            value: String::new(),
        });
        (
            Self {
                display: String::new(),
                seq: 0,
                delay,
                pending: None,
                tx,
            },
            rx,
        )
    }

    /// The immediate display value, updated on every keystroke
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Record a keystroke: update the display value, invalidate any
    /// pending commit, and schedule a new one after the quiet period.
    pub fn input(&mut self, text: impl Into<String>) {
        self.display = text.into();
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }

        self.seq += 1;
        let seq = self.seq;
        let value = self.display.clone();
        let tx = self.tx.clone();
        let delay = self.delay;

        trace!(seq, "Scheduling search commit");
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(SearchCommit { seq, value });
        }));
    }

    /// Cancel any pending commit without touching the display value
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Last-writer-wins correlation for in-flight list requests: a response
/// is only applied if its ticket is still the latest issued one.
#[derive(Debug, Default)]
pub struct QueryGate {
    latest: AtomicU64,
}

impl QueryGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a ticket for a new request, superseding all earlier ones
    pub fn begin(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether a response for `ticket` may still be applied
    pub fn is_current(&self, ticket: u64) -> bool {
        ticket == self.latest.load(Ordering::SeqCst)
    }
}
