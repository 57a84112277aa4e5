use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use tracing::debug;

use crate::app::error::Result;
use crate::decoder::Decoder;
use crate::domain::{PollState, StatusSnapshot};
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::Fetcher;
use crate::format;
use crate::sink::{self, Sink};
use crate::watch::{self, WatchRule};

/// Fixed text dispatched when suspend is toggled off.
///
/// Sinks receive it with a count of 0, which at the sink level is
/// indistinguishable from "no unread mail". The on-disk file contract relies
/// on that conflation, so it is kept rather than modeled as a separate event
/// kind.
pub const RESUME_NOTICE: &str = "mail check resumed\n";

/// What one completed cycle produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleSummary {
    pub unread_count: usize,
    pub formatted: String,
    pub any_matched: bool,
}

/// Owned wiring of the poll cycle: the fetcher, the watch list, the sink
/// registry, and the shared [`PollState`].
///
/// The scheduler spawns cycle continuations onto the runtime, so the state
/// sits behind a mutex and the watch/sink lists behind rwlocks. Watch rules
/// are read fresh on every cycle; the surrounding application may edit them
/// at any time between cycles.
pub struct AppContext {
    fetcher: Arc<dyn Fetcher + Send + Sync>,
    decoder: Decoder,
    feed_url: String,
    state: Mutex<PollState>,
    watches: RwLock<Vec<WatchRule>>,
    sinks: RwLock<Vec<Arc<dyn Sink>>>,
    fetch_in_flight: AtomicBool,
}

impl AppContext {
    /// Build a context around the default HTTP fetcher. Fails if `feed_url`
    /// is not a valid URL.
    pub fn new(feed_url: &str) -> Result<Self> {
        url::Url::parse(feed_url)?;
        Ok(Self::with_fetcher(feed_url, Arc::new(HttpFetcher::new())))
    }

    /// Build a context around an explicit fetcher (embedders, tests).
    pub fn with_fetcher(feed_url: &str, fetcher: Arc<dyn Fetcher + Send + Sync>) -> Self {
        Self {
            fetcher,
            decoder: Decoder::new(),
            feed_url: feed_url.to_string(),
            state: Mutex::new(PollState::new()),
            watches: RwLock::new(Vec::new()),
            sinks: RwLock::new(Vec::new()),
            fetch_in_flight: AtomicBool::new(false),
        }
    }

    pub fn feed_url(&self) -> &str {
        &self.feed_url
    }

    pub fn add_watch(&self, rule: WatchRule) {
        self.watches
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(rule);
    }

    pub fn set_watches(&self, rules: Vec<WatchRule>) {
        *self
            .watches
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = rules;
    }

    pub fn register_sink(&self, sink: Arc<dyn Sink>) {
        self.sinks
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(sink);
    }

    /// Snapshot of the last completed cycle, for status displays.
    pub fn status(&self) -> StatusSnapshot {
        self.lock_state().snapshot()
    }

    pub fn is_suspended(&self) -> bool {
        self.lock_state().suspended
    }

    /// Flip the suspend flag and return the new value.
    ///
    /// Leaving the suspended state dispatches [`RESUME_NOTICE`] with count 0
    /// to every sink immediately, bypassing the interval gate.
    pub fn toggle_suspend(&self) -> bool {
        let suspended = {
            let mut state = self.lock_state();
            state.suspended = !state.suspended;
            state.suspended
        };
        if !suspended {
            self.dispatch(0, RESUME_NOTICE);
        }
        suspended
    }

    pub(crate) fn lock_state(&self) -> MutexGuard<'_, PollState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Fan `(count, text)` out to every registered sink in order.
    pub fn dispatch(&self, count: usize, text: &str) {
        let sinks = self
            .sinks
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        sink::dispatch(count, text, &sinks);
    }

    /// Run one complete fetch, decode, match, format, dispatch pass.
    ///
    /// State is touched only after a fully successful decode: a fetch or
    /// decode failure returns the error and leaves the previous count,
    /// output, and help text exactly as they were. A failed cycle is a
    /// missed cycle; the next due tick recovers.
    pub async fn run_cycle(&self) -> Result<CycleSummary> {
        let document = self.fetcher.fetch(&self.feed_url).await?;
        let feed = self.decoder.decode(&document)?;

        let outcome = {
            let watches = self
                .watches
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            watch::apply_watches(&feed.entries, &watches)
        };

        let formatted = format::render(&feed.entries);

        {
            let mut state = self.lock_state();
            state.complete_cycle(
                feed.unread_count,
                formatted.clone(),
                outcome.any_matched,
                outcome.help_text,
            );
        }

        debug!(
            "Cycle complete: {} unread, watch hit: {}",
            feed.unread_count, outcome.any_matched
        );
        self.dispatch(feed.unread_count, &formatted);

        Ok(CycleSummary {
            unread_count: feed.unread_count,
            formatted,
            any_matched: outcome.any_matched,
        })
    }

    /// Claim the single fetch slot; false means a cycle is already in
    /// flight and the caller must skip this tick.
    pub(crate) fn try_begin_fetch(&self) -> bool {
        !self.fetch_in_flight.swap(true, Ordering::SeqCst)
    }

    pub(crate) fn finish_fetch(&self) {
        self.fetch_in_flight.store(false, Ordering::SeqCst);
    }

    pub fn fetch_in_flight(&self) -> bool {
        self.fetch_in_flight.load(Ordering::SeqCst)
    }
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("feed_url", &self.feed_url)
            .field("fetch_in_flight", &self.fetch_in_flight())
            .finish_non_exhaustive()
    }
}
