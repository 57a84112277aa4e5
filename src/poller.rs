//! The recurring poll loop and its rate-limiting gate.
//!
//! The loop wakes once a second, asks [`should_poll`] whether a fetch is
//! due, and when it is, launches one cycle continuation onto the runtime.
//! The issuing tick never waits for the response; at most one fetch is in
//! flight at a time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::app::AppContext;
use crate::domain::PollState;

/// How often the loop wakes to consult the gate.
const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Default minimum seconds between two polls.
pub const DEFAULT_MIN_INTERVAL_SECS: u64 = 180;

#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Minimum seconds between two fetches.
    pub min_interval_secs: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            min_interval_secs: DEFAULT_MIN_INTERVAL_SECS,
        }
    }
}

impl PollerConfig {
    /// Parse interval string like "90s", "3m", "2h", "1d"
    pub fn parse_interval(s: &str) -> Result<u64, String> {
        let s = s.trim().to_lowercase();

        if let Some(hours) = s.strip_suffix('h') {
            hours
                .parse::<u64>()
                .ok()
                .and_then(|h| h.checked_mul(3600))
                .ok_or_else(|| format!("Invalid hours: {}", hours))
        } else if let Some(minutes) = s.strip_suffix('m') {
            minutes
                .parse::<u64>()
                .ok()
                .and_then(|m| m.checked_mul(60))
                .ok_or_else(|| format!("Invalid minutes: {}", minutes))
        } else if let Some(days) = s.strip_suffix('d') {
            days.parse::<u64>()
                .ok()
                .and_then(|d| d.checked_mul(86400))
                .ok_or_else(|| format!("Invalid days: {}", days))
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.parse::<u64>()
                .map_err(|_| format!("Invalid seconds: {}", secs))
        } else {
            // Try parsing as raw seconds
            s.parse::<u64>()
                .map_err(|_| format!("Invalid interval: {}. Use format like '3m', '90s', '1h'", s))
        }
    }

    /// Format interval for display
    pub fn format_interval(secs: u64) -> String {
        if secs >= 86400 && secs.is_multiple_of(86400) {
            format!("{}d", secs / 86400)
        } else if secs >= 3600 && secs.is_multiple_of(3600) {
            format!("{}h", secs / 3600)
        } else if secs >= 60 && secs.is_multiple_of(60) {
            format!("{}m", secs / 60)
        } else {
            format!("{}s", secs)
        }
    }
}

/// Rate gate: decide whether a poll is due at `now`.
///
/// The first call ever records `now` and lets the poll through. When the
/// gate opens, `last_poll_at` advances to `now` in the same step; no other
/// code path touches it. A clock reading earlier than the recorded
/// timestamp resynchronizes the record to `now` and suppresses the poll for
/// this tick.
pub fn should_poll(state: &mut PollState, now: DateTime<Utc>, min_interval_secs: u64) -> bool {
    let last = match state.last_poll_at {
        Some(last) => last,
        None => {
            state.last_poll_at = Some(now);
            return true;
        }
    };

    if now < last {
        warn!(
            "Clock moved backwards ({} < {}), resynchronizing poll timestamp",
            now, last
        );
        state.last_poll_at = Some(now);
        return false;
    }

    if now.signed_duration_since(last).num_seconds() >= min_interval_secs as i64 {
        state.last_poll_at = Some(now);
        true
    } else {
        false
    }
}

/// Releases the fetch slot when the cycle task ends, even if it unwinds.
struct FetchSlot {
    ctx: Arc<AppContext>,
}

impl Drop for FetchSlot {
    fn drop(&mut self) {
        self.ctx.finish_fetch();
    }
}

/// Poll loop runner
pub struct Poller {
    ctx: Arc<AppContext>,
    config: PollerConfig,
    running: Arc<AtomicBool>,
}

impl Poller {
    pub fn new(ctx: Arc<AppContext>, config: PollerConfig) -> Self {
        Self {
            ctx,
            config,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// One gate evaluation at `now`; true when a cycle was launched.
    ///
    /// A tick that finds a fetch still in flight returns before consulting
    /// the gate, so skipped ticks do not advance `last_poll_at`. While
    /// suspended, the gate is still evaluated for bookkeeping but no fetch
    /// is issued.
    pub fn tick(&self, now: DateTime<Utc>) -> bool {
        if self.ctx.fetch_in_flight() {
            return false;
        }

        let (due, suspended) = {
            let mut state = self.ctx.lock_state();
            let due = should_poll(&mut state, now, self.config.min_interval_secs);
            (due, state.suspended)
        };

        if !due {
            return false;
        }

        if suspended {
            debug!("Poll due but mail checking is suspended");
            return false;
        }

        if !self.ctx.try_begin_fetch() {
            return false;
        }

        let ctx = self.ctx.clone();
        tokio::spawn(async move {
            let _slot = FetchSlot { ctx: ctx.clone() };
            if let Err(e) = ctx.run_cycle().await {
                warn!("Poll cycle failed: {}", e);
            }
        });

        true
    }

    /// Run the loop until stopped.
    pub async fn run(&self) {
        // Set up signal handlers: SIGTERM/SIGINT for graceful shutdown,
        // SIGUSR1 to toggle suspend
        let running = self.running.clone();

        #[cfg(unix)]
        {
            let running_clone = running.clone();
            tokio::spawn(async move {
                let mut sigterm =
                    tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                        .expect("Failed to set up SIGTERM handler");
                let mut sigint =
                    tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())
                        .expect("Failed to set up SIGINT handler");

                tokio::select! {
                    _ = sigterm.recv() => {},
                    _ = sigint.recv() => {},
                }
                running_clone.store(false, Ordering::SeqCst);
            });

            let ctx = self.ctx.clone();
            tokio::spawn(async move {
                let mut sigusr1 =
                    tokio::signal::unix::signal(tokio::signal::unix::SignalKind::user_defined1())
                        .expect("Failed to set up SIGUSR1 handler");

                while sigusr1.recv().await.is_some() {
                    let suspended = ctx.toggle_suspend();
                    info!(
                        "Mail checking {}",
                        if suspended { "suspended" } else { "resumed" }
                    );
                }
            });
        }

        #[cfg(windows)]
        {
            let running_clone = running.clone();
            tokio::spawn(async move {
                let _ = tokio::signal::ctrl_c().await;
                running_clone.store(false, Ordering::SeqCst);
            });
        }

        info!(
            "Poller started (minimum interval: {})",
            PollerConfig::format_interval(self.config.min_interval_secs)
        );

        let mut timer = interval(TICK_PERIOD);
        while self.running.load(Ordering::SeqCst) {
            timer.tick().await;

            if !self.running.load(Ordering::SeqCst) {
                break;
            }

            self.tick(Utc::now());
        }

        info!("Poller shutting down");
    }

    /// Stop the loop (called externally)
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}
