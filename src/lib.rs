//! # Mailvane
//!
//! A poll-and-notify watcher for webmail unread feeds.
//!
//! ## Architecture
//!
//! Mailvane follows a pipeline architecture driven by a rate-limited tick:
//!
//! ```text
//! Poller → Fetcher → Decoder → Watch → Format → Dispatch → sinks
//! ```
//!
//! - [`poller`]: rate gate, suspend bookkeeping, and the tick loop
//! - [`fetcher`]: opaque authenticated fetch of the feed document
//! - [`decoder`]: unread count plus per-entry title/name/email triples
//! - [`watch`]: sender-name patterns with side-effecting callbacks
//! - [`format`]: fixed-width table rendering and character cleanup
//! - [`sink`]: fan-out to the registered outputs
//!
//! ## Quick Start
//!
//! ```bash
//! # One cycle, printed to stdout
//! mailvane poll
//!
//! # The polling loop (SIGUSR1 toggles suspend)
//! mailvane run --interval 3m
//!
//! # Last persisted count and headers
//! mailvane status
//! ```

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together all components:
/// fetcher, decoder, watch list, sink registry, poll state.
pub mod app;

/// Command-line interface using clap.
///
/// - `poll` - Run one cycle now
/// - `run [--interval]` - Run the polling loop
/// - `status` - Print the last persisted state
pub mod cli;

/// Configuration management.
///
/// Loads from `~/.config/mailvane/config.toml`: feed endpoint and
/// credentials, output root, watch rules.
pub mod config;

/// Feed decoding: unread count and per-entry metadata triples.
pub mod decoder;

/// Core domain models.
///
/// - [`MailEntry`](domain::MailEntry): one unread message's metadata
/// - [`PollState`](domain::PollState): process-wide poll bookkeeping
pub mod domain;

/// Forward-only extraction of `<tag>...</tag>` blocks.
pub mod extract;

/// HTTP fetching behind the [`Fetcher`](fetcher::Fetcher) trait.
pub mod fetcher;

/// Fixed-width rendering of the header table.
pub mod format;

/// The rate-limiting gate and the recurring poll loop.
pub mod poller;

/// Output fan-out: the [`Sink`](sink::Sink) trait, the durable file sink,
/// and the in-memory display sink.
pub mod sink;

/// Watch rules matched against sender names.
pub mod watch;
