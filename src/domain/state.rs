use chrono::{DateTime, Utc};

/// Process-wide poll bookkeeping.
///
/// A single instance lives inside [`AppContext`](crate::app::AppContext)
/// behind a mutex for the lifetime of the process. The scheduler owns
/// `last_poll_at` and `suspended`; the remaining fields are rewritten
/// together when a cycle completes, so a cycle that fails before its decode
/// finishes leaves them exactly as they were.
#[derive(Debug, Clone, Default)]
pub struct PollState {
    /// When the gate last let a poll through; `None` until the first tick.
    pub last_poll_at: Option<DateTime<Utc>>,
    /// While set, due ticks are still bookkept but no fetch is issued.
    pub suspended: bool,
    /// Entry count of the most recently completed decode.
    pub unread_count: usize,
    /// Formatted header table from the most recently completed cycle.
    pub last_output: String,
    /// Whether any watch rule matched in the last completed cycle.
    pub highlight: bool,
    /// Matched sender names from the last completed cycle, one per line.
    pub help_text: String,
}

impl PollState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish the results of a completed cycle in one step.
    pub fn complete_cycle(
        &mut self,
        unread_count: usize,
        output: String,
        highlight: bool,
        help_text: String,
    ) {
        self.unread_count = unread_count;
        self.last_output = output;
        self.highlight = highlight;
        self.help_text = help_text;
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            unread_count: self.unread_count,
            help_text: self.help_text.clone(),
            highlight: self.highlight,
        }
    }
}

/// What a status display needs in order to render the mail indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub unread_count: usize,
    pub help_text: String,
    pub highlight: bool,
}
