//! Ephemeral in-memory sink backing status displays.

use std::sync::Mutex;

use crate::app::Result;
use crate::sink::Sink;

/// The delivery retained by a [`DisplaySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub unread_count: usize,
    pub text: String,
}

/// Keeps the most recent delivery that actually carried unread mail.
///
/// Zero-count deliveries (nothing unread, resume notices) leave the retained
/// summary untouched, so a host polling [`DisplaySink::latest`] sees the last
/// state worth showing.
#[derive(Debug, Default)]
pub struct DisplaySink {
    latest: Mutex<Option<Summary>>,
}

impl DisplaySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// The retained summary, if any non-empty delivery has arrived yet.
    pub fn latest(&self) -> Option<Summary> {
        self.latest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Sink for DisplaySink {
    fn name(&self) -> &str {
        "display"
    }

    fn deliver(&self, count: usize, text: &str) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        let mut latest = self
            .latest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *latest = Some(Summary {
            unread_count: count,
            text: text.to_string(),
        });
        Ok(())
    }
}
