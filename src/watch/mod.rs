//! Watch rules: regular expressions tested against sender names, each with
//! an optional side-effecting callback.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use regex::Regex;
use tracing::warn;

use crate::app::Result;
use crate::domain::MailEntry;

/// Action fired when a rule matches a sender name.
///
/// Callbacks run once per matching poll cycle, not once per novel message,
/// so the same sender sitting unread across polls re-fires its callback
/// every cycle. Implementations must tolerate repeat invocation. A failing
/// or panicking callback is logged and isolated; it never aborts matching
/// of the remaining names and rules, and never takes the poll cycle down
/// with it.
pub type WatchCallback = Box<dyn Fn() -> anyhow::Result<()> + Send + Sync>;

/// One (pattern, optional callback) pair from the watch list.
pub struct WatchRule {
    pattern: Regex,
    callback: Option<WatchCallback>,
}

impl WatchRule {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            callback: None,
        })
    }

    pub fn with_callback(pattern: &str, callback: WatchCallback) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            callback: Some(callback),
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl fmt::Debug for WatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchRule")
            .field("pattern", &self.pattern.as_str())
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

/// Outcome of matching one batch of entries against the watch list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchOutcome {
    /// True iff at least one rule matched at least one entry.
    pub any_matched: bool,
    /// Matched sender names in match order, one per line.
    pub help_text: String,
}

/// Test every rule against every entry's sender name and fire callbacks.
///
/// Patterns use search semantics, not full-match. Rules are tried in list
/// order for each entry, entries in the order the decoder produced them;
/// several rules may match the same name, each appending it to the help
/// text and firing its own callback.
pub fn apply_watches(entries: &[MailEntry], rules: &[WatchRule]) -> WatchOutcome {
    let mut outcome = WatchOutcome::default();

    for entry in entries {
        for rule in rules {
            if !rule.pattern.is_match(&entry.sender_name) {
                continue;
            }
            outcome.any_matched = true;
            outcome.help_text.push_str(&entry.sender_name);
            outcome.help_text.push('\n');

            if let Some(callback) = &rule.callback {
                match panic::catch_unwind(AssertUnwindSafe(|| callback())) {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => warn!(
                        "Watch callback for pattern '{}' failed: {:#}",
                        rule.pattern(),
                        e
                    ),
                    Err(_) => warn!("Watch callback for pattern '{}' panicked", rule.pattern()),
                }
            }
        }
    }

    outcome
}
