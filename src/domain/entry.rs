use serde::{Deserialize, Serialize};

/// One unread message as decoded from the feed.
///
/// Entries are rebuilt from scratch on every poll cycle and dropped when the
/// cycle ends; nothing in here survives across polls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailEntry {
    pub title: String,
    pub sender_name: String,
    pub sender_email: String,
}

impl MailEntry {
    pub fn new(
        title: impl Into<String>,
        sender_name: impl Into<String>,
        sender_email: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            sender_name: sender_name.into(),
            sender_email: sender_email.into(),
        }
    }
}
