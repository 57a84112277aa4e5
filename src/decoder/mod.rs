use html_escape::decode_html_entities;

use crate::app::Result;
use crate::domain::MailEntry;
use crate::extract::{count_blocks, extract_block};

/// Tag enclosing each message's subject; its occurrence count across the
/// whole document is the authoritative unread count.
pub const TITLE_TAG: &str = "title";
/// Tag enclosing the sender's display name.
pub const SENDER_NAME_TAG: &str = "name";
/// Tag enclosing the sender's address.
pub const SENDER_EMAIL_TAG: &str = "email";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFeed {
    pub unread_count: usize,
    pub entries: Vec<MailEntry>,
}

#[derive(Clone)]
pub struct Decoder;

impl Default for Decoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder {
    pub fn new() -> Self {
        Self
    }

    /// Decode the feed document into an unread count plus one [`MailEntry`]
    /// per unread message, in document order.
    ///
    /// The unread count is taken up front by counting `<title>` markers.
    /// Each entry is then read as a title/name/email triple through one
    /// shared cursor, so entry *i*'s email block is consumed before entry
    /// *i+1*'s title block. Any structural mismatch aborts the whole decode;
    /// no partial entry list is ever returned.
    pub fn decode(&self, document: &str) -> Result<DecodedFeed> {
        let unread_count = count_blocks(document, TITLE_TAG);
        let mut entries = Vec::with_capacity(unread_count);
        let mut cursor = 0;

        for _ in 0..unread_count {
            let title = extract_block(document, cursor, TITLE_TAG)?;
            cursor = title.next_cursor;
            let name = extract_block(document, cursor, SENDER_NAME_TAG)?;
            cursor = name.next_cursor;
            let email = extract_block(document, cursor, SENDER_EMAIL_TAG)?;
            cursor = email.next_cursor;

            entries.push(MailEntry {
                title: decode_field(&title.value),
                sender_name: decode_field(&name.value),
                sender_email: decode_field(&email.value),
            });
        }

        Ok(DecodedFeed {
            unread_count,
            entries,
        })
    }
}

fn decode_field(raw: &str) -> String {
    decode_html_entities(raw).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::MailvaneError;

    fn entry_block(title: &str, name: &str, email: &str) -> String {
        format!(
            "<title>{}</title><name>{}</name><email>{}</email>",
            title, name, email
        )
    }

    #[test]
    fn test_decode_returns_entries_in_document_order() {
        let doc = format!(
            "{}{}",
            entry_block("Hi", "Ann", "a@x.com"),
            entry_block("Re", "Bob", "b@x.com")
        );
        let decoded = Decoder::new().decode(&doc).unwrap();

        assert_eq!(decoded.unread_count, 2);
        assert_eq!(decoded.entries.len(), 2);
        assert_eq!(decoded.entries[0], MailEntry::new("Hi", "Ann", "a@x.com"));
        assert_eq!(decoded.entries[1], MailEntry::new("Re", "Bob", "b@x.com"));
    }

    #[test]
    fn test_decode_empty_document() {
        let decoded = Decoder::new().decode("").unwrap();
        assert_eq!(decoded.unread_count, 0);
        assert!(decoded.entries.is_empty());
    }

    #[test]
    fn test_decode_tolerates_noise_between_blocks() {
        let doc = format!(
            "<feed>\n  {}\n  {}\n</feed>",
            entry_block("One", "Ann", "a@x.com"),
            entry_block("Two", "Bob", "b@x.com")
        );
        let decoded = Decoder::new().decode(&doc).unwrap();
        assert_eq!(decoded.unread_count, 2);
        assert_eq!(decoded.entries[1].title, "Two");
    }

    #[test]
    fn test_decode_empty_title_uses_placeholder() {
        let doc = entry_block("", "Ann", "a@x.com");
        let decoded = Decoder::new().decode(&doc).unwrap();
        assert_eq!(decoded.entries[0].title, "--- no title ---");
        assert_eq!(decoded.entries[0].sender_name, "Ann");
    }

    #[test]
    fn test_decode_malformed_entry_aborts_whole_decode() {
        // Second entry is missing its email block entirely
        let doc = format!(
            "{}<title>Re</title><name>Bob</name>",
            entry_block("Hi", "Ann", "a@x.com")
        );
        let err = Decoder::new().decode(&doc).unwrap_err();
        assert!(matches!(
            err,
            MailvaneError::MalformedDocument { ref tag, .. } if tag == SENDER_EMAIL_TAG
        ));
    }

    #[test]
    fn test_decode_html_entities_in_fields() {
        let doc = entry_block("Q&amp;A", "Smith &amp; Sons", "s&amp;s@x.com");
        let decoded = Decoder::new().decode(&doc).unwrap();
        assert_eq!(decoded.entries[0].title, "Q&A");
        assert_eq!(decoded.entries[0].sender_name, "Smith & Sons");
        assert_eq!(decoded.entries[0].sender_email, "s&s@x.com");
    }

    #[test]
    fn test_decode_count_matches_title_occurrences() {
        let doc = format!(
            "{}{}{}",
            entry_block("a", "n1", "e1"),
            entry_block("b", "n2", "e2"),
            entry_block("c", "n3", "e3")
        );
        let decoded = Decoder::new().decode(&doc).unwrap();
        assert_eq!(decoded.unread_count, 3);
        assert_eq!(decoded.entries.len(), decoded.unread_count);
    }
}
