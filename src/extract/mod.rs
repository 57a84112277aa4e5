//! Forward-only extraction of `<tag>...</tag>` blocks from a document.
//!
//! The feed decoder walks one shared cursor through the document, pulling
//! repeated blocks in order. Scanning never backtracks past a returned
//! cursor, so a sequence of [`extract_block`] calls makes a single pass.

use crate::app::{MailvaneError, Result};

/// A block pulled out of the document, plus the cursor position just past
/// its closing marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub value: String,
    pub next_cursor: usize,
}

/// Extract the next `<tag>...</tag>` block at or after `cursor`.
///
/// An empty element (`<tag></tag>`) yields the placeholder text from
/// [`empty_placeholder`] rather than an empty string; the cursor still
/// advances past the closing marker. A missing opening or closing marker is
/// a [`MailvaneError::MalformedDocument`] so that callers expecting a fixed
/// number of blocks can tell "no more entries" from a corrupt one. A cursor
/// already past the end of the document, or off a character boundary,
/// reports the same error.
pub fn extract_block(document: &str, cursor: usize, tag: &str) -> Result<Block> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);

    let tail = document
        .get(cursor..)
        .ok_or_else(|| MailvaneError::MalformedDocument {
            tag: tag.to_string(),
            offset: cursor,
        })?;
    let open_at = tail
        .find(&open)
        .map(|i| cursor + i)
        .ok_or_else(|| MailvaneError::MalformedDocument {
            tag: tag.to_string(),
            offset: cursor,
        })?;
    let value_start = open_at + open.len();

    let close_at = document[value_start..]
        .find(&close)
        .map(|i| value_start + i)
        .ok_or_else(|| MailvaneError::MalformedDocument {
            tag: tag.to_string(),
            offset: value_start,
        })?;

    let value = if close_at == value_start {
        empty_placeholder(tag)
    } else {
        document[value_start..close_at].to_string()
    };

    Ok(Block {
        value,
        next_cursor: close_at + close.len(),
    })
}

/// Placeholder substituted for an empty `<tag></tag>` element.
pub fn empty_placeholder(tag: &str) -> String {
    format!("--- no {} ---", tag)
}

/// Count occurrences of the opening marker for `tag` in the whole document.
pub fn count_blocks(document: &str, tag: &str) -> usize {
    document.matches(&format!("<{}>", tag)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_basic_block() {
        let doc = "<title>Hello</title>";
        let block = extract_block(doc, 0, "title").unwrap();
        assert_eq!(block.value, "Hello");
        assert_eq!(block.next_cursor, doc.len());
    }

    #[test]
    fn test_extract_skips_leading_noise() {
        let doc = "junk before <name>Ann</name> after";
        let block = extract_block(doc, 0, "name").unwrap();
        assert_eq!(block.value, "Ann");
        assert_eq!(&doc[block.next_cursor..], " after");
    }

    #[test]
    fn test_extract_sequence_shares_cursor() {
        let doc = "<title>One</title><title>Two</title>";
        let first = extract_block(doc, 0, "title").unwrap();
        let second = extract_block(doc, first.next_cursor, "title").unwrap();
        assert_eq!(first.value, "One");
        assert_eq!(second.value, "Two");
    }

    #[test]
    fn test_extract_empty_block_yields_placeholder() {
        let doc = "<title></title><name>Ann</name>";
        let block = extract_block(doc, 0, "title").unwrap();
        assert_eq!(block.value, "--- no title ---");

        // The cursor still advanced past the closing marker
        let next = extract_block(doc, block.next_cursor, "name").unwrap();
        assert_eq!(next.value, "Ann");
    }

    #[test]
    fn test_extract_missing_open_marker_is_malformed() {
        let err = extract_block("no markers here", 0, "title").unwrap_err();
        assert!(matches!(
            err,
            MailvaneError::MalformedDocument { ref tag, .. } if tag == "title"
        ));
    }

    #[test]
    fn test_extract_missing_close_marker_is_malformed() {
        let err = extract_block("<title>dangling", 0, "title").unwrap_err();
        assert!(matches!(err, MailvaneError::MalformedDocument { .. }));
    }

    #[test]
    fn test_extract_never_backtracks() {
        let doc = "<title>Early</title> tail";
        let past = doc.len() - 4;
        assert!(extract_block(doc, past, "title").is_err());
    }

    #[test]
    fn test_extract_cursor_past_end_is_malformed() {
        let err = extract_block("short", 99, "title").unwrap_err();
        assert!(matches!(
            err,
            MailvaneError::MalformedDocument { ref tag, offset: 99 } if tag == "title"
        ));
    }

    #[test]
    fn test_extract_cursor_off_char_boundary_is_malformed() {
        // Cursor lands inside the two-byte 'é'
        let doc = "caf\u{e9} <title>x</title>";
        assert!(extract_block(doc, 4, "title").is_err());
    }

    #[test]
    fn test_extract_multibyte_content() {
        let doc = "<name>Ren\u{e9}e \u{e9}t\u{e9}</name>";
        let block = extract_block(doc, 0, "name").unwrap();
        assert_eq!(block.value, "Ren\u{e9}e \u{e9}t\u{e9}");
        assert_eq!(block.next_cursor, doc.len());
    }

    #[test]
    fn test_count_blocks() {
        let doc = "<title>a</title><title>b</title><title></title>";
        assert_eq!(count_blocks(doc, "title"), 3);
        assert_eq!(count_blocks(doc, "name"), 0);
        assert_eq!(count_blocks("", "title"), 0);
    }
}
