//! Rendering of decoded entries into the fixed-width header table.

use crate::domain::MailEntry;

/// Width of the right-aligned "name <email>" column.
const SENDER_WIDTH: usize = 45;
/// Width of the left-aligned title column; long titles overflow it.
const TITLE_WIDTH: usize = 40;
/// Sender name and address are each capped to this many characters.
const FIELD_MAX: usize = 20;

/// Repair table for the octal byte escapes the feed emits in place of
/// French accented letters. Cosmetic and best-effort only: sequences not
/// listed here pass through untouched.
const CLEANUP_TABLE: [(&str, &str); 6] = [
    ("\\340", "\u{e0}"), // à
    ("\\347", "\u{e7}"), // ç
    ("\\350", "\u{e8}"), // è
    ("\\351", "\u{e9}"), // é
    ("\\352", "\u{ea}"), // ê
    ("\\371", "\u{f9}"), // ù
];

/// Map known byte-escape artifacts to their proper glyphs.
pub fn clean_text(text: &str) -> String {
    let mut out = text.to_string();
    for (escape, glyph) in CLEANUP_TABLE {
        if out.contains(escape) {
            out = out.replace(escape, glyph);
        }
    }
    out
}

fn truncate(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Render one entry as a table line (without trailing newline):
/// right-aligned sender field, " :: ", left-aligned title field.
pub fn format_entry(entry: &MailEntry) -> String {
    let sender = format!(
        "{} <{}>",
        truncate(&clean_text(&entry.sender_name), FIELD_MAX),
        truncate(&clean_text(&entry.sender_email), FIELD_MAX)
    );
    format!(
        "{:>sw$} :: {:<tw$}",
        sender,
        clean_text(&entry.title),
        sw = SENDER_WIDTH,
        tw = TITLE_WIDTH
    )
}

/// Render the whole batch, one newline-terminated line per entry, in the
/// order the decoder produced them.
pub fn render(entries: &[MailEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&format_entry(entry));
        out.push('\n');
    }
    out
}
