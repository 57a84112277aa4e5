//! Durable two-file sink: unread count and header table on disk.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::app::Result;
use crate::sink::Sink;

/// Suffix appended to the root path for the count file.
pub const COUNT_SUFFIX: &str = "-nbmails.txt";
/// Suffix appended to the root path for the header-table file.
pub const HEADERS_SUFFIX: &str = "-headers.txt";

/// Persists every delivery under `<root>-nbmails.txt` and
/// `<root>-headers.txt`.
///
/// The count file holds the unread count and a newline, or a single blank
/// line when the count is zero. The headers file holds the formatted table
/// verbatim and is emptied when there is nothing to show. Each file is
/// written to a temporary sibling and renamed into place, so a concurrent
/// reader never observes a half-written file. Writes are silent.
#[derive(Debug, Clone)]
pub struct FileSink {
    root: PathBuf,
}

impl FileSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the file holding the unread count.
    pub fn count_path(&self) -> PathBuf {
        self.suffixed(COUNT_SUFFIX)
    }

    /// Path of the file holding the formatted header table.
    pub fn headers_path(&self) -> PathBuf {
        self.suffixed(HEADERS_SUFFIX)
    }

    fn suffixed(&self, suffix: &str) -> PathBuf {
        let mut path = self.root.clone().into_os_string();
        path.push(suffix);
        PathBuf::from(path)
    }

    fn write_atomic(path: &Path, contents: &str) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl Sink for FileSink {
    fn name(&self) -> &str {
        "file"
    }

    fn deliver(&self, count: usize, text: &str) -> Result<()> {
        let count_line = if count == 0 {
            "\n".to_string()
        } else {
            format!("{}\n", count)
        };
        Self::write_atomic(&self.count_path(), &count_line)?;

        let headers = if text.is_empty() || text.ends_with('\n') {
            text.to_string()
        } else {
            format!("{}\n", text)
        };
        Self::write_atomic(&self.headers_path(), &headers)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_suffixed_paths() {
        let sink = FileSink::new("/var/run/mail");
        assert_eq!(sink.count_path(), PathBuf::from("/var/run/mail-nbmails.txt"));
        assert_eq!(
            sink.headers_path(),
            PathBuf::from("/var/run/mail-headers.txt")
        );
    }

    #[test]
    fn test_deliver_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("mail"));

        sink.deliver(2, "line one\nline two\n").unwrap();

        assert_eq!(fs::read_to_string(sink.count_path()).unwrap(), "2\n");
        assert_eq!(
            fs::read_to_string(sink.headers_path()).unwrap(),
            "line one\nline two\n"
        );
    }

    #[test]
    fn test_zero_count_writes_blank_line_and_empty_headers() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("mail"));

        sink.deliver(0, "").unwrap();

        assert_eq!(fs::read_to_string(sink.count_path()).unwrap(), "\n");
        assert_eq!(fs::read_to_string(sink.headers_path()).unwrap(), "");
    }

    #[test]
    fn test_resume_notice_persists_its_text() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("mail"));

        sink.deliver(0, "mail check resumed\n").unwrap();

        assert_eq!(fs::read_to_string(sink.count_path()).unwrap(), "\n");
        assert_eq!(
            fs::read_to_string(sink.headers_path()).unwrap(),
            "mail check resumed\n"
        );
    }

    #[test]
    fn test_deliver_overwrites_previous_delivery() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("mail"));

        sink.deliver(5, "old\n").unwrap();
        sink.deliver(1, "new\n").unwrap();

        assert_eq!(fs::read_to_string(sink.count_path()).unwrap(), "1\n");
        assert_eq!(fs::read_to_string(sink.headers_path()).unwrap(), "new\n");
    }

    #[test]
    fn test_missing_trailing_newline_is_added() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("mail"));

        sink.deliver(1, "no newline").unwrap();

        assert_eq!(
            fs::read_to_string(sink.headers_path()).unwrap(),
            "no newline\n"
        );
    }
}
