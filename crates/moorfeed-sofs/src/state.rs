//! The last-upload-date state file.
//!
//! A single timestamp on disk records the newest catalog upload date whose
//! data has been delivered to the database. The daily run reads it to pick
//! up where the previous run stopped and advances it only after a
//! successful upload.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

use crate::catalog::UPLOAD_DATE_FORMAT;
use crate::error::{Error, Result};

/// Handle to the state file holding the last delivered upload date.
#[derive(Debug, Clone)]
pub struct LastUploadFile {
    path: PathBuf,
}

impl LastUploadFile {
    /// Creates a handle for the given path (the file need not exist yet).
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The path of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the recorded upload date.
    ///
    /// A missing file is not an error — it means no upload has ever
    /// happened (first run), so `Ok(None)` is returned.
    pub fn read(&self) -> Result<Option<NaiveDateTime>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let raw = content.trim();
        let parsed = NaiveDateTime::parse_from_str(raw, UPLOAD_DATE_FORMAT).map_err(|e| {
            Error::state(format!(
                "{} holds '{raw}', not a {UPLOAD_DATE_FORMAT} timestamp: {e}",
                self.path.display()
            ))
        })?;
        Ok(Some(parsed))
    }

    /// Records a new upload date, overwriting the previous one.
    pub fn write(&self, datetime: NaiveDateTime) -> Result<()> {
        let formatted = datetime.format(UPLOAD_DATE_FORMAT).to_string();
        std::fs::write(&self.path, formatted)?;
        tracing::debug!(path = %self.path.display(), date = %datetime, "advanced state file");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 2)
            .unwrap()
            .and_hms_opt(1, 7, 10)
            .unwrap()
    }

    #[test]
    fn test_missing_file_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let state = LastUploadFile::new(dir.path().join("last.txt"));
        assert_eq!(state.read().unwrap(), None);
    }

    #[test]
    fn test_write_then_read_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let state = LastUploadFile::new(dir.path().join("last.txt"));
        state.write(ts()).unwrap();
        assert_eq!(state.read().unwrap(), Some(ts()));
    }

    #[test]
    fn test_on_disk_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last.txt");
        let state = LastUploadFile::new(&path);
        state.write(ts()).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "2024-06-02T01:07:10Z"
        );
    }

    #[test]
    fn test_tolerates_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last.txt");
        std::fs::write(&path, "2024-06-02T01:07:10Z\n").unwrap();
        assert_eq!(LastUploadFile::new(&path).read().unwrap(), Some(ts()));
    }

    #[test]
    fn test_garbage_content_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last.txt");
        std::fs::write(&path, "not a date").unwrap();
        assert!(LastUploadFile::new(&path).read().is_err());
    }
}
