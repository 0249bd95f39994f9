//! Destination for exported artifacts.

use std::ffi::OsStr;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::{NokeyError, Result};

/// Receives a finished artifact and makes it available to the user.
pub trait DownloadSink: Send + Sync {
    /// Saves `bytes` under `filename` and returns where it landed.
    ///
    /// # Errors
    ///
    /// Returns [`NokeyError::Export`] if `filename` is not a bare file
    /// name, or [`NokeyError::Io`] if writing fails.
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf>;
}

/// [`DownloadSink`] that writes into a directory, creating it on demand.
///
/// An existing file with the same name is overwritten.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DownloadSink for DirectorySink {
    fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        if filename.is_empty() || Path::new(filename).file_name() != Some(OsStr::new(filename)) {
            return Err(NokeyError::Export(format!(
                "refusing to write {filename:?} outside the export directory"
            )));
        }

        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        let mut file = fs::File::create(&path)?;
        file.write_all(bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "export saved");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_directory_and_writes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(tmp.path().join("nested").join("exports"));

        let path = sink.save("AAPL_yahoo.csv", b"date\n2024-01-02").unwrap();
        assert_eq!(path, sink.dir().join("AAPL_yahoo.csv"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "date\n2024-01-02");
    }

    #[test]
    fn overwrites_existing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(tmp.path());
        sink.save("a.csv", b"old").unwrap();
        let path = sink.save("a.csv", b"new").unwrap();
        assert_eq!(fs::read(path).unwrap(), b"new");
    }

    #[test]
    fn rejects_paths() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = DirectorySink::new(tmp.path());
        assert!(matches!(
            sink.save("../escape.csv", b""),
            Err(NokeyError::Export(_))
        ));
        assert!(matches!(sink.save("", b""), Err(NokeyError::Export(_))));
    }
}
