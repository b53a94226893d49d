//! Per-request scratch files.
//!
//! Every file is a [`NamedTempFile`] with a random, exclusively created name, so
//! concurrent requests never share a path. The file is removed when the handle drops,
//! on every exit path; removal errors are ignored.

use std::io;
use std::path::PathBuf;
use tempfile::{Builder, NamedTempFile};

/// Where scratch files are created.
#[derive(Debug, Clone, Default)]
pub struct ScratchSpace {
    dir: Option<PathBuf>,
}

impl ScratchSpace {
    /// Scratch files in the system temp directory.
    pub fn system() -> Self {
        Self { dir: None }
    }

    /// Scratch files in `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    /// Create an empty scratch file.
    pub fn create(&self, prefix: &str, suffix: &str) -> io::Result<NamedTempFile> {
        let mut builder = Builder::new();
        builder.prefix(prefix).suffix(suffix);
        match &self.dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
    }

    /// Create a scratch file holding `data`.
    pub async fn write(&self, prefix: &str, suffix: &str, data: &[u8]) -> io::Result<NamedTempFile> {
        let file = self.create(prefix, suffix)?;
        tokio::fs::write(file.path(), data).await?;
        Ok(file)
    }
}
