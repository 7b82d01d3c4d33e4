//! Writing generated documents into the destination directory.

use std::future::Future;
use std::path::PathBuf;

use thiserror::Error;

/// Writes one named file into a destination shared by all concurrent write
/// invocations. Each invocation creates or overwrites a distinct file, so
/// implementations only need to be safe for concurrent independent-file
/// writes.
pub trait DirectoryWriter: Send + Sync + 'static {
    fn write(
        &self,
        name: &str,
        bytes: &[u8],
    ) -> impl Future<Output = Result<(), WriteError>> + Send;
}

impl<T: DirectoryWriter> DirectoryWriter for std::sync::Arc<T> {
    async fn write(&self, name: &str, bytes: &[u8]) -> Result<(), WriteError> {
        (**self).write(name, bytes).await
    }
}

/// Errors from writing a single file.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The name would resolve outside the destination directory.
    #[error("file name {name:?} would escape the destination directory")]
    InvalidName { name: String },

    #[error("failed to write {name:?}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// [`DirectoryWriter`] backed by a local directory.
#[derive(Debug, Clone)]
pub struct FsDirectoryWriter {
    root: PathBuf,
}

impl FsDirectoryWriter {
    /// Creates a writer rooted at `root`. The directory must already exist.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

impl DirectoryWriter for FsDirectoryWriter {
    async fn write(&self, name: &str, bytes: &[u8]) -> Result<(), WriteError> {
        // Names come from spreadsheet cells; keep them inside the root.
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(WriteError::InvalidName {
                name: name.to_string(),
            });
        }
        let path = self.root.join(name);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| WriteError::Io {
                name: name.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_writes_file_into_root() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FsDirectoryWriter::new(dir.path());

        writer.write("a.pdf", b"content").await.unwrap();

        let written = std::fs::read(dir.path().join("a.pdf")).unwrap();
        assert_eq!(written, b"content");
    }

    #[tokio::test]
    async fn test_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FsDirectoryWriter::new(dir.path());

        writer.write("a.pdf", b"old").await.unwrap();
        writer.write("a.pdf", b"new").await.unwrap();

        let written = std::fs::read(dir.path().join("a.pdf")).unwrap();
        assert_eq!(written, b"new");
    }

    #[tokio::test]
    async fn test_rejects_escaping_names() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FsDirectoryWriter::new(dir.path());

        for name in ["", ".", "..", "a/b.pdf", "a\\b.pdf"] {
            let err = writer.write(name, b"x").await.unwrap_err();
            assert!(
                matches!(err, WriteError::InvalidName { .. }),
                "{name:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_missing_root_reports_io_error() {
        let writer = FsDirectoryWriter::new("/nonexistent-formfill-test-dir");
        let err = writer.write("a.pdf", b"x").await.unwrap_err();
        assert!(matches!(err, WriteError::Io { .. }));
    }
}
