use crate::error::MediaError;
use crate::media::path::LogicalPath;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tracing::{debug, error, warn};

/// Read-only view over the directory tree that holds media files
#[derive(Debug, Clone)]
pub struct ContentStore {
    root: PathBuf,
}

/// An opened file inside the store
#[derive(Debug)]
pub struct ResolvedFile {
    pub path: PathBuf,
    pub file: File,
    pub size: u64,
}

impl ContentStore {
    /// Open the store at an existing `root` directory.
    ///
    /// The tree is owned by the ingestion side, so a missing root is an error.
    pub fn open(root: impl AsRef<Path>) -> std::io::Result<Self> {
        let root = std::fs::canonicalize(root.as_ref())?;
        if !root.is_dir() {
            return Err(std::io::Error::new(
                ErrorKind::NotADirectory,
                format!("content root {} is not a directory", root.display()),
            ));
        }

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    /// Resolve `path` under the root and open it.
    ///
    /// Symlinks are followed, but the final target must stay under the root.
    pub async fn resolve(&self, path: &LogicalPath) -> Result<ResolvedFile, MediaError> {
        let candidate = self.root.join(path.to_relative());

        let canonical = match tokio::fs::canonicalize(&candidate).await {
            Ok(canonical) => canonical,
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!(path = %path.as_str(), "Media file not found");
                return Err(MediaError::NotFound);
            }
            Err(error) => {
                warn!(path = %path.as_str(), ?error, "Failed to resolve media file");
                return Err(MediaError::NotFound);
            }
        };

        if !canonical.starts_with(&self.root) {
            warn!(path = %path.as_str(), "Media path resolves outside the content root");
            return Err(MediaError::Forbidden);
        }

        let file = File::open(&canonical).await.map_err(|error| {
            if error.kind() == ErrorKind::NotFound {
                MediaError::NotFound
            } else {
                error!(path = %path.as_str(), ?error, "Failed to open media file");
                MediaError::Internal
            }
        })?;

        let metadata = file.metadata().await.map_err(|error| {
            error!(path = %path.as_str(), ?error, "Failed to stat media file");
            MediaError::Internal
        })?;

        if !metadata.is_file() {
            debug!(path = %path.as_str(), "Media path is not a regular file");
            return Err(MediaError::NotFound);
        }

        Ok(ResolvedFile {
            path: canonical,
            file,
            size: metadata.len(),
        })
    }
}
