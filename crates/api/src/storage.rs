//! Local disk store for uploaded files.
//!
//! Files live under a single root directory and are addressed by paths
//! relative to it (`checklist/12_departure_photo1_<uuid>.jpg`). The same
//! relative path is stored in the database and served back under
//! `/uploads/<relative path>`.

use std::path::{Component, Path, PathBuf};

/// Writes and removes uploaded files below `root`.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the root and the given sub-directories if missing.
    pub async fn ensure_dirs(&self, subdirs: &[&str]) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        for dir in subdirs {
            tokio::fs::create_dir_all(self.root.join(dir)).await?;
        }
        Ok(())
    }

    /// Absolute location of a relative path. Rejects absolute paths and any
    /// `..` component.
    pub fn resolve(&self, relative: &str) -> std::io::Result<PathBuf> {
        let rel = Path::new(relative);
        let safe = rel
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if relative.is_empty() || !safe {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Invalid upload path '{relative}'"),
            ));
        }
        Ok(self.root.join(rel))
    }

    /// Write `data` to `relative`, creating parent directories.
    pub async fn save(&self, relative: &str, data: &[u8]) -> std::io::Result<PathBuf> {
        let dest = self.resolve(relative)?;
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&dest, data).await?;
        tracing::debug!(path = %dest.display(), bytes = data.len(), "Stored upload");
        Ok(dest)
    }

    /// Best-effort removal of previously saved files. Missing files are
    /// ignored; other failures are logged.
    pub async fn remove_all(&self, relatives: &[String]) {
        for relative in relatives {
            let Ok(path) = self.resolve(relative) else {
                continue;
            };
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to remove upload");
                }
            }
        }
    }
}
