use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};
use crate::storage::{relative_path, FileStore, Visibility};

/// Files on local disk, one root directory per visibility tier
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    public_root: PathBuf,
    private_root: PathBuf,
}

impl LocalFileStore {
    pub fn new(public_root: impl Into<PathBuf>, private_root: impl Into<PathBuf>) -> Self {
        Self {
            public_root: public_root.into(),
            private_root: private_root.into(),
        }
    }

    pub fn root(&self, visibility: Visibility) -> &Path {
        match visibility {
            Visibility::Public => &self.public_root,
            Visibility::Private => &self.private_root,
        }
    }

    /// Absolute location of a relative path on disk
    pub fn resolve(&self, path: &str, visibility: Visibility) -> AppResult<PathBuf> {
        let (directory, filename) = path
            .rsplit_once('/')
            .ok_or_else(|| AppError::Upload(format!("invalid path {:?}", path)))?;
        let path = relative_path(directory, filename)?;

        Ok(path
            .split('/')
            .fold(self.root(visibility).to_path_buf(), |acc, part| acc.join(part)))
    }
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn store_file(
        &self,
        bytes: &[u8],
        directory: &str,
        filename: &str,
        visibility: Visibility,
    ) -> AppResult<String> {
        let path = relative_path(directory, filename)?;
        let target = self.resolve(&path, visibility)?;

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Upload(format!("{}: {}", parent.display(), e)))?;
        }

        tokio::fs::write(&target, bytes)
            .await
            .map_err(|e| AppError::Upload(format!("{}: {}", target.display(), e)))?;

        tracing::debug!(path = %path, size = bytes.len(), ?visibility, "Stored file");
        Ok(path)
    }

    async fn delete_file(&self, path: &str, visibility: Visibility) -> AppResult<()> {
        let target = self.resolve(path, visibility)?;

        match tokio::fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Upload(format!("{}: {}", target.display(), e))),
        }
    }
}
