use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::storage::{relative_path, FileStore, Visibility};

/// In-memory file store for unit testing
#[derive(Clone, Default)]
pub struct InMemoryFileStore {
    files: Arc<Mutex<HashMap<(Visibility, String), Vec<u8>>>>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `store_file` fail, as a full disk would
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn get(&self, path: &str, visibility: Visibility) -> Option<Vec<u8>> {
        let files = self.files.lock().await;
        files.get(&(visibility, path.to_string())).cloned()
    }

    pub async fn len(&self) -> usize {
        self.files.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl FileStore for InMemoryFileStore {
    async fn store_file(
        &self,
        bytes: &[u8],
        directory: &str,
        filename: &str,
        visibility: Visibility,
    ) -> AppResult<String> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Upload("simulated write failure".to_string()));
        }

        let path = relative_path(directory, filename)?;
        let mut files = self.files.lock().await;
        files.insert((visibility, path.clone()), bytes.to_vec());
        Ok(path)
    }

    async fn delete_file(&self, path: &str, visibility: Visibility) -> AppResult<()> {
        let mut files = self.files.lock().await;
        files.remove(&(visibility, path.to_string()));
        Ok(())
    }
}
