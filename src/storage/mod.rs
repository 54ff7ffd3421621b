pub mod local;
pub mod memory;

pub use local::LocalFileStore;
pub use memory::InMemoryFileStore;

use async_trait::async_trait;

use crate::error::{AppError, AppResult};

/// Access tier of a stored file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Readable by anyone who knows the path
    Public,
    Private,
}

/// Durable blob storage addressed by relative paths
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Write `bytes` to `<directory>/<filename>`, replacing any existing file,
    /// and return that relative path.
    async fn store_file(
        &self,
        bytes: &[u8],
        directory: &str,
        filename: &str,
        visibility: Visibility,
    ) -> AppResult<String>;

    /// Remove a previously stored file. Missing files are not an error.
    async fn delete_file(&self, path: &str, visibility: Visibility) -> AppResult<()>;
}

/// Join `directory` and `filename` into a relative `/`-separated path,
/// rejecting anything that could escape the storage root.
pub fn relative_path(directory: &str, filename: &str) -> AppResult<String> {
    let directory = directory.trim_matches('/');
    check_segment("directory", directory)?;
    check_segment("filename", filename)?;

    if filename.contains(['/', '\\']) {
        return Err(AppError::Upload(format!(
            "filename {:?} must not contain path separators",
            filename
        )));
    }

    Ok(format!("{}/{}", directory, filename))
}

fn check_segment(kind: &str, value: &str) -> AppResult<()> {
    let escapes = value.starts_with('/')
        || value.starts_with('\\')
        || value
            .split(['/', '\\'])
            .any(|part| part.is_empty() || part == "..");

    if escapes {
        return Err(AppError::Upload(format!(
            "invalid {} {:?}",
            kind, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path() {
        assert_eq!(
            relative_path("projects", "1700000000_cover.png").unwrap(),
            "projects/1700000000_cover.png"
        );
        assert_eq!(
            relative_path("/projects/", "a.png").unwrap(),
            "projects/a.png"
        );
        assert_eq!(
            relative_path("projects/2024", "a.png").unwrap(),
            "projects/2024/a.png"
        );
    }

    #[test]
    fn test_relative_path_rejects_escapes() {
        assert!(relative_path("", "a.png").is_err());
        assert!(relative_path("../etc", "a.png").is_err());
        assert!(relative_path("projects", "..").is_err());
        assert!(relative_path("projects", "").is_err());
        assert!(relative_path("projects", "sub/a.png").is_err());
        assert!(relative_path("projects//x", "a.png").is_err());
    }
}
