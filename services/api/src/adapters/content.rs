//! services/api/src/adapters/content.rs
//!
//! The `ContentProvider` port backed by plain-text files in a directory.

use async_trait::async_trait;
use reader_core::domain::{Book, BookContent};
use reader_core::ports::{ContentProvider, PortError, PortResult};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, error};

/// Catalog entries reference their text as `content/<name>`.
const CONTENT_PREFIX: &str = "content/";

#[derive(Debug, Clone)]
pub struct FsContentProvider {
    name: String,
    content_dir: PathBuf,
}

impl FsContentProvider {
    pub fn new(name: impl Into<String>, content_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            content_dir: content_dir.into(),
        }
    }

    /// Maps a catalog `file` reference to a path inside the content directory.
    /// Returns `None` for references that would escape it.
    fn resolve(&self, file: &str) -> Option<PathBuf> {
        let relative = file.strip_prefix(CONTENT_PREFIX).unwrap_or(file);
        let path = Path::new(relative);
        let contained = path
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        if relative.is_empty() || !contained {
            return None;
        }
        Some(self.content_dir.join(path))
    }
}

#[async_trait]
impl ContentProvider for FsContentProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load_content(&self, book: &Book) -> PortResult<BookContent> {
        let not_found = || {
            PortError::NotFound(format!("Content file for book {} not found", book.id))
        };
        let path = self.resolve(&book.file).ok_or_else(not_found)?;
        debug!("[{}] Loading book {} from {}", self.name, book.id, path.display());

        match tokio::fs::read_to_string(&path).await {
            Ok(raw) => Ok(BookContent::new(book.id, raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(not_found()),
            Err(e) => {
                error!("[{}] Failed to read {}: {}", self.name, path.display(), e);
                Err(PortError::Storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn book(file: &str) -> Book {
        Book {
            id: 7,
            title: "Шинель".to_string(),
            author: "Николай Гоголь".to_string(),
            genre: "Повесть".to_string(),
            year: Some(1842),
            description: None,
            file: file.to_string(),
            chapters: None,
        }
    }

    #[tokio::test]
    async fn loads_and_normalises_text() {
        let dir = TempDir::new().unwrap();
        tokio::fs::write(dir.path().join("overcoat.txt"), "\u{feff}Глава 1\r\nТекст.")
            .await
            .unwrap();
        let provider = FsContentProvider::new("primary", dir.path());

        let content = provider
            .load_content(&book("content/overcoat.txt"))
            .await
            .unwrap();
        assert_eq!(content.book_id, 7);
        assert_eq!(content.text, "Глава 1\nТекст.");

        // References without the prefix resolve too.
        assert!(provider.load_content(&book("overcoat.txt")).await.is_ok());
    }

    #[tokio::test]
    async fn missing_files_are_not_found() {
        let dir = TempDir::new().unwrap();
        let provider = FsContentProvider::new("primary", dir.path());
        assert!(matches!(
            provider.load_content(&book("content/absent.txt")).await,
            Err(PortError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn references_cannot_escape_the_directory() {
        let dir = TempDir::new().unwrap();
        let inner = dir.path().join("content");
        tokio::fs::create_dir(&inner).await.unwrap();
        tokio::fs::write(dir.path().join("secret.txt"), "hidden").await.unwrap();
        let provider = FsContentProvider::new("primary", &inner);

        for file in ["content/../secret.txt", "../secret.txt", "/etc/passwd", "", "content/"] {
            assert!(
                matches!(
                    provider.load_content(&book(file)).await,
                    Err(PortError::NotFound(_))
                ),
                "{file} should not resolve"
            );
        }
    }
}
