//! services/api/src/adapters/catalog.rs
//!
//! The `BookCatalog` port backed by a JSON array of book entries.

use crate::adapters::json_file::read_required_json_array;
use async_trait::async_trait;
use reader_core::domain::{Book, BookId};
use reader_core::ports::{BookCatalog, PortError, PortResult};
use serde::Deserialize;
use std::path::PathBuf;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// Reads the catalog file on every call; edits to it show up without a restart.
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    catalog_path: PathBuf,
}

impl JsonCatalog {
    pub fn new(catalog_path: impl Into<PathBuf>) -> Self {
        Self {
            catalog_path: catalog_path.into(),
        }
    }

    async fn load(&self) -> PortResult<Vec<Book>> {
        let records: Vec<BookRecord> = read_required_json_array(&self.catalog_path).await?;
        Ok(records.into_iter().map(BookRecord::to_domain).collect())
    }
}

//=========================================================================================
// File Record Structs
//=========================================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BookRecord {
    id: BookId,
    title: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    genre: String,
    #[serde(default)]
    year: Option<i32>,
    #[serde(default)]
    description: Option<String>,
    file: String,
    #[serde(default)]
    chapters: Option<u32>,
}

impl BookRecord {
    fn to_domain(self) -> Book {
        Book {
            id: self.id,
            title: self.title,
            author: self.author,
            genre: self.genre,
            year: self.year,
            description: self.description,
            file: self.file,
            chapters: self.chapters,
        }
    }
}

//=========================================================================================
// `BookCatalog` Trait Implementation
//=========================================================================================

#[async_trait]
impl BookCatalog for JsonCatalog {
    async fn list_books(&self) -> PortResult<Vec<Book>> {
        self.load().await
    }

    async fn get_book(&self, id: BookId) -> PortResult<Book> {
        self.load()
            .await?
            .into_iter()
            .find(|book| book.id == id)
            .ok_or_else(|| PortError::NotFound(format!("Book {} not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CATALOG: &str = r#"[
        {"id": 1, "title": "Мёртвые души", "author": "Николай Гоголь", "genre": "Поэма",
         "year": 1842, "description": "Похождения Чичикова", "file": "content/dead_souls.txt",
         "chapters": 11},
        {"id": 2, "title": "Untitled draft", "file": "content/draft.txt"}
    ]"#;

    async fn catalog(dir: &TempDir) -> JsonCatalog {
        let path = dir.path().join("books.json");
        tokio::fs::write(&path, CATALOG).await.unwrap();
        JsonCatalog::new(path)
    }

    #[tokio::test]
    async fn lists_books_in_file_order() {
        let dir = TempDir::new().unwrap();
        let books = catalog(&dir).await.list_books().await.unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].title, "Мёртвые души");
        assert_eq!(books[0].chapters, Some(11));
        assert_eq!(books[1].author, "");
        assert_eq!(books[1].year, None);
    }

    #[tokio::test]
    async fn get_book_by_id() {
        let dir = TempDir::new().unwrap();
        let catalog = catalog(&dir).await;
        assert_eq!(catalog.get_book(2).await.unwrap().file, "content/draft.txt");
        assert!(matches!(
            catalog.get_book(99).await,
            Err(PortError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn missing_catalog_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        let catalog = JsonCatalog::new(dir.path().join("missing.json"));
        assert!(matches!(
            catalog.list_books().await,
            Err(PortError::Storage(_))
        ));
    }
}
