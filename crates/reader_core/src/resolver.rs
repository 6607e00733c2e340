//! crates/reader_core/src/resolver.rs
//!
//! Ordered fallback chains over the catalog and content ports. Providers are
//! tried in the order given and the first success wins; every failure is
//! logged and, when all providers fail, the last error is returned.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use crate::domain::{Book, BookContent, BookId};
use crate::ports::{BookCatalog, ContentProvider, PortError, PortResult};

/// Tries each catalog in turn.
pub struct FallbackCatalog {
    catalogs: Vec<Arc<dyn BookCatalog>>,
}

impl FallbackCatalog {
    pub fn new(catalogs: Vec<Arc<dyn BookCatalog>>) -> Self {
        Self { catalogs }
    }
}

#[async_trait]
impl BookCatalog for FallbackCatalog {
    async fn list_books(&self) -> PortResult<Vec<Book>> {
        let mut last_error = None;
        for (position, catalog) in self.catalogs.iter().enumerate() {
            match catalog.list_books().await {
                Ok(books) => return Ok(books),
                Err(e) => {
                    warn!(position, error = %e, "Catalog unavailable, trying next");
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| PortError::NotFound("No catalog configured".to_string())))
    }

    async fn get_book(&self, id: BookId) -> PortResult<Book> {
        let mut last_error = None;
        for (position, catalog) in self.catalogs.iter().enumerate() {
            match catalog.get_book(id).await {
                Ok(book) => return Ok(book),
                Err(e) => {
                    warn!(position, book_id = id, error = %e, "Catalog lookup failed, trying next");
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| PortError::NotFound(format!("Book {} not found", id))))
    }
}

/// Tries each content provider in turn.
pub struct FallbackContent {
    providers: Vec<Arc<dyn ContentProvider>>,
}

impl FallbackContent {
    pub fn new(providers: Vec<Arc<dyn ContentProvider>>) -> Self {
        Self { providers }
    }
}

#[async_trait]
impl ContentProvider for FallbackContent {
    fn name(&self) -> &str {
        "fallback"
    }

    async fn load_content(&self, book: &Book) -> PortResult<BookContent> {
        let mut last_error = None;
        for provider in &self.providers {
            match provider.load_content(book).await {
                Ok(content) => return Ok(content),
                Err(e) => {
                    warn!(
                        provider = provider.name(),
                        book_id = book.id,
                        error = %e,
                        "Content provider failed, trying next"
                    );
                    last_error = Some(e);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| {
            PortError::NotFound(format!("No content for book {}", book.id))
        }))
    }
}
