//! crates/reader_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the concrete storage behind the catalog, the text files,
//! the users and the reading progress.

use async_trait::async_trait;
use crate::domain::{Book, BookContent, BookId, NewUser, ProgressRecord, User, UserCredentials, UserId};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external storage (files, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Storage error: {0}")]
    Storage(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait BookCatalog: Send + Sync {
    /// Every book in catalog order.
    async fn list_books(&self) -> PortResult<Vec<Book>>;

    /// Metadata for a single book, or `NotFound`.
    async fn get_book(&self, id: BookId) -> PortResult<Book>;
}

#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// A short label used in logs when providers are chained.
    fn name(&self) -> &str;

    /// Loads the raw text referenced by `book.file`, or `NotFound`.
    async fn load_content(&self, book: &Book) -> PortResult<BookContent>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Stores a new user. Fails with `Conflict` when the email or the username is taken.
    async fn create_user(&self, new_user: NewUser) -> PortResult<User>;

    /// Finds a user whose email or username equals `login`.
    async fn find_by_login(&self, login: &str) -> PortResult<UserCredentials>;

    /// Stamps `last_login` with the current time and returns the updated user.
    async fn record_login(&self, user_id: UserId) -> PortResult<User>;
}

#[async_trait]
pub trait ProgressRepository: Send + Sync {
    /// Inserts or replaces the record for `(user_id, book_id)`.
    async fn upsert_progress(&self, record: ProgressRecord) -> PortResult<ProgressRecord>;

    async fn progress_for_user(&self, user_id: UserId) -> PortResult<Vec<ProgressRecord>>;

    async fn progress_for_book(
        &self,
        user_id: UserId,
        book_id: BookId,
    ) -> PortResult<Option<ProgressRecord>>;
}
