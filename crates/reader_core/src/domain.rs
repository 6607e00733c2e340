//! crates/reader_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any storage or serialization format.

use chrono::{DateTime, Utc};
use std::ops::Range;

pub type BookId = i64;
pub type UserId = i64;

/// A catalog entry. The `chapters` count is whatever the catalog declares and
/// is not derived from the text.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year: Option<i32>,
    pub description: Option<String>,
    pub file: String,
    pub chapters: Option<u32>,
}

/// The raw text of a book, read fresh for every request.
#[derive(Debug, Clone, PartialEq)]
pub struct BookContent {
    pub book_id: BookId,
    pub text: String,
}

impl BookContent {
    /// Wraps raw file text, normalising `\r\n` line endings and dropping a
    /// leading byte-order mark so unit offsets index the stored text directly.
    pub fn new(book_id: BookId, raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let raw = raw.strip_prefix('\u{feff}').unwrap_or(&raw);
        let text = if raw.contains('\r') {
            raw.replace("\r\n", "\n").replace('\r', "\n")
        } else {
            raw.to_string()
        };
        Self { book_id, text }
    }

    /// Length in characters, as shown to readers.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Whether a unit came from chapter detection or from fixed-size pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Chapter,
    Page,
}

/// One renderable segment of a book: a chapter or a page.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayUnit {
    pub kind: UnitKind,
    /// 1-based and contiguous across a segmentation result.
    pub index: usize,
    /// Only chapters carry a title.
    pub title: Option<String>,
    pub content: String,
    /// Byte range into the segmented text.
    pub source: Range<usize>,
}

// Represents a user as exposed to clients
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub join_date: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

// Only used internally for login/signup - contains the stored password
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password: String,
}

/// Registration input after validation.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Where a user stopped in a book. One record per (user, book).
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressRecord {
    pub user_id: UserId,
    pub book_id: BookId,
    pub unit_index: usize,
    pub progress_fraction: f64,
    pub timestamp: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
