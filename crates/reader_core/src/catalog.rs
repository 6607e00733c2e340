//! Library search and filtering over an in-memory list of books.

use crate::domain::Book;

/// Descriptions longer than this are cut for library cards.
pub const SHORT_DESCRIPTION_CHARS: usize = 120;

/// Case-insensitive substring match on title, author or genre.
/// An empty query matches everything.
pub fn search_books<'a>(books: &'a [Book], query: &str) -> Vec<&'a Book> {
    let needle = query.trim().to_lowercase();
    books
        .iter()
        .filter(|book| needle.is_empty() || matches_query(book, &needle))
        .collect()
}

/// Books whose genre equals `genre`, ignoring case.
pub fn books_by_genre<'a>(books: &'a [Book], genre: &str) -> Vec<&'a Book> {
    let genre = genre.to_lowercase();
    books
        .iter()
        .filter(|book| book.genre.to_lowercase() == genre)
        .collect()
}

/// Distinct genres in catalog order.
pub fn genres(books: &[Book]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for book in books {
        if !seen.contains(&book.genre.as_str()) {
            seen.push(&book.genre);
        }
    }
    seen
}

fn matches_query(book: &Book, needle: &str) -> bool {
    [&book.title, &book.author, &book.genre]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

impl Book {
    /// The description cut to [`SHORT_DESCRIPTION_CHARS`] with an ellipsis.
    pub fn short_description(&self) -> Option<String> {
        let description = self.description.as_deref()?;
        if description.chars().count() <= SHORT_DESCRIPTION_CHARS {
            return Some(description.to_string());
        }
        let cut: String = description.chars().take(SHORT_DESCRIPTION_CHARS).collect();
        Some(format!("{}...", cut))
    }
}
