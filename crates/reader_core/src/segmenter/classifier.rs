//! Heading detection used by chapter splitting and paragraph formatting.
//!
//! Both rules are shape heuristics over a single line or paragraph. They are
//! kept behind [`HeadingClassifier`] so another alphabet or another notion of
//! "heading" can be plugged in without touching the segmentation loops.

use regex::Regex;
use std::sync::LazyLock;

/// Lines and paragraphs at or above this many characters are never headings.
pub const MAX_HEADING_CHARS: usize = 100;

static CHAPTER_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:глава|chapter|часть|part)\s+(?:\d+|[IVXLCDM]+\b)")
        .expect("chapter keyword pattern is valid")
});

/// Decides which lines open a chapter and which paragraphs render as headings.
pub trait HeadingClassifier: Send + Sync {
    /// `line` is a raw line of the book; implementations trim as they see fit.
    fn is_chapter_heading(&self, line: &str) -> bool;

    /// `paragraph` has already been cleaned (single spaces, trimmed).
    fn is_section_heading(&self, paragraph: &str) -> bool;
}

/// The default rules for Russian and English texts.
///
/// A line opens a chapter when it starts with `Глава`, `Chapter`, `Часть` or
/// `Part` (any case) followed by an arabic numeral, suffixes such as `1а`
/// allowed, or a standalone upper-case roman numeral. Short lines with no
/// lower-case Latin letters and at least one upper-case Cyrillic letter also
/// open a chapter. A paragraph is a sub-heading when it is short,
/// has no lower-case Latin or Cyrillic letters and has an upper-case one.
#[derive(Debug, Clone, Copy, Default)]
pub struct CyrillicLatinClassifier;

impl HeadingClassifier for CyrillicLatinClassifier {
    fn is_chapter_heading(&self, line: &str) -> bool {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return false;
        }
        if CHAPTER_KEYWORD.is_match(trimmed) {
            return true;
        }
        is_short(trimmed)
            && !trimmed.chars().any(|c| c.is_ascii_lowercase())
            && trimmed.chars().any(is_upper_cyrillic)
    }

    fn is_section_heading(&self, paragraph: &str) -> bool {
        let trimmed = paragraph.trim();
        !trimmed.is_empty()
            && is_short(trimmed)
            && !trimmed
                .chars()
                .any(|c| c.is_ascii_lowercase() || is_lower_cyrillic(c))
            && trimmed
                .chars()
                .any(|c| c.is_ascii_uppercase() || is_upper_cyrillic(c))
    }
}

/// Only explicit `Chapter N` / `Глава N` style lines open chapters; no
/// paragraph is promoted to a heading.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordOnlyClassifier;

impl HeadingClassifier for KeywordOnlyClassifier {
    fn is_chapter_heading(&self, line: &str) -> bool {
        CHAPTER_KEYWORD.is_match(line.trim())
    }

    fn is_section_heading(&self, _paragraph: &str) -> bool {
        false
    }
}

fn is_short(text: &str) -> bool {
    text.chars().count() < MAX_HEADING_CHARS
}

fn is_upper_cyrillic(c: char) -> bool {
    matches!(c, 'А'..='Я' | 'Ё')
}

fn is_lower_cyrillic(c: char) -> bool {
    matches!(c, 'а'..='я' | 'ё')
}
