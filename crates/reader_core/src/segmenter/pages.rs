//! Fixed-budget pagination that prefers natural break points.

use regex::Regex;
use std::iter;
use std::ops::Range;
use std::sync::LazyLock;

pub const DEFAULT_CHARS_PER_PAGE: usize = 2000;

/// How far past the budget a paragraph break may pull the cut.
const PARAGRAPH_SLACK: usize = 500;
/// How far past the budget a sentence end may pull the cut.
const SENTENCE_SLACK: usize = 200;

static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[.!?…]\s+\p{Lu}").expect("sentence boundary pattern is valid")
});

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub number: usize,
    /// Trimmed page text.
    pub content: String,
    /// Byte range of `content` inside the paginated text.
    pub source: Range<usize>,
}

/// Cuts `text` into pages of roughly `chars_per_page` characters.
///
/// Each cut is moved forward to a paragraph break or sentence end when one
/// is close, otherwise back to the last whitespace before the budget. Pages
/// are trimmed and blank ones are dropped, so a blank input yields no pages.
pub fn paginate(text: &str, chars_per_page: usize) -> Vec<Page> {
    let budget = chars_per_page.max(1);
    // bounds[i] is the byte offset of char i; the last entry is text.len().
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(iter::once(text.len()))
        .collect();
    let total = bounds.len() - 1;

    let mut pages = Vec::new();
    let mut cursor = 0;
    while cursor < total {
        let end = if total - cursor <= budget {
            total
        } else {
            find_cut(text, &bounds, cursor, budget)
        };
        push_page(&mut pages, text, bounds[cursor]..bounds[end]);
        cursor = end;
    }
    pages
}

/// Returns the char index where the page starting at `cursor` ends.
/// Always greater than `cursor`.
fn find_cut(text: &str, bounds: &[usize], cursor: usize, budget: usize) -> usize {
    let total = bounds.len() - 1;
    let byte_at = |char_index: usize| bounds[char_index.min(total)];
    let naive = cursor + budget;
    let naive_byte = byte_at(naive);

    let paragraph_window = &text[naive_byte..byte_at(cursor + budget + PARAGRAPH_SLACK)];
    if let Some(pos) = paragraph_window.find("\n\n") {
        return char_index_of(bounds, naive_byte + pos);
    }

    let sentence_window = &text[naive_byte..byte_at(cursor + budget + SENTENCE_SLACK)];
    if let Some(found) = SENTENCE_END.find(sentence_window) {
        let punct_len = sentence_window[found.start()..]
            .chars()
            .next()
            .map_or(1, char::len_utf8);
        return char_index_of(bounds, naive_byte + found.start() + punct_len);
    }

    let before = &text[byte_at(cursor)..naive_byte];
    if let Some(pos) = before.rfind(char::is_whitespace) {
        let cut = char_index_of(bounds, byte_at(cursor) + pos);
        if cut > cursor {
            return cut;
        }
    }

    naive
}

fn char_index_of(bounds: &[usize], byte: usize) -> usize {
    bounds.binary_search(&byte).unwrap_or_else(|i| i)
}

fn push_page(pages: &mut Vec<Page>, text: &str, span: Range<usize>) {
    let slice = &text[span.clone()];
    let trimmed = slice.trim();
    if trimmed.is_empty() {
        return;
    }
    let start = span.start + (slice.len() - slice.trim_start().len());
    pages.push(Page {
        number: pages.len() + 1,
        content: trimmed.to_string(),
        source: start..start + trimmed.len(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn squash(text: &str) -> String {
        text.chars().filter(|c| !c.is_whitespace()).collect()
    }

    #[test]
    fn five_thousand_chars_make_three_pages() {
        let text = "word ".repeat(1000);
        assert_eq!(text.chars().count(), 5000);

        let pages = paginate(&text, 2000);
        assert_eq!(pages.len(), 3);
        for (i, page) in pages.iter().enumerate() {
            assert_eq!(page.number, i + 1);
            assert!(!page.content.is_empty());
            assert!(page.content.chars().count() <= 2000);
        }
    }

    #[test]
    fn short_text_is_a_single_page() {
        let pages = paginate("  Short story.  ", DEFAULT_CHARS_PER_PAGE);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].content, "Short story.");
        assert_eq!(pages[0].source, 2..14);
    }

    #[test]
    fn blank_text_has_no_pages() {
        assert!(paginate("", 10).is_empty());
        assert!(paginate(" \n\n \n", 2).is_empty());
    }

    #[test]
    fn cut_moves_forward_to_paragraph_break() {
        let text = format!("{}\n\n{}", "a ".repeat(1050), "b ".repeat(500));
        let pages = paginate(&text, 2000);
        assert_eq!(pages.len(), 2);
        assert!(pages[0].content.ends_with('a'));
        assert!(pages[1].content.starts_with('b'));
        assert!(pages[0].content.chars().count() > 2000);
    }

    #[test]
    fn cut_moves_forward_to_sentence_end() {
        let text = format!(
            "{}end. Next sentence starts here {}",
            "ab ".repeat(670),
            "cd ".repeat(400)
        );
        let pages = paginate(&text, 2000);
        assert!(pages[0].content.ends_with("end."));
        assert!(pages[1].content.starts_with("Next sentence"));
    }

    #[test]
    fn cut_falls_back_to_previous_space() {
        let text = "word ".repeat(500);
        let pages = paginate(&text, 1002);
        assert!(pages.iter().all(|p| !p.content.starts_with("ord")));
        assert!(pages.iter().all(|p| p.content.ends_with("word")));
    }

    #[test]
    fn unbreakable_text_is_hard_cut() {
        let text = "x".repeat(4500);
        let pages = paginate(&text, 2000);
        let sizes: Vec<usize> = pages.iter().map(|p| p.content.len()).collect();
        assert_eq!(sizes, vec![2000, 2000, 500]);
    }

    #[test]
    fn multibyte_text_cuts_on_char_boundaries() {
        let text = "Преступление и наказание. ".repeat(200);
        let pages = paginate(&text, 333);
        assert!(pages.len() > 1);
        for page in &pages {
            assert_eq!(&text[page.source.clone()], page.content);
        }
    }

    #[test]
    fn pages_reconstruct_text_modulo_whitespace() {
        let samples = [
            "Один. Два! Три? Четыре…  Пять.\n\nШесть семь восемь.".repeat(90),
            "lorem ipsum dolor sit amet ".repeat(300),
            "x".repeat(3001),
            format!("{}\n\n\n\n{}", "A. ".repeat(900), "b".repeat(900)),
        ];
        for text in &samples {
            for budget in [1, 7, 150, 2000] {
                let pages = paginate(text, budget);
                let rebuilt: String = pages.iter().map(|p| p.content.as_str()).collect();
                assert_eq!(squash(&rebuilt), squash(text));
                assert!(pages.iter().all(|p| !p.content.is_empty()));
                assert!(pages.windows(2).all(|w| w[0].source.end <= w[1].source.start));
                assert!(pages.iter().enumerate().all(|(i, p)| p.number == i + 1));
            }
        }
    }

    #[test]
    fn zero_budget_is_treated_as_one() {
        let pages = paginate("ab", 0);
        assert_eq!(pages.len(), 2);
    }
}
