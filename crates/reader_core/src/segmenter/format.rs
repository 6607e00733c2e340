//! Turns the text of a unit into paragraph and heading blocks.

use super::classifier::HeadingClassifier;
use regex::Regex;
use std::sync::LazyLock;

static PARAGRAPH_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n").expect("paragraph break pattern is valid"));

static LINE_WRAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]*\n[ \t]*").expect("line wrap pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading(String),
    Paragraph(String),
}

impl Block {
    pub fn text(&self) -> &str {
        match self {
            Block::Heading(text) | Block::Paragraph(text) => text,
        }
    }
}

/// Splits `content` on blank lines and joins hard-wrapped lines inside each
/// paragraph with a single space. Empty paragraphs are dropped.
pub fn format_content(content: &str, classifier: &dyn HeadingClassifier) -> Vec<Block> {
    PARAGRAPH_BREAK
        .split(content)
        .filter_map(|raw| {
            let cleaned = LINE_WRAP.replace_all(raw.trim(), " ");
            if cleaned.is_empty() {
                return None;
            }
            let cleaned = cleaned.into_owned();
            Some(if classifier.is_section_heading(&cleaned) {
                Block::Heading(cleaned)
            } else {
                Block::Paragraph(cleaned)
            })
        })
        .collect()
}

/// Renders blocks as `<h3>`/`<p>` elements.
pub fn render_html(blocks: &[Block]) -> String {
    let mut html = String::new();
    for block in blocks {
        let (open, close) = match block {
            Block::Heading(_) => ("<h3>", "</h3>"),
            Block::Paragraph(_) => ("<p>", "</p>"),
        };
        html.push_str(open);
        html.push_str(&escape_html(block.text()));
        html.push_str(close);
    }
    html
}

/// Escapes the characters that are significant in HTML text and attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
