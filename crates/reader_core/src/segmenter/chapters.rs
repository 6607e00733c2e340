//! Line-by-line chapter detection.

use super::classifier::HeadingClassifier;
use std::ops::Range;

/// Title of the single chapter produced when no heading is found.
pub const FULL_TEXT_TITLE: &str = "Full text";
/// Title of the chapter holding text that precedes the first heading.
pub const PREFACE_TITLE: &str = "Preface";

#[derive(Debug, Clone, PartialEq)]
pub struct Chapter {
    pub number: usize,
    pub title: String,
    /// Body lines joined with `\n`, heading excluded.
    pub content: String,
    /// Zero-based line number of the heading (or of the first body line for
    /// untitled chapters).
    pub start_line: usize,
    /// Whether the chapter was opened by a heading line.
    pub has_heading: bool,
    pub source: Range<usize>,
}

struct OpenChapter<'a> {
    title: String,
    start_line: usize,
    has_heading: bool,
    lines: Vec<&'a str>,
    source: Range<usize>,
}

impl OpenChapter<'_> {
    fn close(self, number: usize) -> Chapter {
        Chapter {
            number,
            title: self.title,
            content: self.lines.join("\n"),
            start_line: self.start_line,
            has_heading: self.has_heading,
            source: self.source,
        }
    }

    fn is_blank(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }
}

/// Splits `text` into chapters at every line the classifier accepts.
///
/// Always returns at least one chapter. Text before the first heading becomes
/// a [`PREFACE_TITLE`] chapter unless it is blank; text without any heading
/// becomes one [`FULL_TEXT_TITLE`] chapter.
pub fn split_chapters(text: &str, classifier: &dyn HeadingClassifier) -> Vec<Chapter> {
    let mut chapters: Vec<Chapter> = Vec::new();
    let mut open: Option<OpenChapter<'_>> = None;
    let mut saw_heading = false;
    let mut offset = 0;

    for (line_no, line) in text.split('\n').enumerate() {
        let span = offset..offset + line.len();
        offset = span.end + 1;

        if classifier.is_chapter_heading(line) {
            saw_heading = true;
            if let Some(previous) = open.take() {
                push_closed(&mut chapters, previous);
            }
            open = Some(OpenChapter {
                title: line.trim().to_string(),
                start_line: line_no,
                has_heading: true,
                lines: Vec::new(),
                source: span,
            });
            continue;
        }

        match open.as_mut() {
            Some(chapter) => {
                chapter.lines.push(line);
                chapter.source.end = span.end;
            }
            None => {
                open = Some(OpenChapter {
                    title: PREFACE_TITLE.to_string(),
                    start_line: line_no,
                    has_heading: false,
                    lines: vec![line],
                    source: span,
                });
            }
        }
    }

    if !saw_heading {
        return vec![Chapter {
            number: 1,
            title: FULL_TEXT_TITLE.to_string(),
            content: text.to_string(),
            start_line: 0,
            has_heading: false,
            source: 0..text.len(),
        }];
    }

    if let Some(last) = open.take() {
        push_closed(&mut chapters, last);
    }
    chapters
}

fn push_closed(chapters: &mut Vec<Chapter>, chapter: OpenChapter<'_>) {
    // A whitespace-only preamble is not worth a chapter of its own.
    if !chapter.has_heading && chapter.is_blank() {
        return;
    }
    let number = chapters.len() + 1;
    chapters.push(chapter.close(number));
}
