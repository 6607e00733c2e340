//! crates/reader_core/src/segmenter/mod.rs
//!
//! The Text Segmenter: converts a book's raw text into an ordered sequence of
//! display units, either chapters found by heading detection or pages of a
//! fixed character budget. Segmentation never fails; degenerate input
//! degrades to a single unit.

pub mod chapters;
pub mod classifier;
pub mod format;
pub mod pages;

use crate::domain::{DisplayUnit, UnitKind};
use std::sync::Arc;

pub use chapters::{split_chapters, Chapter, FULL_TEXT_TITLE, PREFACE_TITLE};
pub use classifier::{CyrillicLatinClassifier, HeadingClassifier, KeywordOnlyClassifier};
pub use format::{escape_html, format_content, render_html, Block};
pub use pages::{paginate, Page, DEFAULT_CHARS_PER_PAGE};

/// Which strategy to segment with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SegmentMode {
    #[default]
    Chapters,
    Pages { chars_per_page: usize },
}

/// Runs either strategy with a shared heading classifier.
#[derive(Clone)]
pub struct Segmenter {
    classifier: Arc<dyn HeadingClassifier>,
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(Arc::new(CyrillicLatinClassifier))
    }
}

impl Segmenter {
    pub fn new(classifier: Arc<dyn HeadingClassifier>) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &dyn HeadingClassifier {
        self.classifier.as_ref()
    }

    pub fn chapters(&self, text: &str) -> Vec<DisplayUnit> {
        split_chapters(text, self.classifier())
            .into_iter()
            .map(|chapter| DisplayUnit {
                kind: UnitKind::Chapter,
                index: chapter.number,
                title: Some(chapter.title),
                content: chapter.content,
                source: chapter.source,
            })
            .collect()
    }

    /// Pages of `text`. Blank text yields a single empty page so callers
    /// always have a unit to show.
    pub fn pages(&self, text: &str, chars_per_page: usize) -> Vec<DisplayUnit> {
        let units: Vec<DisplayUnit> = paginate(text, chars_per_page)
            .into_iter()
            .map(|page| DisplayUnit {
                kind: UnitKind::Page,
                index: page.number,
                title: None,
                content: page.content,
                source: page.source,
            })
            .collect();

        if units.is_empty() {
            return vec![DisplayUnit {
                kind: UnitKind::Page,
                index: 1,
                title: None,
                content: String::new(),
                source: 0..text.len(),
            }];
        }
        units
    }

    pub fn segment(&self, text: &str, mode: SegmentMode) -> Vec<DisplayUnit> {
        match mode {
            SegmentMode::Chapters => self.chapters(text),
            SegmentMode::Pages { chars_per_page } => self.pages(text, chars_per_page),
        }
    }

    /// Paragraph and heading blocks for one unit's content.
    pub fn format(&self, unit: &DisplayUnit) -> Vec<Block> {
        format_content(&unit.content, self.classifier())
    }
}
