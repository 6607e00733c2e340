//! crates/reader_core/src/session.rs
//!
//! Reading Session State: the reader's position inside a segmented book plus
//! the display preferences that go with it. A session is an ordinary value
//! built for one book view; nothing here is global.

use crate::domain::{BookId, DisplayUnit, ProgressRecord, UserId};
use chrono::Utc;

pub const MIN_FONT_SIZE: u8 = 12;
pub const MAX_FONT_SIZE: u8 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Unknown names fall back to the light theme.
    pub fn parse(name: &str) -> Self {
        if name.eq_ignore_ascii_case("dark") {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    Left,
    #[default]
    Justify,
}

/// Typography preferences for the reader pane.
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderSettings {
    pub font_size: u8,
    pub font_family: String,
    pub line_height: f32,
    pub text_align: TextAlign,
    pub margin: String,
    pub theme: Theme,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            font_size: 16,
            font_family: "Arial, sans-serif".to_string(),
            line_height: 1.6,
            text_align: TextAlign::Justify,
            margin: "20px".to_string(),
            theme: Theme::Light,
        }
    }
}

impl ReaderSettings {
    /// Grows or shrinks the font, staying within
    /// [`MIN_FONT_SIZE`]..=[`MAX_FONT_SIZE`].
    pub fn change_font_size(&mut self, delta: i8) -> u8 {
        let next = i16::from(self.font_size) + i16::from(delta);
        self.font_size = next.clamp(i16::from(MIN_FONT_SIZE), i16::from(MAX_FONT_SIZE)) as u8;
        self.font_size
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }
}

/// Navigation direction for [`ReadingSession::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Back,
    Forward,
}

impl Direction {
    /// Maps a signed step (`-1`/`+1`) to a direction; other values yield `None`.
    pub fn from_step(step: i32) -> Option<Self> {
        match step {
            -1 => Some(Direction::Back),
            1 => Some(Direction::Forward),
            _ => None,
        }
    }
}

/// Position of one reader inside one segmented book.
#[derive(Debug, Clone)]
pub struct ReadingSession {
    book_id: BookId,
    units: Vec<DisplayUnit>,
    /// Zero-based position into `units`.
    position: usize,
    pub settings: ReaderSettings,
}

impl ReadingSession {
    /// Starts at the first unit. Returns `None` when there is nothing to read.
    pub fn new(book_id: BookId, units: Vec<DisplayUnit>) -> Option<Self> {
        if units.is_empty() {
            return None;
        }
        Some(Self {
            book_id,
            units,
            position: 0,
            settings: ReaderSettings::default(),
        })
    }

    pub fn book_id(&self) -> BookId {
        self.book_id
    }

    pub fn units(&self) -> &[DisplayUnit] {
        &self.units
    }

    pub fn total_units(&self) -> usize {
        self.units.len()
    }

    /// 1-based index of the unit being read.
    pub fn current_unit_index(&self) -> usize {
        self.position + 1
    }

    pub fn current_unit(&self) -> &DisplayUnit {
        &self.units[self.position]
    }

    /// Moves one unit back or forward. Returns `false` and stays put at either end.
    pub fn advance(&mut self, direction: Direction) -> bool {
        match direction {
            Direction::Back if self.position > 0 => {
                self.position -= 1;
                true
            }
            Direction::Forward if self.position + 1 < self.units.len() => {
                self.position += 1;
                true
            }
            _ => false,
        }
    }

    /// Jumps to a 1-based unit index, clamped into range.
    pub fn jump_to(&mut self, unit_index: usize) {
        self.position = unit_index.clamp(1, self.units.len()) - 1;
    }

    /// `current_unit_index / total_units`, so the last unit reads as 1.0.
    pub fn progress_fraction(&self) -> f64 {
        self.current_unit_index() as f64 / self.total_units() as f64
    }

    /// Continues from a saved record. Indices beyond the current segmentation
    /// (for instance after a page-size change) clamp to the last unit.
    pub fn restore(&mut self, record: &ProgressRecord) {
        if record.book_id == self.book_id {
            self.jump_to(record.unit_index);
        }
    }

    pub fn to_progress_record(&self, user_id: UserId) -> ProgressRecord {
        let now = Utc::now();
        ProgressRecord {
            user_id,
            book_id: self.book_id,
            unit_index: self.current_unit_index(),
            progress_fraction: self.progress_fraction(),
            timestamp: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UnitKind;

    fn units(n: usize) -> Vec<DisplayUnit> {
        (1..=n)
            .map(|index| DisplayUnit {
                kind: UnitKind::Page,
                index,
                title: None,
                content: format!("page {index}"),
                source: 0..0,
            })
            .collect()
    }

    #[test]
    fn empty_unit_list_has_no_session() {
        assert!(ReadingSession::new(1, Vec::new()).is_none());
    }

    #[test]
    fn advance_is_clamped_at_both_ends() {
        let mut session = ReadingSession::new(1, units(3)).unwrap();
        assert!(!session.advance(Direction::Back));
        assert_eq!(session.current_unit_index(), 1);

        assert!(session.advance(Direction::Forward));
        assert!(session.advance(Direction::Forward));
        assert!(!session.advance(Direction::Forward));
        assert_eq!(session.current_unit_index(), 3);
        assert_eq!(session.current_unit().content, "page 3");

        assert!(session.advance(Direction::Back));
        assert_eq!(session.current_unit_index(), 2);
    }

    #[test]
    fn progress_fraction_reaches_one_on_last_unit() {
        let mut session = ReadingSession::new(1, units(4)).unwrap();
        assert_eq!(session.progress_fraction(), 0.25);
        session.jump_to(4);
        assert_eq!(session.progress_fraction(), 1.0);
    }

    #[test]
    fn jump_to_clamps() {
        let mut session = ReadingSession::new(1, units(5)).unwrap();
        session.jump_to(0);
        assert_eq!(session.current_unit_index(), 1);
        session.jump_to(99);
        assert_eq!(session.current_unit_index(), 5);
    }

    #[test]
    fn restore_ignores_records_for_other_books() {
        let mut session = ReadingSession::new(7, units(5)).unwrap();
        let mut record = session.to_progress_record(42);
        record.unit_index = 4;
        session.restore(&record);
        assert_eq!(session.current_unit_index(), 4);

        record.book_id = 8;
        record.unit_index = 2;
        session.restore(&record);
        assert_eq!(session.current_unit_index(), 4);
    }

    #[test]
    fn progress_record_reflects_position() {
        let mut session = ReadingSession::new(3, units(2)).unwrap();
        session.advance(Direction::Forward);
        let record = session.to_progress_record(9);
        assert_eq!(record.user_id, 9);
        assert_eq!(record.book_id, 3);
        assert_eq!(record.unit_index, 2);
        assert_eq!(record.progress_fraction, 1.0);
    }

    #[test]
    fn direction_from_step() {
        assert_eq!(Direction::from_step(-1), Some(Direction::Back));
        assert_eq!(Direction::from_step(1), Some(Direction::Forward));
        assert_eq!(Direction::from_step(2), None);
    }

    #[test]
    fn font_size_is_clamped() {
        let mut settings = ReaderSettings::default();
        assert_eq!(settings.change_font_size(1), 17);
        for _ in 0..20 {
            settings.change_font_size(1);
        }
        assert_eq!(settings.font_size, MAX_FONT_SIZE);
        for _ in 0..20 {
            settings.change_font_size(-1);
        }
        assert_eq!(settings.font_size, MIN_FONT_SIZE);
    }

    #[test]
    fn theme_toggles_and_parses() {
        let mut settings = ReaderSettings::default();
        assert_eq!(settings.toggle_theme(), Theme::Dark);
        assert_eq!(settings.toggle_theme(), Theme::Light);
        assert_eq!(Theme::parse("DARK"), Theme::Dark);
        assert_eq!(Theme::parse("sepia"), Theme::Light);
        assert_eq!(Theme::Dark.as_str(), "dark");
    }
}
