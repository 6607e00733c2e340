pub mod catalog;
pub mod domain;
pub mod ports;
pub mod resolver;
pub mod segmenter;
pub mod session;
pub mod validation;

pub use domain::{
    Book, BookContent, BookId, DisplayUnit, NewUser, ProgressRecord, UnitKind, User,
    UserCredentials, UserId,
};
pub use ports::{
    BookCatalog, ContentProvider, PortError, PortResult, ProgressRepository, UserRepository,
};
pub use resolver::{FallbackCatalog, FallbackContent};
pub use segmenter::{HeadingClassifier, SegmentMode, Segmenter};
pub use session::{Direction, ReaderSettings, ReadingSession, Theme};
