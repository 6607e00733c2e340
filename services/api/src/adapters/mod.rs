pub mod catalog;
pub mod content;
pub mod json_file;
pub mod progress;
pub mod users;

pub use catalog::JsonCatalog;
pub use content::FsContentProvider;
pub use progress::JsonProgressStore;
pub use users::JsonUserStore;
