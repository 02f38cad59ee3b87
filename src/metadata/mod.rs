//! Form layout and menu metadata for the admin UI

pub mod layout;
pub mod repository;

pub use layout::{Field, FileDetails};
pub use repository::LayoutRepository;
