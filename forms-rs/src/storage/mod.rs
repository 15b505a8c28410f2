//! Persistence for form definitions
//!
//! - [`options`]: named JSON documents (SQLite or in-memory)
//! - [`repository`]: the form collection stored under one option key

pub mod options;
pub mod repository;

pub use options::{MemoryOptionStore, OptionStore, SqliteOptionStore};
pub use repository::{FormRepository, OptionFormRepository};
