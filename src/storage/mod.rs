//! Storage backends implementing `DataStore`

pub mod in_memory;

pub use in_memory::InMemoryStore;
