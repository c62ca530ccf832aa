//! Relational storage boundary.
//!
//! `SuperheroStore` is the only thing request handlers see; the backing engine
//! (in-memory tables or SQLite) is chosen at startup.

pub mod in_memory;
pub mod sqlite;
pub mod r#trait;

pub use in_memory::InMemorySuperheroStore;
pub use r#trait::{StoreError, SuperheroStore};
pub use sqlite::SqliteSuperheroStore;
