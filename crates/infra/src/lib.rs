//! `superheroes-infra` — persistence for heroes, powers and hero/power links.

pub mod seed;
pub mod store;

pub use store::{InMemorySuperheroStore, SqliteSuperheroStore, StoreError, SuperheroStore};
