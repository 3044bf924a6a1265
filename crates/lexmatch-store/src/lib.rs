//! Advocate repository: DuckDB document store, in-memory pool, and the
//! soft-failing facade the matcher reads through.

mod error;
pub use error::StoreError;

mod memory;
mod pattern;
mod repository;

pub use memory::MemoryStore;
pub use pattern::NamePattern;
pub use repository::{AdvocateRepository, AdvocateStore};

#[cfg(feature = "duckdb")]
mod duck;
#[cfg(feature = "duckdb")]
pub use duck::DuckStore;
