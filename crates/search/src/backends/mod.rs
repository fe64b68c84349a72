//! Repository implementations.
//!
//! - [`memory`] - In-process maps, always available
//! - [`sqlite`] - SQLite over r2d2 (feature `sqlite`)

pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::MemoryRepository;
