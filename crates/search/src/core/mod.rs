//! Storage collaborator traits.
//!
//! The engine owns no persistence. It consumes a [`Repository`], which
//! evaluates [`FilterPredicate`](crate::types::FilterPredicate) trees against
//! named collections of JSON records.
//!
//! Two implementations ship with the crate:
//!
//! - [`MemoryRepository`](crate::backends::memory::MemoryRepository) - in-process, always available
//! - `SqliteRepository` - SQLite via `r2d2`, behind the `sqlite` feature

mod repository;

pub use repository::{Repository, RepositoryExt};
