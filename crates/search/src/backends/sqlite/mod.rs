//! SQLite repository.
//!
//! All collections share one `records` table holding JSON text. Predicates
//! are translated to SQL over `json_extract`, relations become `LEFT JOIN`s
//! against the same table, and substring matching uses the `fold_text` and
//! `fold_case` functions registered on every pooled connection.
//!
//! # Example
//!
//! ```
//! use civica_search::backends::sqlite::SqliteRepository;
//!
//! let repo = SqliteRepository::in_memory().unwrap();
//! repo.init_schema().unwrap();
//! repo.insert("churches", serde_json::json!({"id": "c1", "name": "Central"})).unwrap();
//! assert_eq!(repo.count("churches").unwrap(), 1);
//! ```

mod backend;
mod query_builder;
mod repository;
mod schema;

pub use backend::{SqliteRepository, SqliteRepositoryConfig};
pub use query_builder::{QueryBuilder, SqlFragment, SqlParam};
pub use schema::SCHEMA_VERSION;
