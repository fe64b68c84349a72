//! Civica Search
//!
//! This crate implements the search-dispatch engine of the Civica
//! record-management backend. Callers name a module (members, churches,
//! tithes, ...), a search type token and a raw term; the engine parses the
//! term, builds a scope-aware predicate and hands it to a storage
//! [`Repository`](core::Repository).
//!
//! # Features
//!
//! - **Typed search types**: every module declares its tokens as an enum
//!   bound to a parse grammar and a target field
//! - **Multi-tenant scoping**: searches are restricted to the caller's
//!   church unless the module is global
//! - **Indirect joins**: criteria on a related collection (e.g. tithes by
//!   member name) resolve in two phases
//! - **Accent-insensitive matching**: names and places match regardless of
//!   diacritics and case
//! - **Pluggable storage**: in-memory and SQLite repositories
//!
//! # Backend Features
//!
//! - `sqlite` (default) - SQLite with in-memory and file modes
//!
//! # Architecture
//!
//! - [`audience`] - Caller context carrying the default scope
//! - [`types`] - Requests, predicates, records and the result envelope
//! - [`error`] - Error types for all operations
//! - [`config`] - Engine configuration
//! - [`core`] - The repository trait
//! - [`search`] - Term parsing, strategies, predicate building and the engine
//! - [`backends`] - Repository implementations
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use civica_search::audience::{Audience, ScopeId};
//! use civica_search::backends::MemoryRepository;
//! use civica_search::search::{Module, SearchEngine};
//! use civica_search::types::SearchRequest;
//! use civica_search::EngineConfig;
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = MemoryRepository::new();
//! repo.insert("people", json!({"id": "p1", "firstNames": "José", "gender": "M"}))?;
//! repo.insert("members", json!({
//!     "id": "m1", "personId": "p1", "churchId": "c1", "isActive": true, "createdAt": 1
//! }))?;
//!
//! let engine = SearchEngine::new(Arc::new(repo), EngineConfig::default());
//! let audience = Audience::scoped(ScopeId::new("c1"));
//!
//! let envelope = engine
//!     .search(Module::Members, &audience, &SearchRequest::new("FirstNames", "jose"))
//!     .await?;
//! assert_eq!(envelope.ids(), vec!["m1"]);
//! # Ok(())
//! # }
//! ```
//!
//! # Errors
//!
//! A search fails with [`SearchError::Rejected`] when the request itself is
//! wrong (unknown module or token, malformed term) and with
//! [`SearchError::NotFound`] when a valid query matched nothing. The
//! not-found message names the criterion and the scope in Spanish.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod audience;
pub mod backends;
pub mod config;
pub mod core;
pub mod error;
pub mod search;
pub mod types;

// Re-export commonly used types at crate root
pub use audience::{Audience, ScopeId};
pub use config::EngineConfig;
pub use error::{InputError, SearchError, SearchResult, StorageError, StorageResult};
pub use types::{FilterPredicate, Record, ResultEnvelope, SearchRequest, SortDirection};

// Re-export core traits
pub use core::{Repository, RepositoryExt};

pub use search::{Module, SearchEngine};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
