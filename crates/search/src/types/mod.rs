//! Core types for the search-dispatch engine.
//!
//! - [`SearchRequest`], [`SortDirection`] - What the caller asks for
//! - [`FilterPredicate`] - Inspectable predicate tree handed to repositories
//! - [`FindQuery`], [`OrderBy`], [`Relation`] - A complete repository query
//! - [`Record`] - A JSON document returned by a repository
//! - [`ResultEnvelope`] - The formatted response keyed by module
//!
//! # Examples
//!
//! ```
//! use civica_search::types::{FilterPredicate, SearchRequest, SortDirection};
//! use serde_json::json;
//!
//! let request = SearchRequest::new("FullNames", "Maria+Jose-Lopez+Diaz")
//!     .with_limit(20)
//!     .with_order(SortDirection::Descending);
//! assert_eq!(request.offset_or_default(), 0);
//!
//! let predicate = FilterPredicate::equals("churchId", json!("church-1"))
//!     .and(FilterPredicate::equals("isActive", json!(true)));
//! assert_eq!(predicate.conjuncts().len(), 2);
//! ```

mod envelope;
mod predicate;
mod record;
mod request;

pub use envelope::ResultEnvelope;
pub use predicate::{FilterPredicate, FindQuery, OrderBy, Relation};
pub use record::Record;
pub use request::{SearchRequest, SortDirection};
