//! The search-dispatch engine.
//!
//! A search request names a module, a search type token and a raw term.
//! The pipeline is:
//!
//! 1. [`registry`] resolves the token to a [`Strategy`](registry::Strategy).
//! 2. [`terms`] parses the term under the strategy's grammar.
//! 3. [`predicate`] ANDs scope, active status and the term criterion.
//! 4. [`join`] resolves criteria that live on a related collection.
//! 5. The repository runs the paginated, ordered query.
//! 6. [`format`] shapes the envelope, or the engine raises `NotFound`.

mod engine;
pub mod format;
pub mod join;
pub mod modules;
pub mod normalize;
pub mod predicate;
pub mod registry;
pub mod terms;

pub use engine::SearchEngine;
pub use join::{IndirectJoin, JoinResolver};
pub use modules::Module;
pub use predicate::PredicateBuilder;
pub use registry::{Grammar, ModuleDef, ParsedTerm, SearchType, Strategy, Target};
