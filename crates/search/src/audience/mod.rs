//! Caller context for search operations.
//!
//! The engine does not authenticate anyone. It consumes an [`Audience`] built
//! by the caller, which carries the caller's identity and the scope (tenant /
//! organizational unit) searches are restricted to by default.
//!
//! # Examples
//!
//! ```
//! use civica_search::audience::{Audience, ScopeId};
//!
//! // Caller bound to one church
//! let scoped = Audience::scoped(ScopeId::new("church-1")).with_caller_id("user-42");
//! assert_eq!(scoped.scope_id().map(|s| s.as_str()), Some("church-1"));
//!
//! // Caller allowed to search every church
//! let global = Audience::unscoped();
//! assert!(global.scope_id().is_none());
//! ```

mod context;
mod id;

pub use context::{Audience, AudienceBuilder};
pub use id::ScopeId;
