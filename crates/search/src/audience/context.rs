//! Audience context for search operations.
//!
//! This module defines [`Audience`], the per-request description of who is
//! searching and which scope they are bound to.

use super::id::ScopeId;

/// The caller of a search and the scope they are currently bound to.
///
/// An audience with no scope searches across all scopes. A search request may
/// still name an explicit scope, which takes precedence over the audience's.
///
/// # Examples
///
/// ```
/// use civica_search::audience::{Audience, ScopeId};
///
/// let audience = Audience::scoped(ScopeId::new("church-1"))
///     .with_caller_id("user-7")
///     .with_correlation_id("req-1");
///
/// assert_eq!(audience.caller_id(), Some("user-7"));
/// assert_eq!(audience.correlation_id(), Some("req-1"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Audience {
    /// The current scope, if the caller is bound to one.
    scope_id: Option<ScopeId>,
    /// Optional caller identity for logging.
    caller_id: Option<String>,
    /// Optional correlation ID for request tracing.
    correlation_id: Option<String>,
}

impl Audience {
    /// Creates an audience bound to the given scope.
    pub fn scoped(scope_id: ScopeId) -> Self {
        Self {
            scope_id: Some(scope_id),
            ..Self::default()
        }
    }

    /// Creates an audience that is not bound to any scope.
    pub fn unscoped() -> Self {
        Self::default()
    }

    /// Returns a builder for constructing an audience from external input.
    pub fn builder() -> AudienceBuilder {
        AudienceBuilder::new()
    }

    /// Sets the caller identity.
    pub fn with_caller_id(mut self, caller_id: impl Into<String>) -> Self {
        self.caller_id = Some(caller_id.into());
        self
    }

    /// Sets the correlation ID for tracing.
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// Returns the current scope, if any.
    pub fn scope_id(&self) -> Option<&ScopeId> {
        self.scope_id.as_ref()
    }

    /// Returns the caller identity, if set.
    pub fn caller_id(&self) -> Option<&str> {
        self.caller_id.as_deref()
    }

    /// Returns the correlation ID, if set.
    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    /// Resolves the scope a search runs under.
    ///
    /// An explicit scope wins over the audience's own; blank identifiers count
    /// as absent. `None` means the search spans every scope.
    pub fn effective_scope<'a>(&'a self, explicit: Option<&'a ScopeId>) -> Option<&'a ScopeId> {
        explicit
            .filter(|s| !s.is_blank())
            .or_else(|| self.scope_id.as_ref().filter(|s| !s.is_blank()))
    }
}

/// Builder for [`Audience`] values assembled from headers, claims, and the like.
#[derive(Debug, Default)]
pub struct AudienceBuilder {
    scope_id: Option<ScopeId>,
    caller_id: Option<String>,
    correlation_id: Option<String>,
}

impl AudienceBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the scope.
    pub fn scope_id(mut self, scope_id: ScopeId) -> Self {
        self.scope_id = Some(scope_id);
        self
    }

    /// Sets the scope from an optional string, ignoring blank values.
    pub fn scope_id_opt(mut self, scope_id: Option<&str>) -> Self {
        self.scope_id = scope_id
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ScopeId::new);
        self
    }

    /// Sets the caller identity.
    pub fn caller_id(mut self, caller_id: impl Into<String>) -> Self {
        self.caller_id = Some(caller_id.into());
        self
    }

    /// Sets the correlation ID.
    pub fn correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// Builds the audience.
    pub fn build(self) -> Audience {
        Audience {
            scope_id: self.scope_id,
            caller_id: self.caller_id,
            correlation_id: self.correlation_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_audience() {
        let audience = Audience::scoped(ScopeId::new("c1"));
        assert_eq!(audience.scope_id(), Some(&ScopeId::new("c1")));
        assert_eq!(audience.caller_id(), None);
    }

    #[test]
    fn test_unscoped_audience() {
        assert!(Audience::unscoped().scope_id().is_none());
    }

    #[test]
    fn test_effective_scope_prefers_explicit() {
        let audience = Audience::scoped(ScopeId::new("c1"));
        let explicit = ScopeId::new("c2");
        assert_eq!(
            audience.effective_scope(Some(&explicit)).map(ScopeId::as_str),
            Some("c2")
        );
        assert_eq!(
            audience.effective_scope(None).map(ScopeId::as_str),
            Some("c1")
        );
    }

    #[test]
    fn test_effective_scope_ignores_blank() {
        let audience = Audience::unscoped();
        let blank = ScopeId::new("");
        assert!(audience.effective_scope(Some(&blank)).is_none());
    }

    #[test]
    fn test_builder() {
        let audience = AudienceBuilder::new()
            .scope_id_opt(Some(" church-3 "))
            .caller_id("user-1")
            .correlation_id("corr-9")
            .build();

        assert_eq!(audience.scope_id().map(ScopeId::as_str), Some("church-3"));
        assert_eq!(audience.caller_id(), Some("user-1"));
        assert_eq!(audience.correlation_id(), Some("corr-9"));
    }

    #[test]
    fn test_builder_blank_scope() {
        let audience = Audience::builder().scope_id_opt(Some("   ")).build();
        assert!(audience.scope_id().is_none());
    }
}
