//! Scope identifier type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An opaque identifier for a scope: the tenant or organizational unit a
/// search is restricted to.
///
/// The value is compared verbatim against the scope field of each collection
/// (for example a member's `churchId`).
///
/// # Examples
///
/// ```
/// use civica_search::audience::ScopeId;
///
/// let scope = ScopeId::new("church-1");
/// assert_eq!(scope.as_str(), "church-1");
/// assert_eq!(scope.to_string(), "church-1");
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScopeId(String);

impl ScopeId {
    /// Creates a new scope ID from the given string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the scope ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the identifier is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeId({})", self.0)
    }
}

impl FromStr for ScopeId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ScopeId::new(s))
    }
}

impl From<&str> for ScopeId {
    fn from(s: &str) -> Self {
        ScopeId::new(s)
    }
}

impl From<String> for ScopeId {
    fn from(s: String) -> Self {
        ScopeId::new(s)
    }
}

impl AsRef<str> for ScopeId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
