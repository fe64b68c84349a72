//! Search request types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::audience::ScopeId;

/// Sort direction for the declared order field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    #[serde(rename = "ASC", alias = "asc")]
    Ascending,
    /// Descending order.
    #[serde(rename = "DESC", alias = "desc")]
    Descending,
}

impl SortDirection {
    /// Returns the SQL keyword for this direction.
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" | "ASCENDING" => Ok(SortDirection::Ascending),
            "DESC" | "DESCENDING" => Ok(SortDirection::Descending),
            _ => Err(format!("unknown sort direction: {}", s)),
        }
    }
}

/// A search request as supplied by the caller.
///
/// `limit` and `offset` are optional; the engine substitutes its configured
/// defaults (10 and 0 out of the box) when they are absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    /// The search type token (e.g. `FirstNames`, `BirthDateRange`).
    pub search_type: String,

    /// The raw term, interpreted by the grammar of the search type.
    pub term: String,

    /// Maximum number of records to return.
    #[serde(default)]
    pub limit: Option<u32>,

    /// Number of records to skip.
    #[serde(default)]
    pub offset: Option<u32>,

    /// Direction applied to the module's order field.
    #[serde(default)]
    pub order: SortDirection,

    /// Scope to restrict the search to; overrides the audience's scope.
    #[serde(default)]
    pub scope_id: Option<ScopeId>,
}

impl SearchRequest {
    /// Creates a request with default pagination and ordering.
    pub fn new(search_type: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            search_type: search_type.into(),
            term: term.into(),
            limit: None,
            offset: None,
            order: SortDirection::default(),
            scope_id: None,
        }
    }

    /// Sets the limit.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the offset.
    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sets the sort direction.
    pub fn with_order(mut self, order: SortDirection) -> Self {
        self.order = order;
        self
    }

    /// Restricts the search to a scope.
    pub fn with_scope(mut self, scope_id: impl Into<ScopeId>) -> Self {
        self.scope_id = Some(scope_id.into());
        self
    }

    /// Returns the offset, defaulting to 0.
    pub fn offset_or_default(&self) -> u32 {
        self.offset.unwrap_or(0)
    }

    /// Returns the term with surrounding whitespace removed.
    pub fn trimmed_term(&self) -> &str {
        self.term.trim()
    }
}
