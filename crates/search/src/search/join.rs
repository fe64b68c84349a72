//! Indirect-join resolver.
//!
//! Some criteria live on a related collection that the primary collection
//! only references by id (a tithe's member, a ministry membership's
//! ministry). Those searches run in two phases: phase 1 collects the ids of
//! related records matching the term, phase 2 filters the primary
//! collection by membership of its correlation field in that id set.

use serde_json::Value;
use tracing::debug;

use crate::audience::ScopeId;
use crate::core::RepositoryExt;
use crate::error::StorageResult;
use crate::types::FilterPredicate;

use super::predicate::PredicateBuilder;
use super::registry::ModuleDef;

/// How a primary collection reaches a related collection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndirectJoin {
    /// The related module. Its own scope field, relations and status flag
    /// apply during phase 1.
    pub related: &'static ModuleDef,
    /// Field of the related record the term is matched against.
    pub related_filter_field: &'static str,
    /// Field of the primary record holding the related id.
    pub correlation_field: &'static str,
}

impl IndirectJoin {
    /// Creates a join.
    pub const fn new(
        related: &'static ModuleDef,
        related_filter_field: &'static str,
        correlation_field: &'static str,
    ) -> Self {
        Self {
            related,
            related_filter_field,
            correlation_field,
        }
    }

    /// Builds the phase 2 criterion from a phase 1 id set.
    pub fn membership(&self, ids: Vec<Value>) -> FilterPredicate {
        FilterPredicate::in_set(self.correlation_field, ids)
    }
}

/// Runs phase 1 of an indirect join.
pub struct JoinResolver<'a, R: ?Sized> {
    repository: &'a R,
}

impl<'a, R: RepositoryExt + ?Sized> JoinResolver<'a, R> {
    /// Creates a resolver over `repository`.
    pub fn new(repository: &'a R) -> Self {
        Self { repository }
    }

    /// Collects the ids of related records matching `term_predicate`.
    ///
    /// The related query is scoped and filtered by the related module's own
    /// status flag. It is not paginated. An empty result is returned as an
    /// empty set; the caller still runs phase 2.
    pub async fn related_ids(
        &self,
        join: &IndirectJoin,
        scope: Option<&ScopeId>,
        term_predicate: FilterPredicate,
    ) -> StorageResult<Vec<Value>> {
        let predicate = PredicateBuilder::new(join.related, scope).build(term_predicate, false);

        let ids = self
            .repository
            .find_ids(join.related.collection, predicate, join.related.relations)
            .await?;

        debug!(
            related = join.related.collection,
            matched = ids.len(),
            "indirect join phase 1 complete"
        );

        Ok(ids.into_iter().map(Value::String).collect())
    }
}
