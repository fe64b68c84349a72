//! The repository collaborator trait.

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::types::{FilterPredicate, FindQuery, Record, Relation};

/// Read access to named collections of JSON records.
///
/// Implementations must agree on predicate semantics:
///
/// - `Equals` compares JSON values; booleans equal the numbers `1` and `0`.
/// - `Range` is inclusive.
/// - `PatternContains` is a case-insensitive substring match that also
///   strips diacritics on both sides when `accent_insensitive` is set.
/// - `SetMembership` matches when the field value, or any element of an
///   array field, is in the set. The empty set matches nothing.
/// - `MonthOfYear` compares the UTC month of a numeric epoch-millisecond
///   field (integer or float).
///
/// Results are ordered by the query's order field, then by `id` ascending
/// when the tie-break is enabled. Missing values sort first. Relations are
/// attached before predicates are evaluated; a dangling foreign key
/// attaches nothing.
///
/// # Example
///
/// ```
/// use civica_search::backends::memory::MemoryRepository;
/// use civica_search::core::Repository;
/// use civica_search::types::{FilterPredicate, FindQuery};
/// use serde_json::json;
///
/// # #[tokio::main]
/// # async fn main() {
/// let repo = MemoryRepository::new();
/// repo.insert("churches", json!({"id": "c1", "name": "Central", "isActive": true})).unwrap();
///
/// let query = FindQuery::new("churches", FilterPredicate::equals("isActive", json!(true)));
/// let found = repo.find_many(&query).await.unwrap();
/// assert_eq!(found.len(), 1);
/// # }
/// ```
#[async_trait]
pub trait Repository: Send + Sync {
    /// Returns a human-readable name for this backend.
    fn backend_name(&self) -> &'static str;

    /// Returns every record matching the query, ordered and paginated.
    async fn find_many(&self, query: &FindQuery) -> StorageResult<Vec<Record>>;

    /// Returns the first record of `collection` matching `predicate`, if any.
    ///
    /// "First" is by `id` ascending.
    async fn find_one(
        &self,
        collection: &str,
        predicate: &FilterPredicate,
        relations: &[Relation],
    ) -> StorageResult<Option<Record>>;
}

/// Convenience helpers built on [`Repository`].
#[async_trait]
pub trait RepositoryExt: Repository {
    /// Returns the ids of every record matching `predicate`.
    async fn find_ids(
        &self,
        collection: &str,
        predicate: FilterPredicate,
        relations: &[Relation],
    ) -> StorageResult<Vec<String>> {
        let query = FindQuery::new(collection, predicate).with_relations(relations);
        let records = self.find_many(&query).await?;
        Ok(records
            .iter()
            .filter_map(|record| record.id().map(str::to_string))
            .collect())
    }
}

impl<R: Repository + ?Sized> RepositoryExt for R {}
