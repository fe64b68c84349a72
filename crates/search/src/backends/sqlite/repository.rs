//! [`Repository`] implementation for [`SqliteRepository`].

use async_trait::async_trait;
use rusqlite::params_from_iter;
use tracing::{trace, warn};

use crate::core::Repository;
use crate::error::StorageResult;
use crate::types::{FilterPredicate, FindQuery, Record, Relation};

use super::backend::{BACKEND_NAME, SqliteRepository};
use super::query_builder::{QueryBuilder, SqlFragment};

#[async_trait]
impl Repository for SqliteRepository {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn find_many(&self, query: &FindQuery) -> StorageResult<Vec<Record>> {
        let fragment = QueryBuilder::new(query).build()?;
        trace!(sql = %fragment.sql, params = fragment.params.len(), "executing query");
        self.fetch(&query.relations, fragment)
    }

    async fn find_one(
        &self,
        collection: &str,
        predicate: &FilterPredicate,
        relations: &[Relation],
    ) -> StorageResult<Option<Record>> {
        let query = FindQuery::new(collection, predicate.clone())
            .with_relations(relations)
            .with_page(1, 0);
        Ok(self.find_many(&query).await?.into_iter().next())
    }
}

impl SqliteRepository {
    fn fetch(&self, relations: &[Relation], fragment: SqlFragment) -> StorageResult<Vec<Record>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(&fragment.sql)?;

        let rows = stmt.query_map(params_from_iter(fragment.params.iter()), |row| {
            let content: String = row.get(0)?;
            let related = (0..relations.len())
                .map(|i| row.get::<_, Option<String>>(i + 1))
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok((content, related))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (content, related) = row?;
            let mut record = Record::from_value(serde_json::from_str(&content)?)?;

            for (relation, content) in relations.iter().zip(related) {
                match content {
                    Some(content) => {
                        record.attach(relation.name, Record::from_value(serde_json::from_str(&content)?)?)
                    }
                    None if record.get(relation.foreign_key).is_some() => warn!(
                        record = record.id().unwrap_or_default(),
                        relation = relation.name,
                        "related record not found"
                    ),
                    None => {}
                }
            }
            records.push(record);
        }

        Ok(records)
    }
}
