//! In-process repository.
//!
//! Holds collections in memory and evaluates predicates directly against
//! the JSON documents. Useful for tests and for small embedded datasets.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Datelike};
use parking_lot::RwLock;
use serde_json::Value;
use tracing::warn;

use crate::core::Repository;
use crate::error::{BackendError, StorageError, StorageResult};
use crate::search::normalize::contains_folded;
use crate::types::{FilterPredicate, FindQuery, OrderBy, Record, Relation, SortDirection};

const BACKEND_NAME: &str = "memory";

type Collection = BTreeMap<String, Record>;

/// A repository backed by in-memory maps.
///
/// Records are keyed by `id`; inserting an existing id replaces it.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts (or replaces) one record.
    pub fn insert(&self, collection: &str, value: Value) -> StorageResult<()> {
        let record = Record::from_value(value)?;
        let id = record_id(&record)?;
        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .insert(id, record);
        Ok(())
    }

    /// Inserts several records into one collection.
    pub fn insert_many(&self, collection: &str, values: Vec<Value>) -> StorageResult<()> {
        let records = values
            .into_iter()
            .map(|value| {
                let record = Record::from_value(value)?;
                Ok((record_id(&record)?, record))
            })
            .collect::<StorageResult<Vec<_>>>()?;

        self.collections
            .write()
            .entry(collection.to_string())
            .or_default()
            .extend(records);
        Ok(())
    }

    /// Returns the number of records in a collection.
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map_or(0, BTreeMap::len)
    }

    fn matching(
        &self,
        collection: &str,
        predicate: &FilterPredicate,
        relations: &[Relation],
    ) -> StorageResult<Vec<Record>> {
        ensure_supported(predicate)?;

        let collections = self.collections.read();
        let Some(records) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut matched = Vec::new();
        for record in records.values() {
            let record = load_relations(&collections, record, relations);
            if evaluate(&record, predicate) {
                matched.push(record);
            }
        }
        Ok(matched)
    }
}

#[async_trait]
impl Repository for MemoryRepository {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn find_many(&self, query: &FindQuery) -> StorageResult<Vec<Record>> {
        let mut records = self.matching(&query.collection, &query.predicate, &query.relations)?;

        if let Some(order) = &query.order {
            sort_records(&mut records, order);
        }

        let page = records.into_iter().skip(query.offset as usize);
        Ok(match query.limit {
            Some(limit) => page.take(limit as usize).collect(),
            None => page.collect(),
        })
    }

    async fn find_one(
        &self,
        collection: &str,
        predicate: &FilterPredicate,
        relations: &[Relation],
    ) -> StorageResult<Option<Record>> {
        Ok(self
            .matching(collection, predicate, relations)?
            .into_iter()
            .next())
    }
}

fn record_id(record: &Record) -> StorageResult<String> {
    record.id().map(str::to_string).ok_or_else(|| {
        StorageError::Backend(BackendError::SerializationError {
            message: "record has no string id".to_string(),
        })
    })
}

fn ensure_supported(predicate: &FilterPredicate) -> StorageResult<()> {
    match predicate {
        FilterPredicate::Raw { .. } => Err(StorageError::Backend(
            BackendError::UnsupportedCapability {
                backend_name: BACKEND_NAME.to_string(),
                capability: "raw predicates".to_string(),
            },
        )),
        FilterPredicate::All { predicates } => predicates.iter().try_for_each(ensure_supported),
        _ => Ok(()),
    }
}

fn load_relations(
    collections: &HashMap<String, Collection>,
    record: &Record,
    relations: &[Relation],
) -> Record {
    let mut loaded = record.clone();
    for relation in relations {
        let Some(foreign_id) = record.get(relation.foreign_key).and_then(Value::as_str) else {
            continue;
        };
        match collections
            .get(relation.collection)
            .and_then(|related| related.get(foreign_id))
        {
            Some(related) => loaded.attach(relation.name, related.clone()),
            None => warn!(
                relation = relation.name,
                collection = relation.collection,
                id = foreign_id,
                "dangling relation"
            ),
        }
    }
    loaded
}

/// Evaluates a predicate against a record with its relations attached.
fn evaluate(record: &Record, predicate: &FilterPredicate) -> bool {
    match predicate {
        FilterPredicate::Equals { field, value } => record
            .lookup(field)
            .is_some_and(|actual| values_equal(actual, value)),
        FilterPredicate::Range { field, low, high } => record
            .lookup(field)
            .is_some_and(|actual| in_range(actual, low, high)),
        FilterPredicate::PatternContains {
            field,
            text,
            accent_insensitive,
        } => record
            .lookup(field)
            .and_then(Value::as_str)
            .is_some_and(|actual| contains_folded(actual, text, *accent_insensitive)),
        FilterPredicate::SetMembership { field, values } => {
            record.lookup(field).is_some_and(|actual| match actual {
                Value::Array(items) => items.iter().any(|item| is_member(item, values)),
                other => is_member(other, values),
            })
        }
        FilterPredicate::MonthOfYear { field, month } => record
            .lookup(field)
            .and_then(epoch_millis)
            .and_then(DateTime::from_timestamp_millis)
            .is_some_and(|date| date.month() == *month),
        FilterPredicate::Raw { .. } => false,
        FilterPredicate::All { predicates } => predicates.iter().all(|p| evaluate(record, p)),
    }
}

fn is_member(value: &Value, set: &[Value]) -> bool {
    set.iter().any(|candidate| values_equal(value, candidate))
}

/// Booleans compare as `1`/`0` against numbers, as they do once stored in SQL.
fn values_equal(a: &Value, b: &Value) -> bool {
    match (as_number(a), as_number(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

/// Epoch milliseconds from an integer or float field.
fn epoch_millis(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|millis| millis.floor() as i64))
}

fn in_range(value: &Value, low: &Value, high: &Value) -> bool {
    let comparable = match value {
        Value::Number(_) => low.is_number() && high.is_number(),
        Value::String(_) => low.is_string() && high.is_string(),
        _ => false,
    };
    comparable
        && compare_values(Some(value), Some(low)) != Ordering::Less
        && compare_values(Some(value), Some(high)) != Ordering::Greater
}

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) | Some(Value::Number(_)) => 1,
        Some(Value::String(_)) => 2,
        Some(Value::Array(_)) | Some(Value::Object(_)) => 3,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        other => other.as_f64(),
    }
}

/// Total order over optional JSON values. Missing and null values are
/// smallest, then numbers, then strings, then composites.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let rank = type_rank(a).cmp(&type_rank(b));
    if rank != Ordering::Equal {
        return rank;
    }
    match (a, b) {
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(x), Some(y)) => match (as_number(x), as_number(y)) {
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
            _ => x.to_string().cmp(&y.to_string()),
        },
        _ => Ordering::Equal,
    }
}

fn sort_records(records: &mut [Record], order: &OrderBy) {
    records.sort_by(|a, b| {
        let primary = compare_values(a.lookup(&order.field), b.lookup(&order.field));
        let primary = match order.direction {
            SortDirection::Ascending => primary,
            SortDirection::Descending => primary.reverse(),
        };
        if order.tie_break_on_id {
            primary.then_with(|| a.id().cmp(&b.id()))
        } else {
            primary
        }
    });
}
