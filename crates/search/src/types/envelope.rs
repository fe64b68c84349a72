//! Result envelope returned by a successful search.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use super::record::Record;

/// The formatted response of a search.
///
/// Serializes as a single JSON object: the paginated records under the
/// module key, plus one entry per auxiliary record.
///
/// ```
/// use civica_search::types::{Record, ResultEnvelope};
/// use serde_json::json;
///
/// let envelope = ResultEnvelope::new("churches", vec![
///     Record::from_value(json!({"id": "c2"})).unwrap(),
/// ])
/// .with_auxiliary("mainChurch", Record::from_value(json!({"id": "c1"})).unwrap());
///
/// assert_eq!(
///     envelope.to_json(),
///     json!({"churches": [{"id": "c2"}], "mainChurch": {"id": "c1"}})
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultEnvelope {
    module: String,
    records: Vec<Record>,
    auxiliary: BTreeMap<String, Record>,
}

impl ResultEnvelope {
    /// Creates an envelope for the given module.
    pub fn new(module: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            module: module.into(),
            records,
            auxiliary: BTreeMap::new(),
        }
    }

    /// Adds an auxiliary named record.
    pub fn with_auxiliary(mut self, name: impl Into<String>, record: Record) -> Self {
        self.auxiliary.insert(name.into(), record);
        self
    }

    /// Returns the module key.
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Returns the paginated records.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Returns an auxiliary record by name.
    pub fn auxiliary(&self, name: &str) -> Option<&Record> {
        self.auxiliary.get(name)
    }

    /// Returns the number of paginated records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if there are no paginated records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the ids of the paginated records, in order.
    pub fn ids(&self) -> Vec<&str> {
        self.records.iter().filter_map(Record::id).collect()
    }

    /// Renders the envelope as a JSON object.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Serialize for ResultEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1 + self.auxiliary.len()))?;
        map.serialize_entry(&self.module, &self.records)?;
        for (name, record) in &self.auxiliary {
            map.serialize_entry(name, record)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(id: &str) -> Record {
        Record::from_value(json!({"id": id})).unwrap()
    }

    #[test]
    fn test_envelope_shape() {
        let envelope = ResultEnvelope::new("members", vec![record("m1"), record("m2")]);
        assert_eq!(envelope.len(), 2);
        assert_eq!(envelope.ids(), vec!["m1", "m2"]);
        assert_eq!(
            envelope.to_json(),
            json!({"members": [{"id": "m1"}, {"id": "m2"}]})
        );
    }

    #[test]
    fn test_auxiliary_entries() {
        let envelope = ResultEnvelope::new("churches", vec![record("c2")])
            .with_auxiliary("mainChurch", record("c1"));

        assert_eq!(envelope.auxiliary("mainChurch").and_then(Record::id), Some("c1"));
        assert!(envelope.auxiliary("other").is_none());
        assert_eq!(envelope.to_json()["mainChurch"]["id"], "c1");
    }
}
