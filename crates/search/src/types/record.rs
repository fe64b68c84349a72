//! Record type returned by repositories.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{BackendError, StorageError, StorageResult};

/// A JSON document returned by a repository.
///
/// Records are always JSON objects. Related documents loaded through a
/// [`Relation`](super::Relation) appear as nested objects under the relation name.
///
/// # Examples
///
/// ```
/// use civica_search::types::Record;
/// use serde_json::json;
///
/// let mut member = Record::from_value(json!({"id": "m1", "personId": "p1"})).unwrap();
/// member.attach("person", Record::from_value(json!({"id": "p1", "firstNames": "Ana"})).unwrap());
///
/// assert_eq!(member.id(), Some("m1"));
/// assert_eq!(member.lookup("person.firstNames"), Some(&json!("Ana")));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// Creates a record from a JSON value, which must be an object.
    pub fn from_value(value: Value) -> StorageResult<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(StorageError::Backend(BackendError::SerializationError {
                message: format!("expected a JSON object, found {}", type_name(&other)),
            })),
        }
    }

    /// Returns the record's `id`, if it is a string.
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    /// Returns a top-level field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Resolves a dotted path through nested objects.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.0.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Attaches a related record under `name`.
    pub fn attach(&mut self, name: &str, related: Record) {
        self.0.insert(name.to_string(), Value::Object(related.0));
    }

    /// Removes a top-level field.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Returns the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Converts the record into a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_requires_object() {
        assert!(Record::from_value(json!({"id": "1"})).is_ok());
        let err = Record::from_value(json!([1, 2])).unwrap_err();
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn test_lookup_nested() {
        let record = Record::from_value(json!({
            "id": "m1",
            "person": {"name": {"first": "Ana"}}
        }))
        .unwrap();

        assert_eq!(record.lookup("person.name.first"), Some(&json!("Ana")));
        assert_eq!(record.lookup("person.missing"), None);
        assert_eq!(record.lookup("id.deeper"), None);
    }

    #[test]
    fn test_id_requires_string() {
        let record = Record::from_value(json!({"id": 7})).unwrap();
        assert_eq!(record.id(), None);
    }

    #[test]
    fn test_attach_and_serialize() {
        let mut record = Record::from_value(json!({"id": "t1"})).unwrap();
        record.attach("member", Record::from_value(json!({"id": "m1"})).unwrap());

        let value = record.into_value();
        assert_eq!(value, json!({"id": "t1", "member": {"id": "m1"}}));
    }
}
