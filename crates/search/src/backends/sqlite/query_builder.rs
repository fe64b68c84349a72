//! SQL query builder.
//!
//! Translates a [`FindQuery`] into a parameterized `SELECT` over the
//! `records` table. Field paths become `json_extract` calls; paths that
//! start with a relation name read from a `LEFT JOIN`ed copy of `records`.

use rusqlite::ToSql;
use rusqlite::types::{ToSqlOutput, Value as SqlValue, ValueRef};
use serde_json::Value;

use crate::error::{BackendError, StorageError, StorageResult};
use crate::search::normalize::fold;
use crate::types::{FilterPredicate, FindQuery};

/// A fragment of SQL with bound parameters.
#[derive(Debug, Clone, Default)]
pub struct SqlFragment {
    /// The SQL clause.
    pub sql: String,
    /// Bound parameter values.
    pub params: Vec<SqlParam>,
}

/// A bound SQL parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    /// String parameter.
    String(String),
    /// Integer parameter.
    Integer(i64),
    /// Float parameter.
    Float(f64),
    /// Null parameter.
    Null,
}

impl SqlParam {
    /// Creates a string parameter.
    pub fn string(s: impl Into<String>) -> Self {
        SqlParam::String(s.into())
    }

    /// Converts a JSON value to the SQL value `json_extract` would yield.
    ///
    /// Booleans become `1`/`0`; arrays and objects become their JSON text.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => SqlParam::Null,
            Value::Bool(flag) => SqlParam::Integer(i64::from(*flag)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => SqlParam::Integer(i),
                None => SqlParam::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => SqlParam::String(s.clone()),
            other => SqlParam::String(other.to_string()),
        }
    }
}

impl ToSql for SqlParam {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlParam::String(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            SqlParam::Integer(i) => ToSqlOutput::Owned(SqlValue::Integer(*i)),
            SqlParam::Float(f) => ToSqlOutput::Owned(SqlValue::Real(*f)),
            SqlParam::Null => ToSqlOutput::Owned(SqlValue::Null),
        })
    }
}

impl SqlFragment {
    /// Creates a new SQL fragment.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Adds a parameter placeholder and returns the placeholder string.
    pub fn add_param(&mut self, param: SqlParam) -> String {
        self.params.push(param);
        format!("?{}", self.params.len())
    }
}

/// Builds SQL for one [`FindQuery`].
pub struct QueryBuilder<'a> {
    query: &'a FindQuery,
}

/// Where a field path is read from.
struct Location {
    source: String,
    json_path: String,
}

impl Location {
    fn extract(&self) -> String {
        format!("json_extract({}, '{}')", self.source, self.json_path)
    }
}

impl<'a> QueryBuilder<'a> {
    /// Creates a builder for `query`.
    pub fn new(query: &'a FindQuery) -> Self {
        Self { query }
    }

    /// Builds the complete statement.
    ///
    /// The first selected column is the record's content; each relation
    /// adds one nullable content column, in relation order.
    pub fn build(&self) -> StorageResult<SqlFragment> {
        let mut fragment = SqlFragment::default();
        let mut sql = String::from("SELECT r.content");

        for relation in &self.query.relations {
            check_identifier(relation.name)?;
            sql.push_str(&format!(", rel_{}.content", relation.name));
        }
        sql.push_str(" FROM records r");

        for relation in &self.query.relations {
            check_path(relation.foreign_key)?;
            let collection = fragment.add_param(SqlParam::string(relation.collection));
            sql.push_str(&format!(
                " LEFT JOIN records rel_{name} ON rel_{name}.collection = {collection} \
                 AND rel_{name}.id = json_extract(r.content, '$.{fk}')",
                name = relation.name,
                fk = relation.foreign_key,
            ));
        }

        let collection = fragment.add_param(SqlParam::string(&self.query.collection));
        sql.push_str(&format!(" WHERE r.collection = {}", collection));

        if !self.query.predicate.is_match_all() {
            let condition = self.condition(&self.query.predicate, &mut fragment)?;
            sql.push_str(&format!(" AND ({})", condition));
        }

        match &self.query.order {
            Some(order) => {
                let column = self.locate(&order.field)?.extract();
                sql.push_str(&format!(" ORDER BY {} {}", column, order.direction.as_sql()));
                if order.tie_break_on_id {
                    sql.push_str(", r.id ASC");
                }
            }
            None => sql.push_str(" ORDER BY r.id ASC"),
        }

        let limit = self.query.limit.map_or(-1, i64::from);
        let limit = fragment.add_param(SqlParam::Integer(limit));
        let offset = fragment.add_param(SqlParam::Integer(i64::from(self.query.offset)));
        sql.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset));

        fragment.sql = sql;
        Ok(fragment)
    }

    fn locate(&self, path: &str) -> StorageResult<Location> {
        check_path(path)?;
        Ok(match self.query.relation_for(path) {
            Some((relation, local)) => Location {
                source: format!("rel_{}.content", relation.name),
                json_path: format!("$.{}", local),
            },
            None => Location {
                source: "r.content".to_string(),
                json_path: format!("$.{}", path),
            },
        })
    }

    fn condition(
        &self,
        predicate: &FilterPredicate,
        fragment: &mut SqlFragment,
    ) -> StorageResult<String> {
        Ok(match predicate {
            FilterPredicate::Equals { field, value } => {
                let column = self.locate(field)?.extract();
                if value.is_null() {
                    format!("{} IS NULL", column)
                } else {
                    let param = fragment.add_param(SqlParam::from_json(value));
                    format!("{} = {}", column, param)
                }
            }
            FilterPredicate::Range { field, low, high } => {
                let column = self.locate(field)?.extract();
                let low = fragment.add_param(SqlParam::from_json(low));
                let high = fragment.add_param(SqlParam::from_json(high));
                format!("{} BETWEEN {} AND {}", column, low, high)
            }
            FilterPredicate::PatternContains {
                field,
                text,
                accent_insensitive,
            } => {
                let column = self.locate(field)?.extract();
                let function = if *accent_insensitive {
                    "fold_text"
                } else {
                    "fold_case"
                };
                let needle = fragment.add_param(SqlParam::String(fold(text, *accent_insensitive)));
                format!("instr({}({}), {}) > 0", function, column, needle)
            }
            FilterPredicate::SetMembership { values, .. } if values.is_empty() => "0".to_string(),
            FilterPredicate::SetMembership { field, values } => {
                // One JSON array parameter, so large id sets stay under the
                // bound-variable limit.
                let location = self.locate(field)?;
                let set = fragment.add_param(SqlParam::String(Value::Array(values.clone()).to_string()));
                format!(
                    "EXISTS (SELECT 1 FROM json_each({}, '{}') \
                     WHERE json_each.value IN (SELECT value FROM json_each({})))",
                    location.source, location.json_path, set
                )
            }
            FilterPredicate::MonthOfYear { field, month } => {
                let location = self.locate(field)?;
                let param = fragment.add_param(SqlParam::Integer(i64::from(*month)));
                format!(
                    "json_type({}, '{}') IN ('integer', 'real') \
                     AND CAST(strftime('%m', {} / 1000.0, 'unixepoch') AS INTEGER) = {}",
                    location.source,
                    location.json_path,
                    location.extract(),
                    param
                )
            }
            FilterPredicate::Raw { expression } => format!("({})", expression),
            FilterPredicate::All { predicates } if predicates.is_empty() => "1".to_string(),
            FilterPredicate::All { predicates } => predicates
                .iter()
                .map(|p| self.condition(p, fragment).map(|sql| format!("({})", sql)))
                .collect::<StorageResult<Vec<_>>>()?
                .join(" AND "),
        })
    }
}

fn invalid_field(path: &str) -> StorageError {
    StorageError::Backend(BackendError::QueryError {
        message: format!("invalid field path: {}", path),
    })
}

fn check_identifier(name: &str) -> StorageResult<()> {
    if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(invalid_field(name))
    }
}

fn check_path(path: &str) -> StorageResult<()> {
    path.split('.')
        .try_for_each(check_identifier)
        .map_err(|_| invalid_field(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{OrderBy, Relation, SortDirection};
    use serde_json::json;

    const PERSON: Relation = Relation::new("person", "people", "personId");

    #[test]
    fn test_sql_fragment_params() {
        let mut frag = SqlFragment::new("");
        assert_eq!(frag.add_param(SqlParam::string("a")), "?1");
        assert_eq!(frag.add_param(SqlParam::Integer(2)), "?2");
        assert_eq!(frag.params.len(), 2);
    }

    #[test]
    fn test_param_from_json() {
        assert_eq!(SqlParam::from_json(&json!(true)), SqlParam::Integer(1));
        assert_eq!(SqlParam::from_json(&json!(2.5)), SqlParam::Float(2.5));
        assert_eq!(SqlParam::from_json(&json!("x")), SqlParam::string("x"));
        assert_eq!(SqlParam::from_json(&json!(null)), SqlParam::Null);
    }

    #[test]
    fn test_build_basic() {
        let query = FindQuery::new(
            "members",
            FilterPredicate::equals("churchId", json!("c1"))
                .and(FilterPredicate::equals("isActive", json!(true))),
        )
        .with_page(10, 20)
        .with_order(OrderBy::new("createdAt", SortDirection::Descending));

        let frag = QueryBuilder::new(&query).build().unwrap();
        assert_eq!(
            frag.sql,
            "SELECT r.content FROM records r WHERE r.collection = ?1 \
             AND ((json_extract(r.content, '$.churchId') = ?2) AND (json_extract(r.content, '$.isActive') = ?3)) \
             ORDER BY json_extract(r.content, '$.createdAt') DESC, r.id ASC LIMIT ?4 OFFSET ?5"
        );
        assert_eq!(
            frag.params,
            vec![
                SqlParam::string("members"),
                SqlParam::string("c1"),
                SqlParam::Integer(1),
                SqlParam::Integer(10),
                SqlParam::Integer(20),
            ]
        );
    }

    #[test]
    fn test_build_relation_join() {
        let query = FindQuery::new(
            "members",
            FilterPredicate::contains("person.firstNames", "José", true),
        )
        .with_relations(&[PERSON]);

        let frag = QueryBuilder::new(&query).build().unwrap();
        assert!(frag.sql.starts_with("SELECT r.content, rel_person.content FROM records r"));
        assert!(frag.sql.contains(
            "LEFT JOIN records rel_person ON rel_person.collection = ?1 \
             AND rel_person.id = json_extract(r.content, '$.personId')"
        ));
        assert!(frag.sql.contains(
            "instr(fold_text(json_extract(rel_person.content, '$.firstNames')), ?3) > 0"
        ));
        assert_eq!(frag.params[2], SqlParam::string("jose"));
        assert!(frag.sql.ends_with("ORDER BY r.id ASC LIMIT ?4 OFFSET ?5"));
        assert_eq!(frag.params[3], SqlParam::Integer(-1));
    }

    #[test]
    fn test_set_membership() {
        let query = FindQuery::new(
            "tithes",
            FilterPredicate::in_set("memberId", vec![json!("m1"), json!("m2")]),
        );
        let frag = QueryBuilder::new(&query).build().unwrap();
        assert!(frag.sql.contains(
            "EXISTS (SELECT 1 FROM json_each(r.content, '$.memberId') \
             WHERE json_each.value IN (SELECT value FROM json_each(?2)))"
        ));
        assert_eq!(frag.params[1], SqlParam::string(r#"["m1","m2"]"#));
        assert_eq!(frag.params.len(), 4);

        let empty = FindQuery::new("tithes", FilterPredicate::in_set("memberId", vec![]));
        let frag = QueryBuilder::new(&empty).build().unwrap();
        assert!(frag.sql.contains("AND (0)"));
    }

    #[test]
    fn test_month_and_raw() {
        let query = FindQuery::new(
            "tithes",
            FilterPredicate::month_of_year("date", 3).and(FilterPredicate::raw("1 = 1")),
        );
        let frag = QueryBuilder::new(&query).build().unwrap();
        assert!(frag.sql.contains(
            "json_type(r.content, '$.date') IN ('integer', 'real') \
             AND CAST(strftime('%m', json_extract(r.content, '$.date') / 1000.0, 'unixepoch') AS INTEGER) = ?2"
        ));
        assert!(frag.sql.contains("((1 = 1))"));
    }

    #[test]
    fn test_contains_binds_folded_needle() {
        let query = FindQuery::new("churches", FilterPredicate::contains("address", "50%_Ávila", true));
        let frag = QueryBuilder::new(&query).build().unwrap();
        assert!(frag.sql.contains("instr(fold_text(json_extract(r.content, '$.address')), ?2) > 0"));
        assert_eq!(frag.params[1], SqlParam::string("50%_avila"));
    }

    #[test]
    fn test_rejects_unsafe_paths() {
        let query = FindQuery::new("x", FilterPredicate::equals("a') OR 1=1 --", json!(1)));
        assert!(QueryBuilder::new(&query).build().is_err());

        let query = FindQuery::new("x", FilterPredicate::equals("a..b", json!(1)));
        assert!(QueryBuilder::new(&query).build().is_err());
    }
}
