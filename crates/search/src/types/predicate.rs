//! Filter predicates and repository queries.
//!
//! A [`FilterPredicate`] is an explicit, inspectable tree. Repositories translate
//! it into whatever their store understands; the engine never emits
//! store-specific syntax except through [`FilterPredicate::Raw`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::request::SortDirection;

/// A composable filter predicate.
///
/// Field names are dotted paths. A path whose first segment names a loaded
/// [`Relation`] reads from the related document (e.g. `person.birthDate`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum FilterPredicate {
    /// Field equals value.
    Equals {
        /// Field path.
        field: String,
        /// Expected JSON value.
        value: Value,
    },

    /// Field lies in the inclusive range `[low, high]`.
    Range {
        /// Field path.
        field: String,
        /// Lower bound (inclusive).
        low: Value,
        /// Upper bound (inclusive).
        high: Value,
    },

    /// Field contains `text` as a case-insensitive substring.
    #[serde(rename_all = "camelCase")]
    PatternContains {
        /// Field path.
        field: String,
        /// The substring to look for.
        text: String,
        /// Whether diacritics are ignored on both sides.
        accent_insensitive: bool,
    },

    /// Field value (or any element of an array field) is one of `values`.
    /// An empty set matches nothing.
    SetMembership {
        /// Field path.
        field: String,
        /// Accepted values.
        values: Vec<Value>,
    },

    /// The UTC calendar month of an epoch-millisecond field equals `month` (1-12),
    /// in any year.
    #[serde(rename_all = "camelCase")]
    MonthOfYear {
        /// Field path.
        field: String,
        /// Month number, 1 = January.
        month: u32,
    },

    /// A backend-native expression, passed through untouched.
    Raw {
        /// The expression text.
        expression: String,
    },

    /// Logical AND of all children. An empty list matches everything.
    All {
        /// The conjuncts.
        predicates: Vec<FilterPredicate>,
    },
}

impl FilterPredicate {
    /// Creates an equality predicate.
    pub fn equals(field: impl Into<String>, value: Value) -> Self {
        FilterPredicate::Equals {
            field: field.into(),
            value,
        }
    }

    /// Creates an inclusive range predicate.
    pub fn range(field: impl Into<String>, low: Value, high: Value) -> Self {
        FilterPredicate::Range {
            field: field.into(),
            low,
            high,
        }
    }

    /// Creates a substring predicate.
    pub fn contains(field: impl Into<String>, text: impl Into<String>, accent_insensitive: bool) -> Self {
        FilterPredicate::PatternContains {
            field: field.into(),
            text: text.into(),
            accent_insensitive,
        }
    }

    /// Creates a set-membership predicate.
    pub fn in_set(field: impl Into<String>, values: Vec<Value>) -> Self {
        FilterPredicate::SetMembership {
            field: field.into(),
            values,
        }
    }

    /// Creates a month-of-year predicate.
    pub fn month_of_year(field: impl Into<String>, month: u32) -> Self {
        FilterPredicate::MonthOfYear {
            field: field.into(),
            month,
        }
    }

    /// Creates a backend-native predicate.
    pub fn raw(expression: impl Into<String>) -> Self {
        FilterPredicate::Raw {
            expression: expression.into(),
        }
    }

    /// Creates a conjunction, flattening nested conjunctions.
    pub fn all(predicates: Vec<FilterPredicate>) -> Self {
        let mut flat = Vec::with_capacity(predicates.len());
        for predicate in predicates {
            match predicate {
                FilterPredicate::All { predicates } => flat.extend(predicates),
                other => flat.push(other),
            }
        }
        FilterPredicate::All { predicates: flat }
    }

    /// A predicate that matches every record.
    pub fn match_all() -> Self {
        FilterPredicate::All {
            predicates: Vec::new(),
        }
    }

    /// Combines two predicates with AND.
    pub fn and(self, other: FilterPredicate) -> Self {
        FilterPredicate::all(vec![self, other])
    }

    /// Returns the top-level conjuncts of this predicate.
    pub fn conjuncts(&self) -> &[FilterPredicate] {
        match self {
            FilterPredicate::All { predicates } => predicates,
            other => std::slice::from_ref(other),
        }
    }

    /// Returns `true` if this predicate matches everything.
    pub fn is_match_all(&self) -> bool {
        matches!(self, FilterPredicate::All { predicates } if predicates.is_empty())
    }

    /// Returns the field path this predicate reads, for leaf predicates.
    pub fn field(&self) -> Option<&str> {
        match self {
            FilterPredicate::Equals { field, .. }
            | FilterPredicate::Range { field, .. }
            | FilterPredicate::PatternContains { field, .. }
            | FilterPredicate::SetMembership { field, .. }
            | FilterPredicate::MonthOfYear { field, .. } => Some(field),
            FilterPredicate::Raw { .. } | FilterPredicate::All { .. } => None,
        }
    }
}

/// A 1:1 relation loaded alongside each record.
///
/// The related document is looked up in `collection` by the id stored in
/// the primary record's `foreign_key` field and attached under `name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Relation {
    /// Key the related document is attached under.
    pub name: &'static str,
    /// Collection holding the related document.
    pub collection: &'static str,
    /// Field on the primary record holding the related id.
    pub foreign_key: &'static str,
}

impl Relation {
    /// Creates a relation.
    pub const fn new(name: &'static str, collection: &'static str, foreign_key: &'static str) -> Self {
        Self {
            name,
            collection,
            foreign_key,
        }
    }

    /// Splits a field path into this relation's local path, if the path
    /// starts with the relation name.
    pub fn strip<'a>(&self, path: &'a str) -> Option<&'a str> {
        path.strip_prefix(self.name)?.strip_prefix('.')
    }
}

/// Ordering applied to a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Field path to order by.
    pub field: String,
    /// Direction.
    pub direction: SortDirection,
    /// Whether `id` ascending is used as a secondary key.
    pub tie_break_on_id: bool,
}

impl OrderBy {
    /// Creates an ordering with the `id` tie-break enabled.
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
            tie_break_on_id: true,
        }
    }

    /// Enables or disables the `id` tie-break.
    pub fn with_tie_break(mut self, tie_break_on_id: bool) -> Self {
        self.tie_break_on_id = tie_break_on_id;
        self
    }
}

/// A complete `find_many` query against one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct FindQuery {
    /// The collection to search.
    pub collection: String,
    /// The filter.
    pub predicate: FilterPredicate,
    /// Relations to load before filtering.
    pub relations: Vec<Relation>,
    /// Maximum records to return; `None` is unbounded.
    pub limit: Option<u32>,
    /// Records to skip.
    pub offset: u32,
    /// Ordering, if any.
    pub order: Option<OrderBy>,
}

impl FindQuery {
    /// Creates an unbounded, unordered query.
    pub fn new(collection: impl Into<String>, predicate: FilterPredicate) -> Self {
        Self {
            collection: collection.into(),
            predicate,
            relations: Vec::new(),
            limit: None,
            offset: 0,
            order: None,
        }
    }

    /// Sets the relations to load.
    pub fn with_relations(mut self, relations: &[Relation]) -> Self {
        self.relations = relations.to_vec();
        self
    }

    /// Sets limit and offset.
    pub fn with_page(mut self, limit: u32, offset: u32) -> Self {
        self.limit = Some(limit);
        self.offset = offset;
        self
    }

    /// Sets the ordering.
    pub fn with_order(mut self, order: OrderBy) -> Self {
        self.order = Some(order);
        self
    }

    /// Finds the loaded relation a field path reads through, if any.
    pub fn relation_for<'a>(&self, path: &'a str) -> Option<(&Relation, &'a str)> {
        self.relations
            .iter()
            .find_map(|relation| relation.strip(path).map(|local| (relation, local)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_flattens() {
        let predicate = FilterPredicate::equals("a", json!(1))
            .and(FilterPredicate::equals("b", json!(2)))
            .and(FilterPredicate::equals("c", json!(3)));

        assert_eq!(predicate.conjuncts().len(), 3);
    }

    #[test]
    fn test_match_all() {
        assert!(FilterPredicate::match_all().is_match_all());
        assert!(FilterPredicate::all(vec![]).is_match_all());
        assert!(!FilterPredicate::equals("a", json!(1)).is_match_all());
    }

    #[test]
    fn test_leaf_conjuncts() {
        let predicate = FilterPredicate::contains("name", "ana", true);
        assert_eq!(predicate.conjuncts(), &[predicate.clone()]);
        assert_eq!(predicate.field(), Some("name"));
    }

    #[test]
    fn test_serialize_tagged() {
        let predicate = FilterPredicate::contains("person.firstNames", "maria", true);
        let json = serde_json::to_value(&predicate).unwrap();
        assert_eq!(json["op"], "patternContains");
        assert_eq!(json["accentInsensitive"], true);
    }

    #[test]
    fn test_relation_strip() {
        let person = Relation::new("person", "people", "personId");
        assert_eq!(person.strip("person.birthDate"), Some("birthDate"));
        assert_eq!(person.strip("personId"), None);
        assert_eq!(person.strip("churchId"), None);
    }

    #[test]
    fn test_find_query_relation_for() {
        let query = FindQuery::new("members", FilterPredicate::match_all())
            .with_relations(&[Relation::new("person", "people", "personId")])
            .with_page(10, 0)
            .with_order(OrderBy::new("createdAt", SortDirection::Descending));

        let (relation, local) = query.relation_for("person.gender").unwrap();
        assert_eq!(relation.collection, "people");
        assert_eq!(local, "gender");
        assert!(query.relation_for("churchId").is_none());
        assert_eq!(query.limit, Some(10));
    }
}
