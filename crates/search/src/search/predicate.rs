//! Predicate builder.
//!
//! Combines, in order, the scope predicate, the active-status predicate and
//! the term-derived predicate into a single conjunction.

use serde_json::{Value, json};

use crate::audience::ScopeId;
use crate::types::FilterPredicate;

use super::registry::{Grammar, ModuleDef, ParsedTerm, STATUS_FIELD, Strategy};

/// Builds filter predicates for one module and scope.
#[derive(Debug, Clone, Copy)]
pub struct PredicateBuilder<'a> {
    def: &'a ModuleDef,
    scope: Option<&'a ScopeId>,
}

impl<'a> PredicateBuilder<'a> {
    /// Creates a builder. `scope = None` searches across every scope.
    pub fn new(def: &'a ModuleDef, scope: Option<&'a ScopeId>) -> Self {
        Self { def, scope }
    }

    /// The scope predicate, omitted when no scope applies.
    pub fn scope_predicate(&self) -> Option<FilterPredicate> {
        let field = self.def.scope_field?;
        let scope = self.scope?;
        Some(FilterPredicate::equals(field, json!(scope.as_str())))
    }

    /// The default active-only predicate.
    pub fn status_predicate(&self) -> FilterPredicate {
        FilterPredicate::equals(STATUS_FIELD, Value::Bool(true))
    }

    /// ANDs scope, status and `term`.
    ///
    /// When `overrides_status` is set the status predicate is left out; the
    /// term itself is then the status criterion.
    pub fn build(&self, term: FilterPredicate, overrides_status: bool) -> FilterPredicate {
        let mut predicates = Vec::with_capacity(3);
        if let Some(scope) = self.scope_predicate() {
            predicates.push(scope);
        }
        if !overrides_status {
            predicates.push(self.status_predicate());
        }
        predicates.push(term);
        FilterPredicate::all(predicates)
    }
}

/// Builds the term-derived predicate for a parsed term.
pub fn term_predicate(strategy: &Strategy, parsed: &ParsedTerm) -> FilterPredicate {
    let field = strategy.filter_field();

    match (&strategy.grammar, parsed) {
        (Grammar::FullName { last_field }, ParsedTerm::FullName(name)) => FilterPredicate::all(vec![
            FilterPredicate::contains(field, name.first.as_str(), true),
            FilterPredicate::contains(*last_field, name.last.as_str(), true),
        ]),
        (Grammar::Membership(_), ParsedTerm::Enumerated(entry)) => {
            FilterPredicate::in_set(field, vec![entry.raw.to_json()])
        }
        (Grammar::Text { accent_insensitive }, ParsedTerm::Text(text)) => {
            FilterPredicate::contains(field, text.as_str(), *accent_insensitive)
        }
        (_, ParsedTerm::Names(names)) => FilterPredicate::contains(field, names.as_str(), true),
        (_, ParsedTerm::FullName(name)) => {
            FilterPredicate::contains(field, format!("{} {}", name.first, name.last), true)
        }
        (_, ParsedTerm::DateRange(range)) => {
            FilterPredicate::range(field, json!(range.from), json!(range.to))
        }
        (_, ParsedTerm::Month(month)) => FilterPredicate::month_of_year(field, month.number),
        (_, ParsedTerm::Enumerated(entry)) => FilterPredicate::equals(field, entry.raw.to_json()),
        (_, ParsedTerm::NumericRange(range)) => {
            FilterPredicate::range(field, json!(range.low), json!(range.high))
        }
        (_, ParsedTerm::Text(text)) => FilterPredicate::contains(field, text.as_str(), false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::modules::{churches, members, users};
    use crate::search::registry::SearchType;
    use crate::search::modules::members::MemberSearchType;
    use crate::search::modules::users::UserSearchType;

    #[test]
    fn test_build_scoped() {
        let scope = ScopeId::new("c1");
        let builder = PredicateBuilder::new(&members::DEF, Some(&scope));
        let predicate = builder.build(FilterPredicate::contains("person.firstNames", "ana", true), false);

        assert_eq!(
            predicate.conjuncts(),
            &[
                FilterPredicate::equals("churchId", json!("c1")),
                FilterPredicate::equals("isActive", json!(true)),
                FilterPredicate::contains("person.firstNames", "ana", true),
            ]
        );
    }

    #[test]
    fn test_build_unscoped_omits_scope() {
        let builder = PredicateBuilder::new(&members::DEF, None);
        let predicate = builder.build(FilterPredicate::equals("person.gender", json!("F")), false);
        assert_eq!(predicate.conjuncts().len(), 2);
        assert!(predicate.conjuncts().iter().all(|p| p.field() != Some("churchId")));
    }

    #[test]
    fn test_build_unscoped_collection_ignores_scope() {
        let scope = ScopeId::new("c1");
        let builder = PredicateBuilder::new(&churches::DEF, Some(&scope));
        assert!(builder.scope_predicate().is_none());
    }

    #[test]
    fn test_build_status_override() {
        let builder = PredicateBuilder::new(&members::DEF, None);
        let predicate = builder.build(FilterPredicate::equals("isActive", json!(false)), true);
        assert_eq!(predicate.conjuncts(), &[FilterPredicate::equals("isActive", json!(false))]);
    }

    #[test]
    fn test_full_name_predicate() {
        let strategy = MemberSearchType::FullNames.strategy();
        let parsed = strategy.grammar.parse(strategy.token, "Maria+Jose-Lopez+Diaz").unwrap();
        let predicate = term_predicate(&strategy, &parsed);

        assert_eq!(
            predicate.conjuncts(),
            &[
                FilterPredicate::contains("person.firstNames", "Maria Jose", true),
                FilterPredicate::contains("person.lastNames", "Lopez Diaz", true),
            ]
        );
    }

    #[test]
    fn test_date_range_predicate() {
        let strategy = MemberSearchType::BirthDate.strategy();
        let parsed = strategy.grammar.parse(strategy.token, "100+200").unwrap();
        assert_eq!(
            term_predicate(&strategy, &parsed),
            FilterPredicate::range("person.birthDate", json!(100), json!(200))
        );
    }

    #[test]
    fn test_month_predicate() {
        let strategy = MemberSearchType::BirthMonth.strategy();
        let parsed = strategy.grammar.parse(strategy.token, "July").unwrap();
        assert_eq!(
            term_predicate(&strategy, &parsed),
            FilterPredicate::month_of_year("person.birthDate", 7)
        );
    }

    #[test]
    fn test_enumerated_predicate_uses_raw_value() {
        let strategy = MemberSearchType::Gender.strategy();
        let parsed = strategy.grammar.parse(strategy.token, "female").unwrap();
        assert_eq!(
            term_predicate(&strategy, &parsed),
            FilterPredicate::equals("person.gender", json!("F"))
        );
    }

    #[test]
    fn test_roles_use_set_membership() {
        let strategy = UserSearchType::Roles.strategy();
        let parsed = strategy.grammar.parse(strategy.token, "Pastor").unwrap();
        assert_eq!(
            term_predicate(&strategy, &parsed),
            FilterPredicate::in_set("roles", vec![json!("pastor")])
        );
        assert!(users::DEF.redacted_fields.contains(&"passwordHash"));
    }

    #[test]
    fn test_country_is_accent_insensitive() {
        let strategy = MemberSearchType::Country.strategy();
        let parsed = strategy.grammar.parse(strategy.token, "México").unwrap();
        assert_eq!(
            term_predicate(&strategy, &parsed),
            FilterPredicate::contains("person.country", "México", true)
        );
    }
}
