//! Strategy registry.
//!
//! Every searchable module declares a closed [`SearchType`] enumeration.
//! Each search type maps to a [`Strategy`]: plain data describing the term
//! grammar, the field the criterion applies to, and whether the criterion
//! lives on a related collection. Token lookup goes through a compile-time
//! perfect-hash map, so resolution is O(1).

use std::fmt::Debug;
use std::hash::Hash;

use crate::error::InputError;
use crate::types::Relation;

use super::join::IndirectJoin;
use super::terms::{
    self, DateRange, EnumEntry, EnumTable, FullName, Month, NumericRange, RECORD_STATUS,
};

/// Field every collection uses for the active-status flag.
pub const STATUS_FIELD: &str = "isActive";

/// The grammar a search type's term follows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Grammar {
    /// `+`-encoded names, matched accent-insensitively.
    Names,
    /// `first+names-last+names`; the first segment is matched on the target
    /// field, the second on `last_field`.
    FullName {
        /// Field holding last names.
        last_field: &'static str,
    },
    /// `from+to` epoch milliseconds.
    DateRange,
    /// English month name, matched against the month of a date field.
    MonthName,
    /// A closed set of values compared for equality.
    Enumerated(&'static EnumTable),
    /// A closed set of values matched against an array field.
    Membership(&'static EnumTable),
    /// `low+high` numeric range.
    NumericRange,
    /// Free text used verbatim as a substring.
    Text {
        /// Whether diacritics are ignored.
        accent_insensitive: bool,
    },
    /// `active` / `inactive`, replacing the default active-only filter.
    RecordStatus,
}

/// A term after parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedTerm {
    /// Names with spaces restored.
    Names(String),
    /// First and last names.
    FullName(FullName),
    /// Inclusive epoch-millisecond range.
    DateRange(DateRange),
    /// A month of the year.
    Month(&'static Month),
    /// An accepted enumerated value.
    Enumerated(&'static EnumEntry),
    /// Inclusive numeric range.
    NumericRange(NumericRange),
    /// Verbatim text.
    Text(String),
}

impl Grammar {
    /// Parses `term` under this grammar.
    pub fn parse(&self, search_type: &str, term: &str) -> Result<ParsedTerm, InputError> {
        Ok(match self {
            Grammar::Names => ParsedTerm::Names(terms::parse_names(search_type, term)?),
            Grammar::FullName { .. } => {
                ParsedTerm::FullName(terms::parse_full_name(search_type, term)?)
            }
            Grammar::DateRange => ParsedTerm::DateRange(terms::parse_date_range(search_type, term)?),
            Grammar::MonthName => ParsedTerm::Month(terms::parse_month(search_type, term)?),
            Grammar::Enumerated(table) | Grammar::Membership(table) => {
                ParsedTerm::Enumerated(terms::parse_enum(table, search_type, term)?)
            }
            Grammar::RecordStatus => {
                ParsedTerm::Enumerated(terms::parse_enum(&RECORD_STATUS, search_type, term)?)
            }
            Grammar::NumericRange => {
                ParsedTerm::NumericRange(terms::parse_numeric_range(search_type, term)?)
            }
            Grammar::Text { .. } => ParsedTerm::Text(term.to_string()),
        })
    }
}

/// Where a strategy's criterion is evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    /// A field of the primary collection (possibly through a loaded relation).
    Field(&'static str),
    /// A field of a related collection, resolved in two phases.
    Joined(IndirectJoin),
}

/// One search type's complete behavior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strategy {
    /// Canonical token, e.g. `BirthDate`.
    pub token: &'static str,
    /// Term grammar.
    pub grammar: Grammar,
    /// Where the criterion applies.
    pub target: Target,
    /// Spanish noun for the criterion, used in messages.
    pub subject: &'static str,
}

impl Strategy {
    /// A strategy on a field of the primary collection.
    pub const fn field(
        token: &'static str,
        grammar: Grammar,
        field: &'static str,
        subject: &'static str,
    ) -> Self {
        Self {
            token,
            grammar,
            target: Target::Field(field),
            subject,
        }
    }

    /// A strategy on a related collection.
    pub const fn joined(
        token: &'static str,
        grammar: Grammar,
        join: IndirectJoin,
        subject: &'static str,
    ) -> Self {
        Self {
            token,
            grammar,
            target: Target::Joined(join),
            subject,
        }
    }

    /// The record-status strategy every module shares.
    pub const fn record_status(token: &'static str) -> Self {
        Self::field(token, Grammar::RecordStatus, STATUS_FIELD, "estado")
    }

    /// Returns `true` if this strategy replaces the active-only filter.
    pub fn overrides_status(&self) -> bool {
        matches!(self.grammar, Grammar::RecordStatus)
    }

    /// The field the term predicate is built on.
    pub fn filter_field(&self) -> &'static str {
        match self.target {
            Target::Field(field) => field,
            Target::Joined(join) => join.related_filter_field,
        }
    }

    /// The indirect join, if any.
    pub fn join(&self) -> Option<&IndirectJoin> {
        match &self.target {
            Target::Field(_) => None,
            Target::Joined(join) => Some(join),
        }
    }
}

/// A singleton record injected into every response of a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    /// Key the anchor record is published under.
    pub name: &'static str,
    /// Boolean field that marks the anchor record.
    pub flag_field: &'static str,
}

/// Static description of a searchable collection.
#[derive(Debug, PartialEq)]
pub struct ModuleDef {
    /// Key of the result envelope.
    pub key: &'static str,
    /// Collection in the repository.
    pub collection: &'static str,
    /// Spanish plural label, used in messages.
    pub label: &'static str,
    /// Field holding the scope id; `None` for unscoped collections.
    pub scope_field: Option<&'static str>,
    /// Field the results are ordered by.
    pub order_field: &'static str,
    /// Relations loaded with every record.
    pub relations: &'static [Relation],
    /// Anchor injected into every response.
    pub anchor: Option<Anchor>,
    /// Fields removed from records before they are returned.
    pub redacted_fields: &'static [&'static str],
}

/// A closed enumeration of search types owned by one module.
pub trait SearchType: Copy + Eq + Hash + Debug + Send + Sync + 'static {
    /// Every search type, in declaration order.
    const ALL: &'static [Self];

    /// Looks up a lower-cased token, including aliases.
    fn from_lowercase_token(token: &str) -> Option<Self>;

    /// Canonical token.
    fn token(self) -> &'static str;

    /// The strategy implementing this search type.
    fn strategy(self) -> Strategy;

    /// Parses a token case-insensitively.
    fn from_token(token: &str) -> Option<Self> {
        Self::from_lowercase_token(token.trim().to_lowercase().as_str())
    }
}

/// Resolves `token` to a strategy of search type `T`.
///
/// Unknown tokens fail with an error listing every valid token.
pub fn resolve<T: SearchType>(def: &ModuleDef, token: &str) -> Result<Strategy, InputError> {
    T::from_token(token)
        .map(T::strategy)
        .ok_or_else(|| InputError::UnknownSearchType {
            module: def.label.to_string(),
            token: token.to_string(),
            valid: tokens::<T>().into_iter().map(str::to_string).collect(),
        })
}

/// Canonical tokens of `T`, in declaration order.
pub fn tokens<T: SearchType>() -> Vec<&'static str> {
    T::ALL.iter().map(|t| t.token()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::modules::members::{self, MemberSearchType};

    #[test]
    fn test_resolve_case_insensitive() {
        let strategy = resolve::<MemberSearchType>(&members::DEF, "firstnames").unwrap();
        assert_eq!(strategy.token, "FirstNames");
        assert_eq!(strategy.grammar, Grammar::Names);
    }

    #[test]
    fn test_resolve_alias() {
        let strategy = resolve::<MemberSearchType>(&members::DEF, "BirthDateRange").unwrap();
        assert_eq!(strategy.token, "BirthDate");
    }

    #[test]
    fn test_resolve_unknown_lists_tokens() {
        let err = resolve::<MemberSearchType>(&members::DEF, "Height").unwrap_err();
        match err {
            InputError::UnknownSearchType { module, token, valid } => {
                assert_eq!(module, "miembros");
                assert_eq!(token, "Height");
                assert_eq!(valid, tokens::<MemberSearchType>());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_every_type_round_trips_token() {
        for search_type in MemberSearchType::ALL {
            assert_eq!(
                MemberSearchType::from_token(search_type.token()),
                Some(*search_type)
            );
        }
    }

    #[test]
    fn test_record_status_overrides() {
        let strategy = Strategy::record_status("RecordStatus");
        assert!(strategy.overrides_status());
        assert_eq!(strategy.filter_field(), STATUS_FIELD);
        assert!(strategy.join().is_none());
    }

    #[test]
    fn test_grammar_parse_dispatch() {
        let parsed = Grammar::RecordStatus.parse("RecordStatus", "Inactive").unwrap();
        match parsed {
            ParsedTerm::Enumerated(entry) => assert_eq!(entry.term, "inactive"),
            other => panic!("unexpected term: {other:?}"),
        }

        let parsed = Grammar::Text { accent_insensitive: false }
            .parse("Address", "Av. Siempre+Viva")
            .unwrap();
        assert_eq!(parsed, ParsedTerm::Text("Av. Siempre+Viva".to_string()));
    }
}
