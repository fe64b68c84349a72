//! Result formatting and caller-facing messages.

use serde_json::Value;
use tracing::warn;

use crate::core::Repository;
use crate::error::StorageResult;
use crate::types::{FilterPredicate, Record, ResultEnvelope};

use super::registry::{ModuleDef, ParsedTerm, Strategy};
use super::terms::{format_date, format_number};

/// Shapes records into the module's envelope and injects its anchor.
///
/// The anchor is looked up independently of the search term and is
/// included whenever it exists, regardless of the paginated records.
pub async fn format_envelope<R: Repository + ?Sized>(
    repository: &R,
    def: &ModuleDef,
    records: Vec<Record>,
) -> StorageResult<ResultEnvelope> {
    let records = records
        .into_iter()
        .map(|record| redact(record, def.redacted_fields))
        .collect();
    let mut envelope = ResultEnvelope::new(def.key, records);

    if let Some(anchor) = def.anchor {
        let predicate = FilterPredicate::equals(anchor.flag_field, Value::Bool(true));
        match repository
            .find_one(def.collection, &predicate, def.relations)
            .await?
        {
            Some(record) => {
                envelope = envelope.with_auxiliary(anchor.name, redact(record, def.redacted_fields));
            }
            None => warn!(
                collection = def.collection,
                anchor = anchor.name,
                "anchor record not found"
            ),
        }
    }

    Ok(envelope)
}

fn redact(mut record: Record, fields: &[&str]) -> Record {
    for field in fields {
        record.remove(field);
    }
    record
}

/// Describes a parsed criterion in Spanish, e.g.
/// `fecha de nacimiento entre 01/01/2000 y 01/01/2001`.
pub fn describe_criterion(strategy: &Strategy, parsed: &ParsedTerm) -> String {
    let subject = strategy.subject;
    match parsed {
        ParsedTerm::Names(names) => format!("{subject} que contengan \"{names}\""),
        ParsedTerm::FullName(name) => format!("{subject} \"{} {}\"", name.first, name.last),
        ParsedTerm::DateRange(range) if range.is_instant() => {
            format!("{subject} el {}", format_date(range.from))
        }
        ParsedTerm::DateRange(range) => format!(
            "{subject} entre {} y {}",
            format_date(range.from),
            format_date(range.to)
        ),
        ParsedTerm::Month(month) => format!("{subject} {}", month.label),
        ParsedTerm::Enumerated(entry) => format!("{subject} {}", entry.label),
        ParsedTerm::NumericRange(range) if range.low == range.high => {
            format!("{subject} {}", format_number(range.low))
        }
        ParsedTerm::NumericRange(range) => format!(
            "{subject} entre {} y {}",
            format_number(range.low),
            format_number(range.high)
        ),
        ParsedTerm::Text(text) => format!("{subject} que contenga \"{text}\""),
    }
}

/// Builds the "no matching records" message.
///
/// The message always echoes the literal term and names the scope the
/// search ran in.
pub fn not_found_message(
    def: &ModuleDef,
    strategy: &Strategy,
    parsed: &ParsedTerm,
    term: &str,
    scope_name: &str,
) -> String {
    format!(
        "No se encontraron {} con {} en {} (término de búsqueda: {})",
        def.label,
        describe_criterion(strategy, parsed),
        scope_name,
        term
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::memory::MemoryRepository;
    use crate::search::modules::{Module, churches, users};
    use serde_json::json;

    fn parsed(module: Module, token: &str, term: &str) -> (Strategy, ParsedTerm) {
        let strategy = module.resolve(token).unwrap();
        let parsed = strategy.grammar.parse(strategy.token, term).unwrap();
        (strategy, parsed)
    }

    #[test]
    fn test_describe_date_range() {
        let (strategy, term) = parsed(Module::Members, "BirthDateRange", "946684800000+978307200000");
        assert_eq!(
            describe_criterion(&strategy, &term),
            "fecha de nacimiento entre 01/01/2000 y 01/01/2001"
        );
    }

    #[test]
    fn test_describe_enumerated_uses_label() {
        let (strategy, term) = parsed(Module::Members, "Gender", "female");
        assert_eq!(describe_criterion(&strategy, &term), "género femenino");

        let (strategy, term) = parsed(Module::Members, "BirthMonth", "march");
        assert_eq!(describe_criterion(&strategy, &term), "mes de nacimiento marzo");
    }

    #[test]
    fn test_not_found_message() {
        let (strategy, term) = parsed(Module::Tithes, "Amount", "100+250.5");
        let message = not_found_message(
            Module::Tithes.def(),
            &strategy,
            &term,
            "100+250.5",
            "Iglesia Central",
        );
        assert_eq!(
            message,
            "No se encontraron diezmos con monto entre 100 y 250.5 en Iglesia Central \
             (término de búsqueda: 100+250.5)"
        );
    }

    #[tokio::test]
    async fn test_format_injects_anchor() {
        let repo = MemoryRepository::new();
        repo.insert("churches", json!({"id": "c1", "isAnchor": true, "isActive": true}))
            .unwrap();
        let records = vec![Record::from_value(json!({"id": "c2"})).unwrap()];

        let envelope = format_envelope(&repo, &churches::DEF, records).await.unwrap();
        assert_eq!(envelope.ids(), vec!["c2"]);
        assert_eq!(envelope.auxiliary("mainChurch").and_then(Record::id), Some("c1"));
    }

    #[tokio::test]
    async fn test_format_without_anchor_record() {
        let repo = MemoryRepository::new();
        let records = vec![Record::from_value(json!({"id": "c2"})).unwrap()];

        let envelope = format_envelope(&repo, &churches::DEF, records).await.unwrap();
        assert!(envelope.auxiliary("mainChurch").is_none());
        assert_eq!(envelope.to_json(), json!({"churches": [{"id": "c2"}]}));
    }

    #[tokio::test]
    async fn test_format_redacts_fields() {
        let repo = MemoryRepository::new();
        let records = vec![
            Record::from_value(json!({"id": "u1", "email": "a@b.c", "passwordHash": "x"})).unwrap(),
        ];

        let envelope = format_envelope(&repo, &users::DEF, records).await.unwrap();
        assert_eq!(envelope.to_json(), json!({"users": [{"id": "u1", "email": "a@b.c"}]}));
    }
}
