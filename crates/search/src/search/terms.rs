//! Term parsers and localized lookup tables.
//!
//! Each parser owns exactly one grammar. Parsers are pure: they never touch
//! storage, and they report failures as [`InputError`]s naming the search
//! type and the offending term.

use std::fmt;

use chrono::DateTime;
use phf::phf_ordered_map;
use serde_json::Value;

use crate::error::InputError;

/// An inclusive range of epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// Start, inclusive.
    pub from: i64,
    /// End, inclusive.
    pub to: i64,
}

impl DateRange {
    /// Returns `true` when the range covers a single instant.
    pub fn is_instant(&self) -> bool {
        self.from == self.to
    }

    /// Returns `true` if `millis` lies in the range.
    pub fn contains(&self, millis: i64) -> bool {
        self.from <= millis && millis <= self.to
    }
}

/// An inclusive numeric range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
    /// Lower bound, inclusive.
    pub low: f64,
    /// Upper bound, inclusive.
    pub high: f64,
}

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Month {
    /// 1 = January.
    pub number: u32,
    /// English name accepted as a term.
    pub name: &'static str,
    /// Spanish display label.
    pub label: &'static str,
}

/// A raw value as stored in a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawValue {
    /// A string code.
    Text(&'static str),
    /// A boolean flag.
    Flag(bool),
}

impl RawValue {
    /// Converts to the JSON value stored in records.
    pub fn to_json(self) -> Value {
        match self {
            RawValue::Text(text) => Value::String(text.to_string()),
            RawValue::Flag(flag) => Value::Bool(flag),
        }
    }
}

/// One accepted value of an enumerated search type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumEntry {
    /// The accepted (lower-case) term.
    pub term: &'static str,
    /// The stored raw value.
    pub raw: RawValue,
    /// Spanish display label, used only in messages.
    pub label: &'static str,
}

/// A closed table of accepted values.
pub struct EnumTable {
    entries: &'static phf::OrderedMap<&'static str, EnumEntry>,
}

impl EnumTable {
    /// Looks up a lower-cased term.
    pub fn get(&self, term: &str) -> Option<&'static EnumEntry> {
        self.entries.get(term)
    }

    /// Returns the accepted terms in declaration order.
    pub fn accepted(&self) -> Vec<String> {
        self.entries.keys().map(|k| k.to_string()).collect()
    }

    /// Iterates over every entry.
    pub fn entries(&self) -> impl Iterator<Item = &'static EnumEntry> {
        self.entries.values()
    }
}

impl fmt::Debug for EnumTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.keys()).finish()
    }
}

impl PartialEq for EnumTable {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.entries, other.entries)
    }
}

macro_rules! entry {
    ($term:literal, text $raw:literal, $label:literal) => {
        EnumEntry {
            term: $term,
            raw: RawValue::Text($raw),
            label: $label,
        }
    };
    ($term:literal, flag $raw:literal, $label:literal) => {
        EnumEntry {
            term: $term,
            raw: RawValue::Flag($raw),
            label: $label,
        }
    };
}

static GENDER_ENTRIES: phf::OrderedMap<&'static str, EnumEntry> = phf_ordered_map! {
    "male" => entry!("male", text "M", "masculino"),
    "female" => entry!("female", text "F", "femenino"),
};

static MARITAL_STATUS_ENTRIES: phf::OrderedMap<&'static str, EnumEntry> = phf_ordered_map! {
    "single" => entry!("single", text "S", "soltero(a)"),
    "married" => entry!("married", text "M", "casado(a)"),
    "widowed" => entry!("widowed", text "W", "viudo(a)"),
    "divorced" => entry!("divorced", text "D", "divorciado(a)"),
    "cohabiting" => entry!("cohabiting", text "C", "conviviente"),
};

static RECORD_STATUS_ENTRIES: phf::OrderedMap<&'static str, EnumEntry> = phf_ordered_map! {
    "active" => entry!("active", flag true, "activo"),
    "inactive" => entry!("inactive", flag false, "inactivo"),
};

static MINISTRY_CATEGORY_ENTRIES: phf::OrderedMap<&'static str, EnumEntry> = phf_ordered_map! {
    "worship" => entry!("worship", text "worship", "alabanza"),
    "youth" => entry!("youth", text "youth", "jóvenes"),
    "children" => entry!("children", text "children", "niños"),
    "women" => entry!("women", text "women", "damas"),
    "men" => entry!("men", text "men", "varones"),
    "missions" => entry!("missions", text "missions", "misiones"),
    "education" => entry!("education", text "education", "educación"),
    "evangelism" => entry!("evangelism", text "evangelism", "evangelismo"),
};

static ROLE_ENTRIES: phf::OrderedMap<&'static str, EnumEntry> = phf_ordered_map! {
    "admin" => entry!("admin", text "admin", "administrador"),
    "pastor" => entry!("pastor", text "pastor", "pastor"),
    "secretary" => entry!("secretary", text "secretary", "secretario(a)"),
    "treasurer" => entry!("treasurer", text "treasurer", "tesorero(a)"),
    "leader" => entry!("leader", text "leader", "líder"),
    "member" => entry!("member", text "member", "miembro"),
};

/// Gender: `male`, `female`.
pub static GENDER: EnumTable = EnumTable {
    entries: &GENDER_ENTRIES,
};

/// Marital status: `single`, `married`, `widowed`, `divorced`, `cohabiting`.
pub static MARITAL_STATUS: EnumTable = EnumTable {
    entries: &MARITAL_STATUS_ENTRIES,
};

/// Record status: `active`, `inactive`.
pub static RECORD_STATUS: EnumTable = EnumTable {
    entries: &RECORD_STATUS_ENTRIES,
};

/// Ministry category.
pub static MINISTRY_CATEGORY: EnumTable = EnumTable {
    entries: &MINISTRY_CATEGORY_ENTRIES,
};

/// User roles.
pub static ROLES: EnumTable = EnumTable {
    entries: &ROLE_ENTRIES,
};

static MONTHS: phf::OrderedMap<&'static str, Month> = phf_ordered_map! {
    "january" => Month { number: 1, name: "january", label: "enero" },
    "february" => Month { number: 2, name: "february", label: "febrero" },
    "march" => Month { number: 3, name: "march", label: "marzo" },
    "april" => Month { number: 4, name: "april", label: "abril" },
    "may" => Month { number: 5, name: "may", label: "mayo" },
    "june" => Month { number: 6, name: "june", label: "junio" },
    "july" => Month { number: 7, name: "july", label: "julio" },
    "august" => Month { number: 8, name: "august", label: "agosto" },
    "september" => Month { number: 9, name: "september", label: "septiembre" },
    "october" => Month { number: 10, name: "october", label: "octubre" },
    "november" => Month { number: 11, name: "november", label: "noviembre" },
    "december" => Month { number: 12, name: "december", label: "diciembre" },
};

fn malformed(search_type: &str, term: &str, reason: &str) -> InputError {
    InputError::MalformedTerm {
        search_type: search_type.to_string(),
        term: term.to_string(),
        reason: reason.to_string(),
    }
}

/// Parses `"from+to"` epoch milliseconds. `to` defaults to `from`.
///
/// ```
/// use civica_search::search::terms::parse_date_range;
///
/// let range = parse_date_range("BirthDate", "946684800000+978307200000").unwrap();
/// assert_eq!((range.from, range.to), (946684800000, 978307200000));
///
/// let instant = parse_date_range("BirthDate", "946684800000").unwrap();
/// assert!(instant.is_instant());
///
/// assert!(parse_date_range("BirthDate", "yesterday").is_err());
/// ```
pub fn parse_date_range(search_type: &str, term: &str) -> Result<DateRange, InputError> {
    let (first, second) = match term.split_once('+') {
        Some((first, second)) => (first.trim(), Some(second.trim())),
        None => (term.trim(), None),
    };

    let from: i64 = first
        .parse()
        .map_err(|_| malformed(search_type, term, "se esperaba una fecha en milisegundos"))?;

    let to = match second {
        None | Some("") => from,
        Some(second) => second.parse().map_err(|_| {
            malformed(search_type, term, "la fecha final debe estar en milisegundos")
        })?,
    };

    if from > to {
        return Err(malformed(
            search_type,
            term,
            "la fecha inicial es posterior a la fecha final",
        ));
    }

    Ok(DateRange { from, to })
}

/// Parses `"low+high"`. `high` defaults to `low`.
pub fn parse_numeric_range(search_type: &str, term: &str) -> Result<NumericRange, InputError> {
    let parse = |part: &str| -> Option<f64> {
        part.trim().parse::<f64>().ok().filter(|n| n.is_finite())
    };

    let (first, second) = match term.split_once('+') {
        Some((first, second)) => (first, Some(second)),
        None => (term, None),
    };

    let low = parse(first).ok_or_else(|| malformed(search_type, term, "se esperaba un número"))?;
    let high = match second.map(str::trim) {
        None | Some("") => low,
        Some(second) => parse(second)
            .ok_or_else(|| malformed(search_type, term, "el límite superior debe ser un número"))?,
    };

    if low > high {
        return Err(malformed(
            search_type,
            term,
            "el límite inferior es mayor que el superior",
        ));
    }

    Ok(NumericRange { low, high })
}

/// Parses an English month name, case-insensitively.
pub fn parse_month(search_type: &str, term: &str) -> Result<&'static Month, InputError> {
    MONTHS
        .get(term.trim().to_lowercase().as_str())
        .ok_or_else(|| InputError::InvalidValue {
            search_type: search_type.to_string(),
            value: term.to_string(),
            accepted: MONTHS.keys().map(|k| k.to_string()).collect(),
        })
}

/// Looks up a month by number.
pub fn month_by_number(number: u32) -> Option<&'static Month> {
    MONTHS.values().find(|month| month.number == number)
}

/// Validates an enumerated term against `table`, case-insensitively.
pub fn parse_enum(
    table: &EnumTable,
    search_type: &str,
    term: &str,
) -> Result<&'static EnumEntry, InputError> {
    table
        .get(term.trim().to_lowercase().as_str())
        .ok_or_else(|| InputError::InvalidValue {
            search_type: search_type.to_string(),
            value: term.to_string(),
            accepted: table.accepted(),
        })
}

/// Restores `+`-encoded spaces in a name term.
pub fn parse_names(search_type: &str, term: &str) -> Result<String, InputError> {
    let names = term
        .split('+')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if names.is_empty() {
        return Err(malformed(search_type, term, "no contiene ningún nombre"));
    }
    Ok(names)
}

/// A full name split into first and last names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullName {
    /// First names, spaces restored.
    pub first: String,
    /// Last names, spaces restored.
    pub last: String,
}

/// Parses `"first+names-last+names"`. The split happens at the first `-`.
pub fn parse_full_name(search_type: &str, term: &str) -> Result<FullName, InputError> {
    let (first, last) = term.split_once('-').ok_or_else(|| {
        malformed(search_type, term, "se esperaba el formato nombres-apellidos")
    })?;

    Ok(FullName {
        first: parse_names(search_type, first).map_err(|_| {
            malformed(search_type, term, "faltan los nombres")
        })?,
        last: parse_names(search_type, last).map_err(|_| {
            malformed(search_type, term, "faltan los apellidos")
        })?,
    })
}

/// Formats epoch milliseconds as `dd/mm/yyyy` (UTC).
pub fn format_date(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|date| date.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| millis.to_string())
}

/// Formats a number without a trailing `.0`.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
