//! Church members.

use phf::phf_map;

use crate::search::registry::{Grammar, ModuleDef, SearchType, Strategy};
use crate::search::terms::{GENDER, MARITAL_STATUS};
use crate::types::Relation;

/// Personal data shared by members and users.
pub const PERSON: Relation = Relation::new("person", "people", "personId");

/// The members module.
pub static DEF: ModuleDef = ModuleDef {
    key: "members",
    collection: "members",
    label: "miembros",
    scope_field: Some("churchId"),
    order_field: "createdAt",
    relations: &[PERSON],
    anchor: None,
    redacted_fields: &[],
};

/// Search types over members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberSearchType {
    /// First names, `+` for spaces.
    FirstNames,
    /// Last names, `+` for spaces.
    LastNames,
    /// `first+names-last+names`.
    FullNames,
    /// Birth date range (`from+to`). Alias `BirthDateRange`.
    BirthDate,
    /// English month name.
    BirthMonth,
    /// `male` or `female`.
    Gender,
    /// `single`, `married`, `widowed`, `divorced` or `cohabiting`.
    MaritalStatus,
    /// Free text.
    Address,
    /// Country, ignoring accents.
    Country,
    /// `active` or `inactive`.
    RecordStatus,
}

static TOKENS: phf::Map<&'static str, MemberSearchType> = phf_map! {
    "firstnames" => MemberSearchType::FirstNames,
    "lastnames" => MemberSearchType::LastNames,
    "fullnames" => MemberSearchType::FullNames,
    "birthdate" => MemberSearchType::BirthDate,
    "birthdaterange" => MemberSearchType::BirthDate,
    "birthmonth" => MemberSearchType::BirthMonth,
    "gender" => MemberSearchType::Gender,
    "maritalstatus" => MemberSearchType::MaritalStatus,
    "address" => MemberSearchType::Address,
    "country" => MemberSearchType::Country,
    "recordstatus" => MemberSearchType::RecordStatus,
};

impl SearchType for MemberSearchType {
    const ALL: &'static [Self] = &[
        MemberSearchType::FirstNames,
        MemberSearchType::LastNames,
        MemberSearchType::FullNames,
        MemberSearchType::BirthDate,
        MemberSearchType::BirthMonth,
        MemberSearchType::Gender,
        MemberSearchType::MaritalStatus,
        MemberSearchType::Address,
        MemberSearchType::Country,
        MemberSearchType::RecordStatus,
    ];

    fn from_lowercase_token(token: &str) -> Option<Self> {
        TOKENS.get(token).copied()
    }

    fn token(self) -> &'static str {
        match self {
            MemberSearchType::FirstNames => "FirstNames",
            MemberSearchType::LastNames => "LastNames",
            MemberSearchType::FullNames => "FullNames",
            MemberSearchType::BirthDate => "BirthDate",
            MemberSearchType::BirthMonth => "BirthMonth",
            MemberSearchType::Gender => "Gender",
            MemberSearchType::MaritalStatus => "MaritalStatus",
            MemberSearchType::Address => "Address",
            MemberSearchType::Country => "Country",
            MemberSearchType::RecordStatus => "RecordStatus",
        }
    }

    fn strategy(self) -> Strategy {
        let token = self.token();
        match self {
            MemberSearchType::FirstNames => {
                Strategy::field(token, Grammar::Names, "person.firstNames", "nombres")
            }
            MemberSearchType::LastNames => {
                Strategy::field(token, Grammar::Names, "person.lastNames", "apellidos")
            }
            MemberSearchType::FullNames => Strategy::field(
                token,
                Grammar::FullName {
                    last_field: "person.lastNames",
                },
                "person.firstNames",
                "nombre completo",
            ),
            MemberSearchType::BirthDate => Strategy::field(
                token,
                Grammar::DateRange,
                "person.birthDate",
                "fecha de nacimiento",
            ),
            MemberSearchType::BirthMonth => Strategy::field(
                token,
                Grammar::MonthName,
                "person.birthDate",
                "mes de nacimiento",
            ),
            MemberSearchType::Gender => {
                Strategy::field(token, Grammar::Enumerated(&GENDER), "person.gender", "género")
            }
            MemberSearchType::MaritalStatus => Strategy::field(
                token,
                Grammar::Enumerated(&MARITAL_STATUS),
                "person.maritalStatus",
                "estado civil",
            ),
            MemberSearchType::Address => Strategy::field(
                token,
                Grammar::Text {
                    accent_insensitive: false,
                },
                "person.address",
                "dirección",
            ),
            MemberSearchType::Country => Strategy::field(
                token,
                Grammar::Text {
                    accent_insensitive: true,
                },
                "person.country",
                "país",
            ),
            MemberSearchType::RecordStatus => Strategy::record_status(token),
        }
    }
}
