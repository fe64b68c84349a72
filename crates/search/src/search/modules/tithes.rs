//! Tithes. Member-name criteria are resolved through the members
//! collection.

use phf::phf_map;

use crate::search::join::IndirectJoin;
use crate::search::registry::{Grammar, ModuleDef, SearchType, Strategy};
use crate::types::Relation;

use super::members;

/// The member a tithe belongs to.
pub const MEMBER: Relation = Relation::new("member", "members", "memberId");

/// The tithes module.
pub static DEF: ModuleDef = ModuleDef {
    key: "tithes",
    collection: "tithes",
    label: "diezmos",
    scope_field: Some("churchId"),
    order_field: "date",
    relations: &[MEMBER],
    anchor: None,
    redacted_fields: &[],
};

/// Search types over tithes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TitheSearchType {
    /// The member's first names.
    MemberFirstNames,
    /// The member's last names.
    MemberLastNames,
    /// The member's full name.
    MemberFullNames,
    /// Date range. Alias `DateRange`.
    Date,
    /// English month name.
    Month,
    /// Amount range (`low+high`).
    Amount,
    /// `active` or `inactive`.
    RecordStatus,
}

static TOKENS: phf::Map<&'static str, TitheSearchType> = phf_map! {
    "memberfirstnames" => TitheSearchType::MemberFirstNames,
    "memberlastnames" => TitheSearchType::MemberLastNames,
    "memberfullnames" => TitheSearchType::MemberFullNames,
    "date" => TitheSearchType::Date,
    "daterange" => TitheSearchType::Date,
    "month" => TitheSearchType::Month,
    "amount" => TitheSearchType::Amount,
    "recordstatus" => TitheSearchType::RecordStatus,
};

fn through_members(field: &'static str) -> IndirectJoin {
    IndirectJoin::new(&members::DEF, field, "memberId")
}

impl SearchType for TitheSearchType {
    const ALL: &'static [Self] = &[
        TitheSearchType::MemberFirstNames,
        TitheSearchType::MemberLastNames,
        TitheSearchType::MemberFullNames,
        TitheSearchType::Date,
        TitheSearchType::Month,
        TitheSearchType::Amount,
        TitheSearchType::RecordStatus,
    ];

    fn from_lowercase_token(token: &str) -> Option<Self> {
        TOKENS.get(token).copied()
    }

    fn token(self) -> &'static str {
        match self {
            TitheSearchType::MemberFirstNames => "MemberFirstNames",
            TitheSearchType::MemberLastNames => "MemberLastNames",
            TitheSearchType::MemberFullNames => "MemberFullNames",
            TitheSearchType::Date => "Date",
            TitheSearchType::Month => "Month",
            TitheSearchType::Amount => "Amount",
            TitheSearchType::RecordStatus => "RecordStatus",
        }
    }

    fn strategy(self) -> Strategy {
        let token = self.token();
        match self {
            TitheSearchType::MemberFirstNames => Strategy::joined(
                token,
                Grammar::Names,
                through_members("person.firstNames"),
                "nombres del miembro",
            ),
            TitheSearchType::MemberLastNames => Strategy::joined(
                token,
                Grammar::Names,
                through_members("person.lastNames"),
                "apellidos del miembro",
            ),
            TitheSearchType::MemberFullNames => Strategy::joined(
                token,
                Grammar::FullName {
                    last_field: "person.lastNames",
                },
                through_members("person.firstNames"),
                "nombre completo del miembro",
            ),
            TitheSearchType::Date => Strategy::field(token, Grammar::DateRange, "date", "fecha"),
            TitheSearchType::Month => Strategy::field(token, Grammar::MonthName, "date", "mes"),
            TitheSearchType::Amount => {
                Strategy::field(token, Grammar::NumericRange, "amount", "monto")
            }
            TitheSearchType::RecordStatus => Strategy::record_status(token),
        }
    }
}
