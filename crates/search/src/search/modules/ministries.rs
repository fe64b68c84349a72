//! Ministries of a church.

use phf::phf_map;

use crate::search::registry::{Grammar, ModuleDef, SearchType, Strategy};
use crate::search::terms::MINISTRY_CATEGORY;

/// The ministries module.
pub static DEF: ModuleDef = ModuleDef {
    key: "ministries",
    collection: "ministries",
    label: "ministerios",
    scope_field: Some("churchId"),
    order_field: "createdAt",
    relations: &[],
    anchor: None,
    redacted_fields: &[],
};

/// Search types over ministries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MinistrySearchType {
    /// Name, ignoring accents.
    Name,
    /// Ministry category.
    Category,
    /// Founding date range. Alias `FoundingDateRange`.
    FoundingDate,
    /// `active` or `inactive`.
    RecordStatus,
}

static TOKENS: phf::Map<&'static str, MinistrySearchType> = phf_map! {
    "name" => MinistrySearchType::Name,
    "category" => MinistrySearchType::Category,
    "foundingdate" => MinistrySearchType::FoundingDate,
    "foundingdaterange" => MinistrySearchType::FoundingDate,
    "recordstatus" => MinistrySearchType::RecordStatus,
};

impl SearchType for MinistrySearchType {
    const ALL: &'static [Self] = &[
        MinistrySearchType::Name,
        MinistrySearchType::Category,
        MinistrySearchType::FoundingDate,
        MinistrySearchType::RecordStatus,
    ];

    fn from_lowercase_token(token: &str) -> Option<Self> {
        TOKENS.get(token).copied()
    }

    fn token(self) -> &'static str {
        match self {
            MinistrySearchType::Name => "Name",
            MinistrySearchType::Category => "Category",
            MinistrySearchType::FoundingDate => "FoundingDate",
            MinistrySearchType::RecordStatus => "RecordStatus",
        }
    }

    fn strategy(self) -> Strategy {
        let token = self.token();
        match self {
            MinistrySearchType::Name => Strategy::field(
                token,
                Grammar::Text {
                    accent_insensitive: true,
                },
                "name",
                "nombre",
            ),
            MinistrySearchType::Category => Strategy::field(
                token,
                Grammar::Enumerated(&MINISTRY_CATEGORY),
                "category",
                "categoría",
            ),
            MinistrySearchType::FoundingDate => Strategy::field(
                token,
                Grammar::DateRange,
                "foundingDate",
                "fecha de fundación",
            ),
            MinistrySearchType::RecordStatus => Strategy::record_status(token),
        }
    }
}
