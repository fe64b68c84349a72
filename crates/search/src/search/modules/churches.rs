//! Churches. The collection is not scoped; the main church is injected
//! into every response as `mainChurch`.

use phf::phf_map;

use crate::search::registry::{Anchor, Grammar, ModuleDef, SearchType, Strategy};

/// The churches module.
pub static DEF: ModuleDef = ModuleDef {
    key: "churches",
    collection: "churches",
    label: "iglesias",
    scope_field: None,
    order_field: "foundingDate",
    relations: &[],
    anchor: Some(Anchor {
        name: "mainChurch",
        flag_field: "isAnchor",
    }),
    redacted_fields: &[],
};

/// Search types over churches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChurchSearchType {
    /// Name, ignoring accents.
    Name,
    /// Founding date range. Alias `FoundingDateRange`.
    FoundingDate,
    /// Country, ignoring accents.
    Country,
    /// Department, ignoring accents.
    Department,
    /// Province, ignoring accents.
    Province,
    /// District, ignoring accents.
    District,
    /// Free text.
    Address,
    /// `active` or `inactive`.
    RecordStatus,
}

static TOKENS: phf::Map<&'static str, ChurchSearchType> = phf_map! {
    "name" => ChurchSearchType::Name,
    "foundingdate" => ChurchSearchType::FoundingDate,
    "foundingdaterange" => ChurchSearchType::FoundingDate,
    "country" => ChurchSearchType::Country,
    "department" => ChurchSearchType::Department,
    "province" => ChurchSearchType::Province,
    "district" => ChurchSearchType::District,
    "address" => ChurchSearchType::Address,
    "recordstatus" => ChurchSearchType::RecordStatus,
};

const FOLDED: Grammar = Grammar::Text {
    accent_insensitive: true,
};

impl SearchType for ChurchSearchType {
    const ALL: &'static [Self] = &[
        ChurchSearchType::Name,
        ChurchSearchType::FoundingDate,
        ChurchSearchType::Country,
        ChurchSearchType::Department,
        ChurchSearchType::Province,
        ChurchSearchType::District,
        ChurchSearchType::Address,
        ChurchSearchType::RecordStatus,
    ];

    fn from_lowercase_token(token: &str) -> Option<Self> {
        TOKENS.get(token).copied()
    }

    fn token(self) -> &'static str {
        match self {
            ChurchSearchType::Name => "Name",
            ChurchSearchType::FoundingDate => "FoundingDate",
            ChurchSearchType::Country => "Country",
            ChurchSearchType::Department => "Department",
            ChurchSearchType::Province => "Province",
            ChurchSearchType::District => "District",
            ChurchSearchType::Address => "Address",
            ChurchSearchType::RecordStatus => "RecordStatus",
        }
    }

    fn strategy(self) -> Strategy {
        let token = self.token();
        match self {
            ChurchSearchType::Name => Strategy::field(token, FOLDED, "name", "nombre"),
            ChurchSearchType::FoundingDate => Strategy::field(
                token,
                Grammar::DateRange,
                "foundingDate",
                "fecha de fundación",
            ),
            ChurchSearchType::Country => Strategy::field(token, FOLDED, "country", "país"),
            ChurchSearchType::Department => {
                Strategy::field(token, FOLDED, "department", "departamento")
            }
            ChurchSearchType::Province => Strategy::field(token, FOLDED, "province", "provincia"),
            ChurchSearchType::District => Strategy::field(token, FOLDED, "district", "distrito"),
            ChurchSearchType::Address => Strategy::field(
                token,
                Grammar::Text {
                    accent_insensitive: false,
                },
                "address",
                "dirección",
            ),
            ChurchSearchType::RecordStatus => Strategy::record_status(token),
        }
    }
}
