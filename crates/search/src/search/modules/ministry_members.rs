//! Ministry memberships: which member serves in which ministry.

use phf::phf_map;

use crate::search::join::IndirectJoin;
use crate::search::registry::{Grammar, ModuleDef, SearchType, Strategy};
use crate::types::Relation;

use super::{members, ministries, tithes};

/// The ministry a membership belongs to.
pub const MINISTRY: Relation = Relation::new("ministry", "ministries", "ministryId");

/// The ministry-members module.
pub static DEF: ModuleDef = ModuleDef {
    key: "ministryMembers",
    collection: "ministry_members",
    label: "integrantes de ministerios",
    scope_field: Some("churchId"),
    order_field: "createdAt",
    relations: &[tithes::MEMBER, MINISTRY],
    anchor: None,
    redacted_fields: &[],
};

/// Search types over ministry memberships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MinistryMemberSearchType {
    /// The member's first names.
    MemberFirstNames,
    /// The member's last names.
    MemberLastNames,
    /// The member's full name.
    MemberFullNames,
    /// The ministry's name, ignoring accents.
    MinistryName,
    /// `active` or `inactive`.
    RecordStatus,
}

static TOKENS: phf::Map<&'static str, MinistryMemberSearchType> = phf_map! {
    "memberfirstnames" => MinistryMemberSearchType::MemberFirstNames,
    "memberlastnames" => MinistryMemberSearchType::MemberLastNames,
    "memberfullnames" => MinistryMemberSearchType::MemberFullNames,
    "ministryname" => MinistryMemberSearchType::MinistryName,
    "recordstatus" => MinistryMemberSearchType::RecordStatus,
};

impl SearchType for MinistryMemberSearchType {
    const ALL: &'static [Self] = &[
        MinistryMemberSearchType::MemberFirstNames,
        MinistryMemberSearchType::MemberLastNames,
        MinistryMemberSearchType::MemberFullNames,
        MinistryMemberSearchType::MinistryName,
        MinistryMemberSearchType::RecordStatus,
    ];

    fn from_lowercase_token(token: &str) -> Option<Self> {
        TOKENS.get(token).copied()
    }

    fn token(self) -> &'static str {
        match self {
            MinistryMemberSearchType::MemberFirstNames => "MemberFirstNames",
            MinistryMemberSearchType::MemberLastNames => "MemberLastNames",
            MinistryMemberSearchType::MemberFullNames => "MemberFullNames",
            MinistryMemberSearchType::MinistryName => "MinistryName",
            MinistryMemberSearchType::RecordStatus => "RecordStatus",
        }
    }

    fn strategy(self) -> Strategy {
        let token = self.token();
        let through_members = |field| IndirectJoin::new(&members::DEF, field, "memberId");
        match self {
            MinistryMemberSearchType::MemberFirstNames => Strategy::joined(
                token,
                Grammar::Names,
                through_members("person.firstNames"),
                "nombres del miembro",
            ),
            MinistryMemberSearchType::MemberLastNames => Strategy::joined(
                token,
                Grammar::Names,
                through_members("person.lastNames"),
                "apellidos del miembro",
            ),
            MinistryMemberSearchType::MemberFullNames => Strategy::joined(
                token,
                Grammar::FullName {
                    last_field: "person.lastNames",
                },
                through_members("person.firstNames"),
                "nombre completo del miembro",
            ),
            MinistryMemberSearchType::MinistryName => Strategy::joined(
                token,
                Grammar::Text {
                    accent_insensitive: true,
                },
                IndirectJoin::new(&ministries::DEF, "name", "ministryId"),
                "ministerio",
            ),
            MinistryMemberSearchType::RecordStatus => Strategy::record_status(token),
        }
    }
}
