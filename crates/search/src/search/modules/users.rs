//! System users. Password hashes never leave the repository layer.

use phf::phf_map;

use crate::search::registry::{Grammar, ModuleDef, SearchType, Strategy};
use crate::search::terms::ROLES;

use super::members::PERSON;

/// The users module.
pub static DEF: ModuleDef = ModuleDef {
    key: "users",
    collection: "users",
    label: "usuarios",
    scope_field: Some("churchId"),
    order_field: "createdAt",
    relations: &[PERSON],
    anchor: None,
    redacted_fields: &["passwordHash"],
};

/// Search types over users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserSearchType {
    /// First names, `+` for spaces.
    FirstNames,
    /// Last names, `+` for spaces.
    LastNames,
    /// `first+names-last+names`.
    FullNames,
    /// Free text on the e-mail address.
    Email,
    /// A single role, matched against the role list. Alias `Role`.
    Roles,
    /// `active` or `inactive`.
    RecordStatus,
}

static TOKENS: phf::Map<&'static str, UserSearchType> = phf_map! {
    "firstnames" => UserSearchType::FirstNames,
    "lastnames" => UserSearchType::LastNames,
    "fullnames" => UserSearchType::FullNames,
    "email" => UserSearchType::Email,
    "roles" => UserSearchType::Roles,
    "role" => UserSearchType::Roles,
    "recordstatus" => UserSearchType::RecordStatus,
};

impl SearchType for UserSearchType {
    const ALL: &'static [Self] = &[
        UserSearchType::FirstNames,
        UserSearchType::LastNames,
        UserSearchType::FullNames,
        UserSearchType::Email,
        UserSearchType::Roles,
        UserSearchType::RecordStatus,
    ];

    fn from_lowercase_token(token: &str) -> Option<Self> {
        TOKENS.get(token).copied()
    }

    fn token(self) -> &'static str {
        match self {
            UserSearchType::FirstNames => "FirstNames",
            UserSearchType::LastNames => "LastNames",
            UserSearchType::FullNames => "FullNames",
            UserSearchType::Email => "Email",
            UserSearchType::Roles => "Roles",
            UserSearchType::RecordStatus => "RecordStatus",
        }
    }

    fn strategy(self) -> Strategy {
        let token = self.token();
        match self {
            UserSearchType::FirstNames => {
                Strategy::field(token, Grammar::Names, "person.firstNames", "nombres")
            }
            UserSearchType::LastNames => {
                Strategy::field(token, Grammar::Names, "person.lastNames", "apellidos")
            }
            UserSearchType::FullNames => Strategy::field(
                token,
                Grammar::FullName {
                    last_field: "person.lastNames",
                },
                "person.firstNames",
                "nombre completo",
            ),
            UserSearchType::Email => Strategy::field(
                token,
                Grammar::Text {
                    accent_insensitive: false,
                },
                "email",
                "correo",
            ),
            UserSearchType::Roles => {
                Strategy::field(token, Grammar::Membership(&ROLES), "roles", "rol")
            }
            UserSearchType::RecordStatus => Strategy::record_status(token),
        }
    }
}
