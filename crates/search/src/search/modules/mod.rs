//! The searchable modules.
//!
//! | Key | Collection | Scoped | Order field |
//! |-----|------------|--------|-------------|
//! | `members` | `members` | yes | `createdAt` |
//! | `churches` | `churches` | no | `foundingDate` |
//! | `ministries` | `ministries` | yes | `createdAt` |
//! | `users` | `users` | yes | `createdAt` |
//! | `tithes` | `tithes` | yes | `date` |
//! | `ministryMembers` | `ministry_members` | yes | `createdAt` |

use std::fmt;
use std::str::FromStr;

use phf::phf_map;

use crate::error::InputError;

use super::registry::{self, ModuleDef, Strategy};

pub mod churches;
pub mod members;
pub mod ministries;
pub mod ministry_members;
pub mod tithes;
pub mod users;

pub use churches::ChurchSearchType;
pub use members::MemberSearchType;
pub use ministries::MinistrySearchType;
pub use ministry_members::MinistryMemberSearchType;
pub use tithes::TitheSearchType;
pub use users::UserSearchType;

/// A searchable module, dispatched at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Module {
    /// Church members.
    Members,
    /// Churches.
    Churches,
    /// Ministries.
    Ministries,
    /// System users.
    Users,
    /// Tithes.
    Tithes,
    /// Ministry memberships.
    MinistryMembers,
}

static MODULES: phf::Map<&'static str, Module> = phf_map! {
    "members" => Module::Members,
    "churches" => Module::Churches,
    "ministries" => Module::Ministries,
    "users" => Module::Users,
    "tithes" => Module::Tithes,
    "ministrymembers" => Module::MinistryMembers,
    "ministry_members" => Module::MinistryMembers,
};

impl Module {
    /// Every module.
    pub const ALL: [Module; 6] = [
        Module::Members,
        Module::Churches,
        Module::Ministries,
        Module::Users,
        Module::Tithes,
        Module::MinistryMembers,
    ];

    /// Looks up a module by key, case-insensitively.
    pub fn from_key(key: &str) -> Result<Self, InputError> {
        MODULES
            .get(key.trim().to_lowercase().as_str())
            .copied()
            .ok_or_else(|| InputError::UnknownModule {
                module: key.to_string(),
                valid: Module::ALL.iter().map(|m| m.key().to_string()).collect(),
            })
    }

    /// The module's static description.
    pub fn def(self) -> &'static ModuleDef {
        match self {
            Module::Members => &members::DEF,
            Module::Churches => &churches::DEF,
            Module::Ministries => &ministries::DEF,
            Module::Users => &users::DEF,
            Module::Tithes => &tithes::DEF,
            Module::MinistryMembers => &ministry_members::DEF,
        }
    }

    /// The envelope key.
    pub fn key(self) -> &'static str {
        self.def().key
    }

    /// Resolves a search type token to its strategy.
    pub fn resolve(self, token: &str) -> Result<Strategy, InputError> {
        let def = self.def();
        match self {
            Module::Members => registry::resolve::<MemberSearchType>(def, token),
            Module::Churches => registry::resolve::<ChurchSearchType>(def, token),
            Module::Ministries => registry::resolve::<MinistrySearchType>(def, token),
            Module::Users => registry::resolve::<UserSearchType>(def, token),
            Module::Tithes => registry::resolve::<TitheSearchType>(def, token),
            Module::MinistryMembers => registry::resolve::<MinistryMemberSearchType>(def, token),
        }
    }

    /// Canonical search type tokens, in declaration order.
    pub fn tokens(self) -> Vec<&'static str> {
        match self {
            Module::Members => registry::tokens::<MemberSearchType>(),
            Module::Churches => registry::tokens::<ChurchSearchType>(),
            Module::Ministries => registry::tokens::<MinistrySearchType>(),
            Module::Users => registry::tokens::<UserSearchType>(),
            Module::Tithes => registry::tokens::<TitheSearchType>(),
            Module::MinistryMembers => registry::tokens::<MinistryMemberSearchType>(),
        }
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Module {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Module::from_key(s)
    }
}
