use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CmsError;

/// Built-in roles. Closed set: policy is keyed on these values, never on a type hierarchy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Editor,
    Viewer,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Editor, Role::Viewer];

    /// Lowercase tag used in the ledger and in audit text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Editor => "editor",
            Role::Viewer => "viewer",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CmsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| CmsError::InvalidRole(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_tags() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("editor".parse::<Role>().unwrap(), Role::Editor);
        assert_eq!("viewer".parse::<Role>().unwrap(), Role::Viewer);
    }

    #[test]
    fn tags_are_exact_lowercase() {
        for tag in ["Admin", "ADMIN", " admin", "admin ", "Editor", "VIEWER"] {
            assert!(matches!(tag.parse::<Role>(), Err(CmsError::InvalidRole(_))), "{:?}", tag);
        }
    }

    #[test]
    fn parse_unknown_tag_is_invalid_role() {
        match "superuser".parse::<Role>() {
            Err(CmsError::InvalidRole(tag)) => assert_eq!(tag, "superuser"),
            other => panic!("expected InvalidRole, got {:?}", other),
        }
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn display_round_trips_through_tag() {
        for r in Role::ALL {
            assert_eq!(r.to_string().parse::<Role>().unwrap(), r);
        }
    }
}
