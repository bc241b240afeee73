//! Group Roles
//!
//! Permission levels a participant holds inside a group.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Role of an identity inside a group, ordered by privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Read-only access
    Reader,
    /// May edit records owned by the group
    Writer,
    /// May edit records and invite others
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Reader => "reader",
            Role::Writer => "writer",
            Role::Admin => "admin",
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Role::Reader => 0,
            Role::Writer => 1,
            Role::Admin => 2,
        }
    }

    pub fn can_write(&self) -> bool {
        matches!(self, Role::Writer | Role::Admin)
    }

    pub fn can_invite(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// The stronger of two roles. Accepting an invite never downgrades.
    pub fn max(self, other: Role) -> Role {
        if other.rank() > self.rank() {
            other
        } else {
            self
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reader" => Ok(Role::Reader),
            "writer" => Ok(Role::Writer),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permissions() {
        assert!(Role::Admin.can_invite());
        assert!(!Role::Writer.can_invite());
        assert!(Role::Writer.can_write());
        assert!(!Role::Reader.can_write());
    }

    #[test]
    fn test_max_never_downgrades() {
        assert_eq!(Role::Admin.max(Role::Writer), Role::Admin);
        assert_eq!(Role::Reader.max(Role::Writer), Role::Writer);
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("writer".parse::<Role>(), Ok(Role::Writer));
        assert!("owner".parse::<Role>().is_err());
    }
}
