//! Actor roles and their edit permissions.

use serde::{Deserialize, Serialize};

use crate::track::FieldSpec;

/// Back-office role with different permission levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access, including the admin-approval gate on every track.
    Admin,
    /// May edit track statuses and supporting fields on assigned customers
    /// only; never the admin-approval fields.
    #[default]
    Employee,
}

impl Role {
    /// Whether this role may write the given field.
    ///
    /// Admin-approval fields are writable only by an admin; everything else
    /// in a track is writable by the owning employee too.
    #[must_use]
    pub const fn may_edit(self, spec: &FieldSpec) -> bool {
        match self {
            Self::Admin => true,
            Self::Employee => !spec.admin_only,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Employee => write!(f, "employee"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "employee" => Ok(Self::Employee),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::Track;

    #[test]
    fn test_role_round_trip() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("employee".parse::<Role>(), Ok(Role::Employee));
        assert!("superuser".parse::<Role>().is_err());
        assert_eq!(Role::Admin.to_string(), "admin");
    }

    #[test]
    fn test_employee_cannot_edit_admin_approval() {
        for track in Track::ALL {
            for spec in track.fields() {
                if spec.admin_only {
                    assert!(!Role::Employee.may_edit(spec), "{}", spec.name);
                }
                assert!(Role::Admin.may_edit(spec), "{}", spec.name);
            }
        }
    }
}
