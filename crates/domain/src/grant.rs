use std::collections::BTreeSet;
use std::str::FromStr;

use grantdeck_core::AppError;
use serde::{Deserialize, Serialize};

use crate::{PermissionId, PermissionName};

/// Whether a subject holds a permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grant {
    /// The subject holds the permission.
    Granted,
    /// The subject does not hold the permission.
    Revoked,
}

impl Grant {
    /// Maps a checkbox position to a grant.
    #[must_use]
    pub fn from_checked(checked: bool) -> Self {
        if checked { Self::Granted } else { Self::Revoked }
    }

    /// Returns true for [`Grant::Granted`].
    #[must_use]
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }

    /// Returns the opposite grant.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Granted => Self::Revoked,
            Self::Revoked => Self::Granted,
        }
    }
}

/// Mutation verb sent to the authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantAction {
    /// Grants the permission.
    Assign,
    /// Removes the permission.
    Revoke,
}

impl GrantAction {
    /// Returns the action that moves a toggle to `target`.
    #[must_use]
    pub fn toward(target: Grant) -> Self {
        match target {
            Grant::Granted => Self::Assign,
            Grant::Revoked => Self::Revoke,
        }
    }

    /// Returns the grant this action produces.
    #[must_use]
    pub fn target(self) -> Grant {
        match self {
            Self::Assign => Grant::Granted,
            Self::Revoke => Grant::Revoked,
        }
    }

    /// Returns the stable path and payload value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Assign => "assign",
            Self::Revoke => "revoke",
        }
    }
}

impl FromStr for GrantAction {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "assign" => Ok(Self::Assign),
            "revoke" => Ok(Self::Revoke),
            _ => Err(AppError::Validation(format!(
                "unknown permission action '{value}'"
            ))),
        }
    }
}

/// Set of permission names held by a subject.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantSet(BTreeSet<PermissionName>);

impl GrantSet {
    /// Creates an empty grant set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when the subject holds `name`.
    #[must_use]
    pub fn contains(&self, name: &PermissionName) -> bool {
        self.0.contains(name)
    }

    /// Applies a grant value for `name`.
    pub fn set(&mut self, name: PermissionName, grant: Grant) {
        match grant {
            Grant::Granted => {
                self.0.insert(name);
            }
            Grant::Revoked => {
                self.0.remove(&name);
            }
        }
    }

    /// Number of held permissions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when nothing is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates held permission names in order.
    pub fn iter(&self) -> impl Iterator<Item = &PermissionName> {
        self.0.iter()
    }
}

impl FromIterator<PermissionName> for GrantSet {
    fn from_iter<T: IntoIterator<Item = PermissionName>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One permission mutation as sent to the authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionChange {
    /// Target permission.
    pub permission_name: PermissionName,
    /// Catalog id, if the catalog supplied one.
    pub permission_id: Option<PermissionId>,
    /// Assign or revoke.
    pub action: GrantAction,
}
