use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Display, Formatter};

use grantdeck_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Unique permission token such as `user.create`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionName(NonEmptyString);

impl PermissionName {
    /// Creates a validated permission name.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = NonEmptyString::new(value)?;
        if value.as_str().chars().any(char::is_whitespace) {
            return Err(AppError::Validation(format!(
                "permission name '{}' must not contain whitespace",
                value.as_str()
            )));
        }

        Ok(Self(value))
    }

    /// Returns the stable token value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for PermissionName {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PermissionName> for String {
    fn from(value: PermissionName) -> Self {
        value.0.into()
    }
}

impl Display for PermissionName {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Opaque catalog identifier of a permission.
///
/// The authority may send numbers or strings; both are kept as text and
/// echoed back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionId(String);

impl PermissionId {
    /// Creates an identifier, treating blank input as "no id".
    #[must_use]
    pub fn parse(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_owned()))
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Grouping key of related permissions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleKey(NonEmptyString);

impl ModuleKey {
    /// Creates a validated module key.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        Ok(Self(NonEmptyString::new(value)?))
    }

    /// Returns the raw key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the key with its first character upper-cased.
    ///
    /// `user_management` becomes `User_management`; the rest of the key is
    /// left untouched.
    #[must_use]
    pub fn display_title(&self) -> String {
        let mut chars = self.as_str().chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl Display for ModuleKey {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Immutable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionDefinition {
    /// Unique permission token.
    pub name: PermissionName,
    /// Human-readable description shown as the primary label.
    pub description: String,
    /// Optional opaque catalog id.
    pub id: Option<PermissionId>,
    /// Owning module.
    pub module: ModuleKey,
}

/// Read-only permission catalog grouped by module.
///
/// Modules iterate in key order; permissions keep the order the authority
/// listed them in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionCatalog {
    modules: BTreeMap<ModuleKey, Vec<PermissionDefinition>>,
}

impl PermissionCatalog {
    /// Builds a catalog, rejecting duplicate permission names.
    pub fn new(definitions: impl IntoIterator<Item = PermissionDefinition>) -> AppResult<Self> {
        let mut modules: BTreeMap<ModuleKey, Vec<PermissionDefinition>> = BTreeMap::new();
        let mut seen = BTreeSet::new();

        for definition in definitions {
            if !seen.insert(definition.name.clone()) {
                return Err(AppError::Validation(format!(
                    "permission '{}' appears more than once in the catalog",
                    definition.name
                )));
            }

            modules
                .entry(definition.module.clone())
                .or_default()
                .push(definition);
        }

        Ok(Self { modules })
    }

    /// Returns true when no permission is defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Returns the total number of permissions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.values().map(Vec::len).sum()
    }

    /// Iterates modules with their permissions.
    pub fn modules(&self) -> impl Iterator<Item = (&ModuleKey, &[PermissionDefinition])> {
        self.modules
            .iter()
            .map(|(module, definitions)| (module, definitions.as_slice()))
    }

    /// Returns the permissions of one module.
    #[must_use]
    pub fn module(&self, module: &ModuleKey) -> Option<&[PermissionDefinition]> {
        self.modules.get(module).map(Vec::as_slice)
    }

    /// Iterates every permission in module order.
    pub fn definitions(&self) -> impl Iterator<Item = &PermissionDefinition> {
        self.modules.values().flatten()
    }

    /// Finds a permission by name.
    #[must_use]
    pub fn find(&self, name: &PermissionName) -> Option<&PermissionDefinition> {
        self.definitions()
            .find(|definition| &definition.name == name)
    }
}
