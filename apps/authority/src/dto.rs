use std::collections::BTreeMap;

use grantdeck_application::SubjectPermissions;
use grantdeck_core::AppResult;
use grantdeck_domain::{
    GrantAction, PermissionChange, PermissionDefinition, PermissionId, PermissionName,
    SubjectProfile,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Permission id as sent by a client: either a number or a string.
///
/// A blank string means the client had no id for the permission.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, TS)]
#[serde(untagged)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-id-payload.ts"
)]
pub enum PermissionIdPayload {
    Number(u64),
    Text(String),
}

impl PermissionIdPayload {
    fn into_id(self) -> Option<PermissionId> {
        match self {
            Self::Number(value) => PermissionId::parse(value.to_string()),
            Self::Text(value) => PermissionId::parse(value),
        }
    }
}

/// Body of a single assign or revoke call.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/single-change-request.ts"
)]
pub struct SingleChangeRequest {
    pub permission_name: String,
    #[serde(default)]
    pub permission_id: Option<PermissionIdPayload>,
}

impl SingleChangeRequest {
    pub fn into_change(self, action: GrantAction) -> AppResult<PermissionChange> {
        Ok(PermissionChange {
            permission_name: PermissionName::new(self.permission_name)?,
            permission_id: self.permission_id.and_then(PermissionIdPayload::into_id),
            action,
        })
    }
}

/// One entry of a batch call.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/batch-change-request.ts"
)]
pub struct BatchChangeRequest {
    pub permission_name: String,
    #[serde(default)]
    pub permission_id: Option<PermissionIdPayload>,
    pub action: String,
}

/// Body of a batch call.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/batch-request.ts"
)]
pub struct BatchRequest {
    pub changes: Vec<BatchChangeRequest>,
}

impl BatchRequest {
    pub fn into_changes(self) -> AppResult<Vec<PermissionChange>> {
        self.changes
            .into_iter()
            .map(|change| {
                Ok(PermissionChange {
                    permission_name: PermissionName::new(change.permission_name)?,
                    permission_id: change.permission_id.and_then(PermissionIdPayload::into_id),
                    action: change.action.parse::<GrantAction>()?,
                })
            })
            .collect()
    }
}

/// Outcome of a mutation call.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/mutation-response.ts"
)]
pub struct MutationResponse {
    pub success: bool,
    pub message: String,
}

impl MutationResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// API representation of a subject.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/subject-response.ts"
)]
pub struct SubjectResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub is_active: bool,
}

impl From<SubjectProfile> for SubjectResponse {
    fn from(value: SubjectProfile) -> Self {
        Self {
            display_name: value.display_name(),
            id: value.id.as_str().to_owned(),
            username: value.username,
            email: value.email,
            is_active: value.is_active,
        }
    }
}

/// Subject listing.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/subject-list-response.ts"
)]
pub struct SubjectListResponse {
    pub success: bool,
    pub data: Vec<SubjectResponse>,
}

/// A permission the subject holds.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/granted-permission-response.ts"
)]
pub struct GrantedPermissionResponse {
    pub name: String,
    pub module: Option<String>,
}

/// One catalog entry.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/permission-response.ts"
)]
pub struct PermissionResponse {
    pub name: String,
    pub description: String,
    pub id: Option<String>,
}

impl From<&PermissionDefinition> for PermissionResponse {
    fn from(value: &PermissionDefinition) -> Self {
        Self {
            name: value.name.as_str().to_owned(),
            description: value.description.clone(),
            id: value.id.as_ref().map(|id| id.as_str().to_owned()),
        }
    }
}

/// Catalog and grants of one subject.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/subject-permissions-data.ts"
)]
pub struct SubjectPermissionsData {
    pub user: SubjectResponse,
    pub user_permissions: Vec<GrantedPermissionResponse>,
    pub permissions_by_module: BTreeMap<String, Vec<PermissionResponse>>,
}

/// Envelope of the permissions read endpoint.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/subject-permissions-response.ts"
)]
pub struct SubjectPermissionsResponse {
    pub success: bool,
    pub data: SubjectPermissionsData,
}

impl From<SubjectPermissions> for SubjectPermissionsResponse {
    fn from(value: SubjectPermissions) -> Self {
        let user_permissions = value
            .grants
            .iter()
            .map(|name| GrantedPermissionResponse {
                name: name.as_str().to_owned(),
                module: value
                    .catalog
                    .find(name)
                    .map(|definition| definition.module.as_str().to_owned()),
            })
            .collect();
        let permissions_by_module = value
            .catalog
            .modules()
            .map(|(module, definitions)| {
                (
                    module.as_str().to_owned(),
                    definitions.iter().map(PermissionResponse::from).collect(),
                )
            })
            .collect();

        Self {
            success: true,
            data: SubjectPermissionsData {
                user: SubjectResponse::from(value.subject),
                user_permissions,
                permissions_by_module,
            },
        }
    }
}
