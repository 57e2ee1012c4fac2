use axum::Json;
use axum::extract::{Path, State};
use grantdeck_core::SubjectId;
use grantdeck_domain::GrantAction;

use crate::dto::{
    BatchRequest, MutationResponse, SingleChangeRequest, SubjectListResponse,
    SubjectPermissionsResponse, SubjectResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_subjects_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<SubjectListResponse>> {
    let subjects = state.permission_admin_service.list_subjects().await?;

    Ok(Json(SubjectListResponse {
        success: true,
        data: subjects.into_iter().map(SubjectResponse::from).collect(),
    }))
}

pub async fn subject_permissions_handler(
    State(state): State<AppState>,
    Path(subject_id): Path<String>,
) -> ApiResult<Json<SubjectPermissionsResponse>> {
    let subject = SubjectId::new(subject_id)?;
    let permissions = state
        .permission_admin_service
        .subject_permissions(&subject)
        .await?;

    Ok(Json(SubjectPermissionsResponse::from(permissions)))
}

pub async fn change_permission_handler(
    State(state): State<AppState>,
    Path((subject_id, action)): Path<(String, String)>,
    Json(payload): Json<SingleChangeRequest>,
) -> ApiResult<Json<MutationResponse>> {
    let subject = SubjectId::new(subject_id)?;
    let action = action.parse::<GrantAction>()?;
    let change = payload.into_change(action)?;

    state
        .permission_admin_service
        .apply_change(&subject, &change)
        .await?;

    let message = match action {
        GrantAction::Assign => "Permission assigned successfully",
        GrantAction::Revoke => "Permission revoked successfully",
    };
    Ok(Json(MutationResponse::ok(message)))
}

pub async fn batch_permissions_handler(
    State(state): State<AppState>,
    Path(subject_id): Path<String>,
    Json(payload): Json<BatchRequest>,
) -> ApiResult<Json<MutationResponse>> {
    let subject = SubjectId::new(subject_id)?;
    let changes = payload.into_changes()?;

    let outcome = state
        .permission_admin_service
        .apply_batch(&subject, &changes)
        .await?;

    Ok(Json(MutationResponse::ok(format!(
        "Permissions updated successfully ({} assigned, {} revoked)",
        outcome.assigned, outcome.revoked
    ))))
}
