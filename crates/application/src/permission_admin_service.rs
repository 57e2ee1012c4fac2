use std::sync::Arc;

use async_trait::async_trait;

use grantdeck_core::{AppError, AppResult, SubjectId};
use grantdeck_domain::{
    GrantAction, GrantSet, PermissionCatalog, PermissionChange, PermissionDefinition,
    PermissionName, SubjectProfile,
};

/// Repository port for subject grants held by the authority.
#[async_trait]
pub trait SubjectPermissionRepository: Send + Sync {
    /// Returns the full permission catalog.
    async fn catalog(&self) -> AppResult<PermissionCatalog>;

    /// Finds a subject profile.
    async fn find_subject(&self, subject: &SubjectId) -> AppResult<Option<SubjectProfile>>;

    /// Lists every subject profile.
    async fn list_subjects(&self) -> AppResult<Vec<SubjectProfile>>;

    /// Returns the permissions granted to a subject.
    async fn list_grants(&self, subject: &SubjectId) -> AppResult<GrantSet>;

    /// Grants one permission. Granting a held permission is a no-op.
    async fn assign(&self, subject: &SubjectId, permission: &PermissionName) -> AppResult<()>;

    /// Removes one permission. Removing an absent grant is a no-op.
    async fn revoke(&self, subject: &SubjectId, permission: &PermissionName) -> AppResult<()>;

    /// Applies every change or none of them.
    async fn apply_batch(&self, subject: &SubjectId, changes: &[PermissionChange])
    -> AppResult<()>;
}

/// Catalog and grants of one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectPermissions {
    /// Subject profile.
    pub subject: SubjectProfile,
    /// Full permission catalog.
    pub catalog: PermissionCatalog,
    /// Permissions held by the subject.
    pub grants: GrantSet,
}

/// Counts of an applied batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchOutcome {
    /// Changes with the assign action.
    pub assigned: usize,
    /// Changes with the revoke action.
    pub revoked: usize,
}

/// Application service behind the reference authority endpoints.
#[derive(Clone)]
pub struct PermissionAdminService {
    repository: Arc<dyn SubjectPermissionRepository>,
}

impl PermissionAdminService {
    /// Creates a new service from required dependencies.
    #[must_use]
    pub fn new(repository: Arc<dyn SubjectPermissionRepository>) -> Self {
        Self { repository }
    }

    /// Lists every subject.
    pub async fn list_subjects(&self) -> AppResult<Vec<SubjectProfile>> {
        self.repository.list_subjects().await
    }

    /// Returns the catalog and the grants of a subject.
    pub async fn subject_permissions(&self, subject: &SubjectId) -> AppResult<SubjectPermissions> {
        let profile = self.require_subject(subject).await?;
        let catalog = self.repository.catalog().await?;
        let grants = self.repository.list_grants(subject).await?;

        Ok(SubjectPermissions {
            subject: profile,
            catalog,
            grants,
        })
    }

    /// Applies one assign or revoke.
    pub async fn apply_change(&self, subject: &SubjectId, change: &PermissionChange) -> AppResult<()> {
        self.require_subject(subject).await?;
        let catalog = self.repository.catalog().await?;
        validate_change(&catalog, change)?;

        match change.action {
            GrantAction::Assign => {
                self.repository
                    .assign(subject, &change.permission_name)
                    .await?
            }
            GrantAction::Revoke => {
                self.repository
                    .revoke(subject, &change.permission_name)
                    .await?
            }
        }

        tracing::info!(
            subject = %subject,
            permission = %change.permission_name,
            action = change.action.as_str(),
            "permission change applied"
        );
        Ok(())
    }

    /// Validates every change, then applies the batch atomically.
    pub async fn apply_batch(
        &self,
        subject: &SubjectId,
        changes: &[PermissionChange],
    ) -> AppResult<BatchOutcome> {
        self.require_subject(subject).await?;
        let catalog = self.repository.catalog().await?;
        for change in changes {
            validate_change(&catalog, change)?;
        }

        self.repository.apply_batch(subject, changes).await?;

        let outcome = changes
            .iter()
            .fold(BatchOutcome::default(), |mut outcome, change| {
                match change.action {
                    GrantAction::Assign => outcome.assigned += 1,
                    GrantAction::Revoke => outcome.revoked += 1,
                }
                outcome
            });
        tracing::info!(
            subject = %subject,
            assigned = outcome.assigned,
            revoked = outcome.revoked,
            "permission batch applied"
        );

        Ok(outcome)
    }

    async fn require_subject(&self, subject: &SubjectId) -> AppResult<SubjectProfile> {
        self.repository
            .find_subject(subject)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_owned()))
    }
}

fn validate_change<'a>(
    catalog: &'a PermissionCatalog,
    change: &PermissionChange,
) -> AppResult<&'a PermissionDefinition> {
    let definition = catalog.find(&change.permission_name).ok_or_else(|| {
        AppError::NotFound(format!("Permission '{}' not found", change.permission_name))
    })?;

    if let Some(sent) = &change.permission_id
        && definition.id.as_ref() != Some(sent)
    {
        return Err(AppError::Validation(format!(
            "permission id '{}' does not match permission '{}'",
            sent.as_str(),
            change.permission_name
        )));
    }

    Ok(definition)
}
