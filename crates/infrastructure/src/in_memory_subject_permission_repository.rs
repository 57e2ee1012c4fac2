use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use grantdeck_application::SubjectPermissionRepository;
use grantdeck_core::{AppError, AppResult, SubjectId};
use grantdeck_domain::{
    Grant, GrantSet, PermissionCatalog, PermissionChange, PermissionName, SubjectProfile,
};
use tokio::sync::RwLock;

mod seed;

pub use seed::{default_permission_catalog, demo_subjects};

/// In-memory subject grant store used by the reference authority.
#[derive(Debug)]
pub struct InMemorySubjectPermissionRepository {
    catalog: PermissionCatalog,
    subjects: RwLock<BTreeMap<String, SubjectProfile>>,
    grants: RwLock<HashMap<SubjectId, GrantSet>>,
}

impl InMemorySubjectPermissionRepository {
    /// Creates a repository with a catalog and no subjects.
    #[must_use]
    pub fn new(catalog: PermissionCatalog) -> Self {
        Self {
            catalog,
            subjects: RwLock::new(BTreeMap::new()),
            grants: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a repository with the default catalog and demo subjects.
    pub fn seeded() -> AppResult<Self> {
        let mut subjects = BTreeMap::new();
        let mut grants = HashMap::new();
        for (profile, held) in demo_subjects()? {
            grants.insert(profile.id.clone(), held);
            subjects.insert(profile.id.as_str().to_owned(), profile);
        }

        Ok(Self {
            catalog: default_permission_catalog()?,
            subjects: RwLock::new(subjects),
            grants: RwLock::new(grants),
        })
    }

    /// Adds or replaces a subject with its grants.
    pub async fn insert_subject(&self, profile: SubjectProfile, grants: GrantSet) {
        self.grants.write().await.insert(profile.id.clone(), grants);
        self.subjects
            .write()
            .await
            .insert(profile.id.as_str().to_owned(), profile);
    }

    fn require_known(&self, permission: &PermissionName) -> AppResult<()> {
        if self.catalog.find(permission).is_none() {
            return Err(AppError::NotFound(format!(
                "Permission '{permission}' not found"
            )));
        }

        Ok(())
    }

    async fn require_subject(&self, subject: &SubjectId) -> AppResult<()> {
        if !self.subjects.read().await.contains_key(subject.as_str()) {
            return Err(AppError::NotFound("User not found".to_owned()));
        }

        Ok(())
    }
}

#[async_trait]
impl SubjectPermissionRepository for InMemorySubjectPermissionRepository {
    async fn catalog(&self) -> AppResult<PermissionCatalog> {
        Ok(self.catalog.clone())
    }

    async fn find_subject(&self, subject: &SubjectId) -> AppResult<Option<SubjectProfile>> {
        Ok(self.subjects.read().await.get(subject.as_str()).cloned())
    }

    async fn list_subjects(&self) -> AppResult<Vec<SubjectProfile>> {
        Ok(self.subjects.read().await.values().cloned().collect())
    }

    async fn list_grants(&self, subject: &SubjectId) -> AppResult<GrantSet> {
        self.require_subject(subject).await?;
        Ok(self
            .grants
            .read()
            .await
            .get(subject)
            .cloned()
            .unwrap_or_default())
    }

    async fn assign(&self, subject: &SubjectId, permission: &PermissionName) -> AppResult<()> {
        self.require_subject(subject).await?;
        self.require_known(permission)?;

        self.grants
            .write()
            .await
            .entry(subject.clone())
            .or_default()
            .set(permission.clone(), Grant::Granted);
        Ok(())
    }

    async fn revoke(&self, subject: &SubjectId, permission: &PermissionName) -> AppResult<()> {
        self.require_subject(subject).await?;
        self.require_known(permission)?;

        if let Some(held) = self.grants.write().await.get_mut(subject) {
            held.set(permission.clone(), Grant::Revoked);
        }
        Ok(())
    }

    async fn apply_batch(
        &self,
        subject: &SubjectId,
        changes: &[PermissionChange],
    ) -> AppResult<()> {
        self.require_subject(subject).await?;
        for change in changes {
            self.require_known(&change.permission_name)?;
        }

        let mut grants = self.grants.write().await;
        let held = grants.entry(subject.clone()).or_default();
        for change in changes {
            held.set(change.permission_name.clone(), change.action.target());
        }

        Ok(())
    }
}
