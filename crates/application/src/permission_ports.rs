use async_trait::async_trait;
use grantdeck_core::{AntiForgeryToken, AppResult, SubjectId};
use grantdeck_domain::{GrantSet, PermissionCatalog, PermissionChange, SubjectProfile};
use serde::Serialize;

/// Catalog and grant set of one subject as returned by the authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionSnapshot {
    /// Every permission the authority knows, grouped by module.
    pub catalog: PermissionCatalog,
    /// Names currently granted to the subject.
    pub grants: GrantSet,
    /// Subject profile, when the authority sends one.
    pub subject: Option<SubjectProfile>,
}

/// Positive acknowledgement of a mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationAck {
    /// Optional confirmation text supplied by the authority.
    pub message: Option<String>,
}

/// Port for reading a subject's permission catalog and grants.
#[async_trait]
pub trait PermissionCatalogFetcher: Send + Sync {
    /// Fetches the catalog and the subject's grant set.
    async fn fetch_permissions(&self, subject: &SubjectId) -> AppResult<PermissionSnapshot>;
}

/// Port for grant/revoke calls against the authority.
///
/// Implementations must not retry; failures go straight back to the editor.
#[async_trait]
pub trait PermissionMutationClient: Send + Sync {
    /// Assigns or revokes one permission.
    async fn mutate_single(
        &self,
        subject: &SubjectId,
        change: &PermissionChange,
    ) -> AppResult<MutationAck>;

    /// Submits a full set of changes as one all-or-nothing request.
    async fn mutate_batch(
        &self,
        subject: &SubjectId,
        changes: &[PermissionChange],
    ) -> AppResult<MutationAck>;
}

/// Port supplying the anti-forgery token for mutating requests.
#[async_trait]
pub trait AntiForgeryTokenSource: Send + Sync {
    /// Returns the current token, if the page exposes one.
    async fn anti_forgery_token(&self) -> AppResult<Option<AntiForgeryToken>>;
}

/// Severity of an operator notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationSeverity {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Error,
    /// Neutral information.
    Info,
}

impl NotificationSeverity {
    /// Returns a stable label.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

/// Message raised for the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Text shown to the operator.
    pub message: String,
    /// Severity controlling presentation.
    pub severity: NotificationSeverity,
}

impl Notification {
    /// Creates a notification.
    #[must_use]
    pub fn new(message: impl Into<String>, severity: NotificationSeverity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

/// Fire-and-forget notification surface.
///
/// Implementations must neither block nor fail.
pub trait Notifier: Send + Sync {
    /// Raises one notification.
    fn notify(&self, notification: Notification);
}
