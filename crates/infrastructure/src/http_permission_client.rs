use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use grantdeck_application::{
    AntiForgeryTokenSource, MutationAck, PermissionCatalogFetcher, PermissionMutationClient,
    PermissionSnapshot,
};
use grantdeck_core::{ANTI_FORGERY_HEADER, AppError, AppResult, SubjectId};
use grantdeck_domain::{
    GrantSet, ModuleKey, PermissionCatalog, PermissionChange, PermissionDefinition, PermissionId,
    PermissionName, SubjectProfile,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// HTTP adapter for the permission authority endpoints.
///
/// Requests are sent once; retries are left to the operator.
pub struct HttpPermissionClient {
    http_client: reqwest::Client,
    base_url: Url,
    token_source: Arc<dyn AntiForgeryTokenSource>,
}

impl HttpPermissionClient {
    /// Creates a client rooted at `base_url`.
    #[must_use]
    pub fn new(
        http_client: reqwest::Client,
        mut base_url: Url,
        token_source: Arc<dyn AntiForgeryTokenSource>,
    ) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            http_client,
            base_url,
            token_source,
        }
    }

    fn endpoint(&self, subject: &SubjectId, suffix: Option<&str>) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| {
                AppError::Validation(format!(
                    "base URL '{}' cannot carry a path",
                    self.base_url
                ))
            })?;
            segments
                .pop_if_empty()
                .extend(["api", "user_permissions", subject.as_str()]);
            if let Some(suffix) = suffix {
                segments.push(suffix);
            }
        }

        Ok(url)
    }

    async fn post<B>(&self, url: Url, body: &B) -> AppResult<Envelope<Value>>
    where
        B: Serialize + Sync,
    {
        let mut request = self.http_client.post(url.clone()).json(body);
        match self.token_source.anti_forgery_token().await? {
            Some(token) => request = request.header(ANTI_FORGERY_HEADER, token.as_str()),
            None => tracing::warn!(url = %url, "posting without an anti-forgery token"),
        }

        read_envelope(request.send().await).await
    }
}

#[async_trait]
impl PermissionCatalogFetcher for HttpPermissionClient {
    async fn fetch_permissions(&self, subject: &SubjectId) -> AppResult<PermissionSnapshot> {
        let url = self.endpoint(subject, None)?;
        tracing::debug!(subject = %subject, url = %url, "fetching subject permissions");

        let envelope: Envelope<PermissionsData> =
            read_envelope(self.http_client.get(url).send().await).await?;
        let data = envelope.data.ok_or_else(|| {
            AppError::Network("permission response carried no data".to_owned())
        })?;

        data.into_snapshot(subject)
    }
}

#[async_trait]
impl PermissionMutationClient for HttpPermissionClient {
    async fn mutate_single(
        &self,
        subject: &SubjectId,
        change: &PermissionChange,
    ) -> AppResult<MutationAck> {
        let url = self.endpoint(subject, Some(change.action.as_str()))?;
        let body = SingleChangeBody {
            permission_name: change.permission_name.as_str(),
            permission_id: wire_id(change),
        };

        let envelope = self.post(url, &body).await?;
        Ok(MutationAck {
            message: envelope.message,
        })
    }

    async fn mutate_batch(
        &self,
        subject: &SubjectId,
        changes: &[PermissionChange],
    ) -> AppResult<MutationAck> {
        let url = self.endpoint(subject, Some("batch"))?;
        let body = BatchBody {
            changes: changes
                .iter()
                .map(|change| BatchChangeBody {
                    permission_name: change.permission_name.as_str(),
                    permission_id: wire_id(change),
                    action: change.action.as_str(),
                })
                .collect(),
        };

        let envelope = self.post(url, &body).await?;
        Ok(MutationAck {
            message: envelope.message,
        })
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    message: Option<String>,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct PermissionsData {
    #[serde(default)]
    user: Option<WireSubject>,
    #[serde(default)]
    user_permissions: Vec<WireGrant>,
    #[serde(default)]
    permissions_by_module: BTreeMap<String, Vec<WirePermission>>,
}

#[derive(Debug, Deserialize)]
struct WireSubject {
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
    first_name: Option<String>,
    last_name: Option<String>,
    full_name: Option<String>,
    display_name: Option<String>,
    is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireGrant {
    Named { name: String },
    Bare(String),
}

#[derive(Debug, Deserialize)]
struct WirePermission {
    name: String,
    #[serde(default)]
    description: String,
    id: Option<Value>,
}

#[derive(Serialize)]
struct SingleChangeBody<'a> {
    permission_name: &'a str,
    permission_id: &'a str,
}

#[derive(Serialize)]
struct BatchBody<'a> {
    changes: Vec<BatchChangeBody<'a>>,
}

#[derive(Serialize)]
struct BatchChangeBody<'a> {
    permission_name: &'a str,
    permission_id: &'a str,
    action: &'static str,
}

impl PermissionsData {
    fn into_snapshot(self, subject: &SubjectId) -> AppResult<PermissionSnapshot> {
        let mut definitions = Vec::new();
        for (module, permissions) in self.permissions_by_module {
            let module = ModuleKey::new(module).map_err(malformed)?;
            for permission in permissions {
                definitions.push(PermissionDefinition {
                    name: PermissionName::new(permission.name).map_err(malformed)?,
                    description: permission.description,
                    id: permission.id.and_then(id_from_value),
                    module: module.clone(),
                });
            }
        }

        let grants = self
            .user_permissions
            .into_iter()
            .map(|grant| match grant {
                WireGrant::Named { name } | WireGrant::Bare(name) => PermissionName::new(name),
            })
            .collect::<AppResult<GrantSet>>()
            .map_err(malformed)?;

        Ok(PermissionSnapshot {
            catalog: PermissionCatalog::new(definitions).map_err(malformed)?,
            grants,
            subject: self.user.map(|user| user.into_profile(subject.clone())),
        })
    }
}

impl WireSubject {
    fn into_profile(self, id: SubjectId) -> SubjectProfile {
        SubjectProfile {
            id,
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            full_name: self.full_name.or(self.display_name),
            is_active: self.is_active.unwrap_or(true),
        }
    }
}

fn wire_id(change: &PermissionChange) -> &str {
    change
        .permission_id
        .as_ref()
        .map_or("", PermissionId::as_str)
}

fn id_from_value(value: Value) -> Option<PermissionId> {
    match value {
        Value::Number(number) => PermissionId::parse(number.to_string()),
        Value::String(text) => PermissionId::parse(text),
        _ => None,
    }
}

fn malformed(error: AppError) -> AppError {
    AppError::Network(format!("malformed permission response: {error}"))
}

async fn read_envelope<T>(
    response: Result<reqwest::Response, reqwest::Error>,
) -> AppResult<Envelope<T>>
where
    T: DeserializeOwned,
{
    let response = response.map_err(transport_error)?;
    let status = response.status();
    let body = response.bytes().await.map_err(transport_error)?;

    let envelope: Envelope<T> = serde_json::from_slice(&body).map_err(|error| {
        AppError::Network(format!(
            "unreadable response body with status {status}: {error}"
        ))
    })?;

    if envelope.success && status.is_success() {
        return Ok(envelope);
    }

    let message = envelope.message.unwrap_or_default();
    tracing::debug!(status = %status, message = %message, "authority reported failure");
    Err(match status {
        reqwest::StatusCode::NOT_FOUND => AppError::NotFound(message),
        reqwest::StatusCode::FORBIDDEN => AppError::Forbidden(message),
        _ => AppError::Server(message),
    })
}

fn transport_error(error: reqwest::Error) -> AppError {
    if error.is_timeout() {
        AppError::Timeout(format!("permission authority request timed out: {error}"))
    } else {
        AppError::Network(format!("permission authority request failed: {error}"))
    }
}
