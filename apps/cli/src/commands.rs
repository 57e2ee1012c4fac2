use std::sync::Arc;

use grantdeck_application::{
    AntiForgeryTokenSource, EditorConfig, EditorPorts, FlipOutcome, Labels, LoadOutcome,
    Notification, NotificationSeverity, PermissionEditor, SaveOutcome,
};
use grantdeck_core::{AppError, AppResult, SubjectId};
use grantdeck_domain::{Grant, PermissionName};
use grantdeck_infrastructure::{
    HttpPermissionClient, InMemoryNotificationCenter, PageMarkupTokenSource,
    StaticAntiForgeryToken,
};

use crate::cli_args::{Command, GrantdeckCli};
use crate::client_config::ClientConfig;
use crate::console_notifier::ConsoleNotifier;
use crate::display_text::render_text;

/// Runs one command. Returns whether its last operation succeeded.
pub async fn run(cli: GrantdeckCli) -> AppResult<bool> {
    let config = ClientConfig::load()?.with_overrides(&cli.global)?;
    let session = CliSession::connect(&config)?;

    match cli.command {
        Command::Show { subject, json } => session.show(&subject, json).await,
        Command::Grant {
            subject,
            permission,
        } => session.set_one(&subject, &permission, Grant::Granted).await,
        Command::Revoke {
            subject,
            permission,
        } => session.set_one(&subject, &permission, Grant::Revoked).await,
        Command::Apply {
            subject,
            grants,
            revokes,
        } => session.apply(&subject, &grants, &revokes).await,
    }
}

struct CliSession {
    ports: EditorPorts,
    editor_config: EditorConfig,
}

impl CliSession {
    fn connect(config: &ClientConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

        let token_source: Arc<dyn AntiForgeryTokenSource> = match &config.csrf_page_url {
            Some(page_url) => Arc::new(PageMarkupTokenSource::new(
                http_client.clone(),
                page_url.clone(),
            )?),
            None => Arc::new(StaticAntiForgeryToken::new(config.csrf_token.clone())),
        };
        let permission_client = Arc::new(HttpPermissionClient::new(
            http_client,
            config.api_base_url.clone(),
            token_source,
        ));
        let center = Arc::new(InMemoryNotificationCenter::new(config.notification_ttl));

        Ok(Self {
            ports: EditorPorts {
                fetcher: permission_client.clone(),
                mutations: permission_client,
                notifier: Arc::new(ConsoleNotifier::new(center)),
            },
            editor_config: EditorConfig {
                mutation_timeout: config.mutation_timeout,
                close_delay: config.close_delay,
                labels: Labels::for_locale(config.locale),
            },
        })
    }

    fn editor(&self, subject: &str) -> AppResult<PermissionEditor> {
        Ok(PermissionEditor::new(
            SubjectId::parse(subject)?,
            self.ports.clone(),
            self.editor_config.clone(),
        ))
    }

    /// Opens an editor and loads the subject's permissions.
    async fn open(&self, subject: &str) -> AppResult<Option<PermissionEditor>> {
        let editor = self.editor(subject)?;
        match editor.load().await? {
            LoadOutcome::Loaded { .. } => Ok(Some(editor)),
            LoadOutcome::Failed(_) => Ok(None),
        }
    }

    async fn show(&self, subject: &str, json: bool) -> AppResult<bool> {
        let editor = self.editor(subject)?;
        let loaded = matches!(editor.load().await?, LoadOutcome::Loaded { .. });

        let model = editor.display();
        if json {
            let rendered = serde_json::to_string_pretty(&model).map_err(|error| {
                AppError::Internal(format!("failed to serialize display model: {error}"))
            })?;
            println!("{rendered}");
        } else {
            print!("{}", render_text(&model));
        }

        Ok(loaded)
    }

    async fn set_one(&self, subject: &str, permission: &str, grant: Grant) -> AppResult<bool> {
        let Some(editor) = self.open(subject).await? else {
            return Ok(false);
        };
        let name = PermissionName::new(permission)?;
        let labels = &self.editor_config.labels;

        match editor.set(&name, grant).await? {
            FlipOutcome::Committed { grant, counter } | FlipOutcome::Unstaged { grant, counter } => {
                println!("{name}: {} ({counter})", grant_label(grant, labels));
                Ok(true)
            }
            FlipOutcome::Unchanged { grant } => {
                self.ports.notifier.notify(Notification::new(
                    format!("{name}: {}", grant_label(grant, labels)),
                    NotificationSeverity::Info,
                ));
                Ok(true)
            }
            FlipOutcome::RolledBack { .. } => Ok(false),
        }
    }

    async fn apply(&self, subject: &str, grants: &[String], revokes: &[String]) -> AppResult<bool> {
        if grants.is_empty() && revokes.is_empty() {
            return Err(AppError::Validation(
                "apply needs at least one --grant or --revoke".to_owned(),
            ));
        }
        let Some(editor) = self.open(subject).await? else {
            return Ok(false);
        };

        let staged = grants
            .iter()
            .map(|name| (name, Grant::Granted))
            .chain(revokes.iter().map(|name| (name, Grant::Revoked)));
        for (name, grant) in staged {
            editor.stage(&PermissionName::new(name.as_str())?, grant)?;
        }

        match editor.save().await? {
            SaveOutcome::Saved { changes } => {
                println!("{changes} permissions submitted");
                Ok(true)
            }
            SaveOutcome::Failed(_) => Ok(false),
        }
    }
}

fn grant_label(grant: Grant, labels: &Labels) -> &'static str {
    match grant {
        Grant::Granted => labels.active,
        Grant::Revoked => labels.inactive,
    }
}
