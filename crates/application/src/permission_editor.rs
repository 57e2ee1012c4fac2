use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use grantdeck_core::{AppError, AppResult, SubjectId};
use grantdeck_domain::{
    Grant, GrantSet, ModuleCounter, ModuleKey, PermissionChange, PermissionName, SubjectProfile,
    ToggleBoard, ToggleEvent, ToggleState,
};

use crate::permission_list_renderer::{
    DisplayModel, SaveControl, render_board, render_fetch_failure, render_loading,
    render_module_counter, render_subject_header,
};
use crate::{
    Labels, MutationAck, Notification, NotificationSeverity, Notifier, PermissionCatalogFetcher,
    PermissionMutationClient, PermissionSnapshot,
};

/// Tunables of one editor instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    /// Bounded wait for one mutation before the failure path is forced.
    pub mutation_timeout: Duration,
    /// Delay between a successful batch save and closing.
    pub close_delay: Duration,
    /// Localized labels for rendering and notifications.
    pub labels: Labels,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            mutation_timeout: Duration::from_secs(10),
            close_delay: Duration::from_millis(1500),
            labels: Labels::default(),
        }
    }
}

/// Outbound ports used by the editor.
#[derive(Clone)]
pub struct EditorPorts {
    /// Catalog and grant reader.
    pub fetcher: Arc<dyn PermissionCatalogFetcher>,
    /// Grant/revoke client.
    pub mutations: Arc<dyn PermissionMutationClient>,
    /// Notification surface.
    pub notifier: Arc<dyn Notifier>,
}

/// Lifecycle phase of an editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorPhase {
    /// Catalog not loaded yet.
    Loading,
    /// Toggles are interactive.
    Ready,
    /// The last fetch failed; only a reload is accepted.
    FetchFailed,
    /// A batch was saved and the editor closes after the configured delay.
    Closing,
    /// Closed; every operation is rejected.
    Closed,
}

/// Result of a catalog fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Catalog and grants were loaded.
    Loaded {
        /// Number of modules.
        modules: usize,
        /// Number of permissions.
        permissions: usize,
    },
    /// The fetch failed and the error state is shown.
    Failed(AppError),
}

/// Result of an immediate-mode change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlipOutcome {
    /// The authority accepted the change.
    Committed {
        /// New committed grant.
        grant: Grant,
        /// Recomputed module counter.
        counter: ModuleCounter,
    },
    /// The change failed or timed out and the toggle was restored.
    RolledBack {
        /// Restored grant.
        grant: Grant,
        /// Recomputed module counter.
        counter: ModuleCounter,
        /// Failure cause.
        error: AppError,
    },
    /// The toggle carried a staged edit; it was dropped without a request.
    Unstaged {
        /// Committed grant the control returned to.
        grant: Grant,
        /// Recomputed module counter.
        counter: ModuleCounter,
    },
    /// The permission already had the requested grant.
    Unchanged {
        /// Current committed grant.
        grant: Grant,
    },
}

impl FlipOutcome {
    /// Returns false when the authority rejected the change.
    #[must_use]
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::RolledBack { .. })
    }
}

/// Result of a batch save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Every change was committed and the editor closed.
    Saved {
        /// Number of changes submitted.
        changes: usize,
    },
    /// The batch failed; staged edits are kept.
    Failed(AppError),
}

impl SaveOutcome {
    /// Returns true for [`SaveOutcome::Saved`].
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }
}

#[derive(Debug)]
struct Session {
    phase: EditorPhase,
    board: Option<ToggleBoard>,
    fetch_error: Option<AppError>,
    fetching: bool,
    saving: bool,
    profile: Option<SubjectProfile>,
}

struct EditorInner {
    subject: SubjectId,
    config: EditorConfig,
    ports: EditorPorts,
    session: Mutex<Session>,
}

/// Permission editor for one open subject.
///
/// The editor owns the toggle board. The session lock is only held for
/// synchronous state changes, never across a network call, so flips on
/// different permissions run concurrently. A second flip on the same
/// permission is rejected while the first is pending.
#[derive(Clone)]
pub struct PermissionEditor {
    inner: Arc<EditorInner>,
}

impl PermissionEditor {
    /// Creates an editor for `subject`. Nothing is fetched until [`Self::load`].
    ///
    /// The subject header appears once a load returns the subject's profile.
    #[must_use]
    pub fn new(subject: SubjectId, ports: EditorPorts, config: EditorConfig) -> Self {
        Self {
            inner: Arc::new(EditorInner {
                subject,
                config,
                ports,
                session: Mutex::new(Session {
                    phase: EditorPhase::Loading,
                    board: None,
                    fetch_error: None,
                    fetching: false,
                    saving: false,
                    profile: None,
                }),
            }),
        }
    }

    /// Subject being edited.
    #[must_use]
    pub fn subject(&self) -> &SubjectId {
        &self.inner.subject
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> EditorPhase {
        self.session().phase
    }

    /// Returns true while a batch save is in flight.
    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.session().saving
    }

    /// Fetches the catalog and grants and builds the board.
    ///
    /// A failed fetch is not an `Err`: the editor enters
    /// [`EditorPhase::FetchFailed`] and raises an error notification.
    pub async fn load(&self) -> AppResult<LoadOutcome> {
        {
            let mut session = self.session();
            ensure_open(&session)?;
            if session.fetching {
                return Err(AppError::Conflict(
                    "permissions are already being loaded".to_owned(),
                ));
            }
            ensure_idle(&session)?;
            session.fetching = true;
        }

        let mut guard = FetchGuard {
            inner: &self.inner,
            armed: true,
        };
        tracing::debug!(subject = %self.inner.subject, "fetching permissions");
        let result = self
            .inner
            .ports
            .fetcher
            .fetch_permissions(&self.inner.subject)
            .await;
        guard.armed = false;

        let mut session = self.session();
        session.fetching = false;
        if matches!(session.phase, EditorPhase::Closed | EditorPhase::Closing) {
            return Err(AppError::Conflict(
                "editor was closed while permissions were loading".to_owned(),
            ));
        }

        match result {
            Ok(PermissionSnapshot {
                catalog,
                grants,
                subject,
            }) => {
                let modules = catalog.modules().count();
                let permissions = catalog.len();
                session.board = Some(ToggleBoard::new(catalog, &grants));
                if let Some(profile) =
                    subject.filter(|profile| profile.id == self.inner.subject)
                {
                    session.profile = Some(profile);
                }
                session.fetch_error = None;
                session.phase = EditorPhase::Ready;
                tracing::info!(
                    subject = %self.inner.subject,
                    modules,
                    permissions,
                    "permissions loaded"
                );

                Ok(LoadOutcome::Loaded {
                    modules,
                    permissions,
                })
            }
            Err(error) => {
                tracing::warn!(subject = %self.inner.subject, error = %error, "permission fetch failed");
                session.board = None;
                session.fetch_error = Some(error.clone());
                session.phase = EditorPhase::FetchFailed;
                drop(session);

                let labels = &self.inner.config.labels;
                self.notify(
                    error
                        .user_message()
                        .unwrap_or(labels.error_loading_permissions),
                    NotificationSeverity::Error,
                );
                Ok(LoadOutcome::Failed(error))
            }
        }
    }

    /// Refetches after the initial load. Staged edits are discarded.
    pub async fn reload(&self) -> AppResult<LoadOutcome> {
        if self.phase() == EditorPhase::Loading {
            return Err(AppError::Conflict(
                "permissions have not been loaded yet".to_owned(),
            ));
        }

        self.load().await
    }

    /// Flips one toggle in immediate mode.
    ///
    /// A toggle with a staged edit is unstaged instead, without a request.
    pub async fn flip(&self, name: &PermissionName) -> AppResult<FlipOutcome> {
        let change = {
            let mut session = self.session();
            ensure_ready(&session)?;
            let board = loaded_board(&mut session)?;

            if board.slot(name)?.staged().is_some() {
                board.unstage(name)?;
                let slot = board.slot(name)?;
                let grant = slot.state().resolved();
                let counter = render_module_counter(board, slot.module());
                return Ok(FlipOutcome::Unstaged { grant, counter });
            }

            let ToggleState::Pending { target, .. } = board.apply(name, ToggleEvent::Flip)? else {
                return Err(AppError::Internal(format!(
                    "flip of '{name}' did not enter the pending state"
                )));
            };
            board.change_for(name, target)?
        };

        let mut guard = PendingFlipGuard {
            inner: &self.inner,
            name,
            armed: true,
        };
        tracing::debug!(
            subject = %self.inner.subject,
            permission = %name,
            action = change.action.as_str(),
            "submitting permission change"
        );
        let result = self.submit_single(&change).await;
        guard.armed = false;

        self.finish_flip(name, result)
    }

    /// Moves a permission to `grant` in immediate mode.
    ///
    /// Returns [`FlipOutcome::Unchanged`] without a request when the
    /// committed grant already matches.
    pub async fn set(&self, name: &PermissionName, grant: Grant) -> AppResult<FlipOutcome> {
        {
            let mut session = self.session();
            ensure_ready(&session)?;
            let board = loaded_board(&mut session)?;
            let slot = board.slot(name)?;
            if slot.state().is_pending() {
                return Err(AppError::Conflict(format!(
                    "permission '{name}' has a change in flight"
                )));
            }

            if slot.staged().is_some() {
                board.unstage(name)?;
            }
            if board.slot(name)?.state().resolved() == grant {
                return Ok(FlipOutcome::Unchanged { grant });
            }
        }

        self.flip(name).await
    }

    /// Moves a control locally for the next batch save.
    pub fn stage(&self, name: &PermissionName, grant: Grant) -> AppResult<()> {
        let mut session = self.session();
        ensure_ready(&session)?;
        loaded_board(&mut session)?.stage(name, grant)
    }

    /// Submits every control position as one batch.
    ///
    /// On success all toggles commit, staged edits clear, and the editor
    /// closes after the configured delay. On failure nothing reverts.
    pub async fn save(&self) -> AppResult<SaveOutcome> {
        let changes = {
            let mut session = self.session();
            ensure_ready(&session)?;
            let board = loaded_board(&mut session)?;
            if board.has_pending() {
                return Err(AppError::Conflict(
                    "cannot save while a permission change is in flight".to_owned(),
                ));
            }

            let changes = board.snapshot_changes();
            session.saving = true;
            changes
        };

        let mut guard = SaveGuard {
            inner: &self.inner,
            armed: true,
        };
        tracing::debug!(
            subject = %self.inner.subject,
            changes = changes.len(),
            "submitting permission batch"
        );
        let labels = &self.inner.config.labels;
        let result = self
            .bounded(
                "batch save",
                self.inner
                    .ports
                    .mutations
                    .mutate_batch(&self.inner.subject, &changes),
            )
            .await;
        guard.armed = false;

        let committed = {
            let mut session = self.session();
            session.saving = false;
            match result {
                Ok(_) => {
                    let applied = loaded_board(&mut session)
                        .and_then(|board| board.commit_changes(&changes));
                    if let Err(error) = applied {
                        drop(session);
                        tracing::warn!(
                            subject = %self.inner.subject,
                            error = %error,
                            "saved permission batch could not be applied locally"
                        );
                        self.notify(labels.permissions_save_failed, NotificationSeverity::Error);
                        return Err(error);
                    }
                    if session.phase == EditorPhase::Ready {
                        session.phase = EditorPhase::Closing;
                    }
                    Ok(())
                }
                Err(error) => Err(error),
            }
        };

        match committed {
            Ok(()) => {
                tracing::info!(
                    subject = %self.inner.subject,
                    changes = changes.len(),
                    "permission batch saved"
                );
                self.notify(labels.permissions_saved, NotificationSeverity::Success);

                tokio::time::sleep(self.inner.config.close_delay).await;
                let mut session = self.session();
                if session.phase == EditorPhase::Closing {
                    session.phase = EditorPhase::Closed;
                }

                Ok(SaveOutcome::Saved {
                    changes: changes.len(),
                })
            }
            Err(error) => {
                tracing::warn!(subject = %self.inner.subject, error = %error, "permission batch failed");
                self.notify(
                    error.user_message().unwrap_or(labels.permissions_save_failed),
                    NotificationSeverity::Error,
                );
                Ok(SaveOutcome::Failed(error))
            }
        }
    }

    /// Closes the editor. Later operations are rejected.
    pub fn close(&self) {
        let mut session = self.session();
        if session.phase != EditorPhase::Closed {
            tracing::debug!(subject = %self.inner.subject, "editor closed");
            session.phase = EditorPhase::Closed;
        }
    }

    /// Renders the current state.
    #[must_use]
    pub fn display(&self) -> DisplayModel {
        let labels = &self.inner.config.labels;
        let session = self.session();
        let interactive =
            session.phase == EditorPhase::Ready && !session.saving && !session.fetching;

        let body = match (&session.board, &session.fetch_error) {
            (Some(board), _) => render_board(board, labels, interactive),
            (None, Some(error)) => render_fetch_failure(error, labels),
            (None, None) => render_loading(labels),
        };
        let can_save = interactive
            && session
                .board
                .as_ref()
                .is_some_and(|board| !board.has_pending());

        DisplayModel {
            header: session
                .profile
                .as_ref()
                .map(|profile| render_subject_header(profile, labels)),
            body,
            save_control: SaveControl::new(labels, can_save, session.saving),
        }
    }

    /// Recomputes one module's counter.
    pub fn counter(&self, module: &ModuleKey) -> AppResult<ModuleCounter> {
        let session = self.session();
        let board = session
            .board
            .as_ref()
            .ok_or_else(|| AppError::Conflict("permissions are not loaded".to_owned()))?;
        if board.catalog().module(module).is_none() {
            return Err(AppError::NotFound(format!("module '{module}' is not in the catalog")));
        }

        Ok(render_module_counter(board, module))
    }

    /// Grants last confirmed by the authority, once loaded.
    #[must_use]
    pub fn committed_grants(&self) -> Option<GrantSet> {
        self.session()
            .board
            .as_ref()
            .map(ToggleBoard::committed_grants)
    }

    fn finish_flip(
        &self,
        name: &PermissionName,
        result: AppResult<MutationAck>,
    ) -> AppResult<FlipOutcome> {
        match self.settle_flip(name, result) {
            Ok((outcome, notification)) => {
                self.inner.ports.notifier.notify(notification);
                Ok(outcome)
            }
            Err(error) => {
                tracing::warn!(
                    subject = %self.inner.subject,
                    permission = %name,
                    error = %error,
                    "permission change could not be settled"
                );
                self.notify(
                    self.inner.config.labels.permission_update_failed,
                    NotificationSeverity::Error,
                );
                Err(error)
            }
        }
    }

    fn settle_flip(
        &self,
        name: &PermissionName,
        result: AppResult<MutationAck>,
    ) -> AppResult<(FlipOutcome, Notification)> {
        let labels = &self.inner.config.labels;
        let mut session = self.session();
        let board = loaded_board(&mut session)?;
        Ok(match result {
            Ok(ack) => {
                let state = board.apply(name, ToggleEvent::Confirm)?;
                let counter = render_module_counter(board, board.slot(name)?.module());
                tracing::info!(
                    subject = %self.inner.subject,
                    permission = %name,
                    counter = %counter,
                    "permission change committed"
                );
                let message = ack
                    .message
                    .filter(|message| !message.trim().is_empty())
                    .unwrap_or_else(|| labels.permission_updated.to_owned());

                (
                    FlipOutcome::Committed {
                        grant: state.resolved(),
                        counter,
                    },
                    Notification::new(message, NotificationSeverity::Success),
                )
            }
            Err(error) => {
                board.apply(name, ToggleEvent::Reject)?;
                let state = board.apply(name, ToggleEvent::Settle)?;
                let counter = render_module_counter(board, board.slot(name)?.module());
                tracing::warn!(
                    subject = %self.inner.subject,
                    permission = %name,
                    error = %error,
                    "permission change rolled back"
                );
                let message = error
                    .user_message()
                    .unwrap_or(labels.permission_update_failed)
                    .to_owned();

                (
                    FlipOutcome::RolledBack {
                        grant: state.resolved(),
                        counter,
                        error,
                    },
                    Notification::new(message, NotificationSeverity::Error),
                )
            }
        })
    }

    async fn submit_single(&self, change: &PermissionChange) -> AppResult<MutationAck> {
        self.bounded(
            "permission change",
            self.inner
                .ports
                .mutations
                .mutate_single(&self.inner.subject, change),
        )
        .await
    }

    async fn bounded<T>(
        &self,
        operation: &str,
        call: impl Future<Output = AppResult<T>>,
    ) -> AppResult<T> {
        let limit = self.inner.config.mutation_timeout;
        tokio::time::timeout(limit, call).await.unwrap_or_else(|_| {
            Err(AppError::Timeout(format!(
                "{operation} did not complete within {} ms",
                limit.as_millis()
            )))
        })
    }

    fn notify(&self, message: &str, severity: NotificationSeverity) {
        self.inner
            .ports
            .notifier
            .notify(Notification::new(message, severity));
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.inner.lock_session()
    }
}

impl EditorInner {
    fn lock_session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn ensure_open(session: &Session) -> AppResult<()> {
    match session.phase {
        EditorPhase::Closed | EditorPhase::Closing => {
            Err(AppError::Conflict("editor is closed".to_owned()))
        }
        _ => Ok(()),
    }
}

fn ensure_idle(session: &Session) -> AppResult<()> {
    if session.saving {
        return Err(AppError::Conflict("a batch save is in flight".to_owned()));
    }
    if session.board.as_ref().is_some_and(ToggleBoard::has_pending) {
        return Err(AppError::Conflict(
            "a permission change is in flight".to_owned(),
        ));
    }

    Ok(())
}

fn ensure_ready(session: &Session) -> AppResult<()> {
    ensure_open(session)?;
    if session.fetching {
        return Err(AppError::Conflict(
            "permissions are being reloaded".to_owned(),
        ));
    }
    match session.phase {
        EditorPhase::Ready if session.saving => {
            Err(AppError::Conflict("a batch save is in flight".to_owned()))
        }
        EditorPhase::Ready => Ok(()),
        EditorPhase::Loading => Err(AppError::Conflict(
            "permissions are not loaded yet".to_owned(),
        )),
        _ => Err(AppError::Conflict(
            "permissions failed to load; reload first".to_owned(),
        )),
    }
}

fn loaded_board(session: &mut Session) -> AppResult<&mut ToggleBoard> {
    session
        .board
        .as_mut()
        .ok_or_else(|| AppError::Conflict("permissions are not loaded".to_owned()))
}

/// Rolls a pending toggle back if its flip future is dropped mid-flight.
struct PendingFlipGuard<'a> {
    inner: &'a EditorInner,
    name: &'a PermissionName,
    armed: bool,
}

impl Drop for PendingFlipGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let mut session = self.inner.lock_session();
        if let Some(board) = session.board.as_mut()
            && board.apply(self.name, ToggleEvent::Reject).is_ok()
        {
            let _ = board.apply(self.name, ToggleEvent::Settle);
            tracing::debug!(permission = %self.name, "cancelled permission change rolled back");
        }
    }
}

struct SaveGuard<'a> {
    inner: &'a EditorInner,
    armed: bool,
}

impl Drop for SaveGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.inner.lock_session().saving = false;
        }
    }
}

struct FetchGuard<'a> {
    inner: &'a EditorInner,
    armed: bool,
}

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.inner.lock_session().fetching = false;
        }
    }
}

#[cfg(test)]
mod tests;
