use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Mutex, Semaphore};

use grantdeck_core::{AppError, AppResult, SubjectId};
use grantdeck_domain::{
    Grant, GrantAction, GrantSet, ModuleCounter, ModuleKey, PermissionCatalog,
    PermissionChange, PermissionDefinition, PermissionId, PermissionName, SubjectProfile,
};

use crate::{
    EditorConfig, EditorPhase, EditorPorts, FlipOutcome, LoadOutcome, MutationAck, Notification,
    NotificationSeverity, Notifier, PermissionCatalogFetcher, PermissionEditor,
    PermissionListView, PermissionMutationClient, PermissionRow, PermissionSnapshot, SaveOutcome,
};

struct FakeFetcher {
    responses: Mutex<VecDeque<AppResult<PermissionSnapshot>>>,
    fallback: PermissionSnapshot,
    gate: Option<Arc<Semaphore>>,
}

#[async_trait]
impl PermissionCatalogFetcher for FakeFetcher {
    async fn fetch_permissions(&self, _subject: &SubjectId) -> AppResult<PermissionSnapshot> {
        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|error| AppError::Internal(error.to_string()))?
                .forget();
        }

        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(self.fallback.clone()))
    }
}

#[derive(Default)]
struct FakeMutations {
    responses: Mutex<VecDeque<AppResult<MutationAck>>>,
    singles: Mutex<Vec<PermissionChange>>,
    batches: Mutex<Vec<Vec<PermissionChange>>>,
    gate: Option<Arc<Semaphore>>,
    hang: bool,
}

impl FakeMutations {
    async fn respond(&self) -> AppResult<MutationAck> {
        if self.hang {
            std::future::pending::<()>().await;
        }
        if let Some(gate) = &self.gate {
            let _permit = gate
                .acquire()
                .await
                .map_err(|error| AppError::Internal(error.to_string()))?;
        }

        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(MutationAck::default()))
    }
}

#[async_trait]
impl PermissionMutationClient for FakeMutations {
    async fn mutate_single(
        &self,
        _subject: &SubjectId,
        change: &PermissionChange,
    ) -> AppResult<MutationAck> {
        self.singles.lock().await.push(change.clone());
        self.respond().await
    }

    async fn mutate_batch(
        &self,
        _subject: &SubjectId,
        changes: &[PermissionChange],
    ) -> AppResult<MutationAck> {
        self.batches.lock().await.push(changes.to_vec());
        self.respond().await
    }
}

#[derive(Default)]
struct RecordingNotifier {
    notifications: std::sync::Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    fn taken(&self) -> Vec<Notification> {
        match self.notifications.lock() {
            Ok(mut notifications) => std::mem::take(&mut *notifications),
            Err(error) => panic!("{error}"),
        }
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut notifications) = self.notifications.lock() {
            notifications.push(notification);
        }
    }
}

fn name(value: &str) -> PermissionName {
    PermissionName::new(value).unwrap_or_else(|error| panic!("{error}"))
}

fn module(value: &str) -> ModuleKey {
    ModuleKey::new(value).unwrap_or_else(|error| panic!("{error}"))
}

fn user_management_snapshot() -> PermissionSnapshot {
    let catalog = PermissionCatalog::new(vec![
        PermissionDefinition {
            name: name("user.create"),
            description: "Create new users".to_owned(),
            id: PermissionId::parse("1"),
            module: module("user_management"),
        },
        PermissionDefinition {
            name: name("user.read"),
            description: "View user information".to_owned(),
            id: PermissionId::parse("2"),
            module: module("user_management"),
        },
    ])
    .unwrap_or_else(|error| panic!("{error}"));

    PermissionSnapshot {
        catalog,
        grants: [name("user.read")].into_iter().collect(),
        subject: None,
    }
}

struct Harness {
    editor: PermissionEditor,
    mutations: Arc<FakeMutations>,
    notifier: Arc<RecordingNotifier>,
}

fn harness_with(
    fetch_responses: Vec<AppResult<PermissionSnapshot>>,
    mutations: FakeMutations,
) -> Harness {
    harness_with_fetcher(
        FakeFetcher {
            responses: Mutex::new(fetch_responses.into()),
            fallback: user_management_snapshot(),
            gate: None,
        },
        mutations,
    )
}

fn harness_with_fetcher(fetcher: FakeFetcher, mutations: FakeMutations) -> Harness {
    let fetcher = Arc::new(fetcher);
    let mutations = Arc::new(mutations);
    let notifier = Arc::new(RecordingNotifier::default());
    let editor = PermissionEditor::new(
        SubjectId::new("4").unwrap_or_else(|error| panic!("{error}")),
        EditorPorts {
            fetcher,
            mutations: mutations.clone(),
            notifier: notifier.clone(),
        },
        EditorConfig::default(),
    );

    Harness {
        editor,
        mutations,
        notifier,
    }
}

fn harness(mutations: FakeMutations) -> Harness {
    harness_with(Vec::new(), mutations)
}

async fn loaded(mutations: FakeMutations) -> Harness {
    let harness = harness(mutations);
    let outcome = harness.editor.load().await;
    assert_eq!(
        outcome,
        Ok(LoadOutcome::Loaded {
            modules: 1,
            permissions: 2,
        })
    );
    harness
}

fn rows(editor: &PermissionEditor) -> Vec<PermissionRow> {
    match editor.display().body {
        PermissionListView::Modules { cards, .. } => {
            cards.into_iter().flat_map(|card| card.rows).collect()
        }
        other => panic!("expected module cards, got {other:?}"),
    }
}

fn users_counter(editor: &PermissionEditor) -> ModuleCounter {
    editor
        .counter(&module("user_management"))
        .unwrap_or_else(|error| panic!("{error}"))
}

async fn wait_for_pending(editor: &PermissionEditor, count: usize) {
    for _ in 0..100 {
        if rows(editor).iter().filter(|row| row.busy).count() == count {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("expected {count} pending toggles");
}

#[tokio::test]
async fn load_renders_initial_counter() {
    let harness = loaded(FakeMutations::default()).await;

    assert_eq!(harness.editor.phase(), EditorPhase::Ready);
    assert_eq!(users_counter(&harness.editor).to_string(), "1/2");
    let rows = rows(&harness.editor);
    assert!(!rows[0].checked);
    assert!(rows[1].checked);
    assert!(harness.notifier.taken().is_empty());
}

#[tokio::test]
async fn load_twice_yields_identical_display() {
    let harness = loaded(FakeMutations::default()).await;
    let first = harness.editor.display();

    assert!(harness.editor.reload().await.is_ok());
    assert_eq!(harness.editor.display(), first);
}

#[tokio::test]
async fn successful_flip_commits_and_updates_counter() {
    let mutations = FakeMutations::default();
    mutations.responses.lock().await.push_back(Ok(MutationAck {
        message: Some("Permission assigned".to_owned()),
    }));
    let harness = loaded(mutations).await;

    let outcome = harness.editor.flip(&name("user.create")).await;

    assert_eq!(
        outcome,
        Ok(FlipOutcome::Committed {
            grant: Grant::Granted,
            counter: ModuleCounter { active: 2, total: 2 },
        })
    );
    assert_eq!(users_counter(&harness.editor).to_string(), "2/2");
    assert_eq!(
        harness.mutations.singles.lock().await.as_slice(),
        &[PermissionChange {
            permission_name: name("user.create"),
            permission_id: PermissionId::parse("1"),
            action: GrantAction::Assign,
        }]
    );
    assert_eq!(
        harness.notifier.taken(),
        vec![Notification::new(
            "Permission assigned",
            NotificationSeverity::Success
        )]
    );
    assert!(rows(&harness.editor).iter().all(|row| row.enabled));
}

#[tokio::test]
async fn rejected_flip_rolls_back_with_server_message() {
    let mutations = FakeMutations::default();
    mutations
        .responses
        .lock()
        .await
        .push_back(Err(AppError::Server("Permission denied".to_owned())));
    let harness = loaded(mutations).await;

    let outcome = harness.editor.flip(&name("user.read")).await;

    assert!(matches!(
        outcome,
        Ok(FlipOutcome::RolledBack {
            grant: Grant::Granted,
            counter: ModuleCounter { active: 1, total: 2 },
            error: AppError::Server(_),
        })
    ));
    let rows = rows(&harness.editor);
    assert!(rows[1].checked);
    assert!(rows[1].enabled);
    assert_eq!(
        harness.notifier.taken(),
        vec![Notification::new(
            "Permission denied",
            NotificationSeverity::Error
        )]
    );
}

#[tokio::test]
async fn network_failure_uses_generic_message() {
    let mutations = FakeMutations::default();
    mutations
        .responses
        .lock()
        .await
        .push_back(Err(AppError::Network("connection reset".to_owned())));
    let harness = loaded(mutations).await;

    let outcome = harness.editor.flip(&name("user.create")).await;

    assert!(matches!(outcome, Ok(ref flip) if !flip.is_success()));
    assert_eq!(users_counter(&harness.editor).to_string(), "1/2");
    assert_eq!(
        harness.notifier.taken(),
        vec![Notification::new(
            "Failed to update permission!",
            NotificationSeverity::Error
        )]
    );
}

#[tokio::test(start_paused = true)]
async fn hung_mutation_times_out_and_rolls_back() {
    let harness = loaded(FakeMutations {
        hang: true,
        ..FakeMutations::default()
    })
    .await;
    let started = tokio::time::Instant::now();

    let outcome = harness.editor.flip(&name("user.create")).await;

    assert!(matches!(
        outcome,
        Ok(FlipOutcome::RolledBack {
            grant: Grant::Revoked,
            error: AppError::Timeout(_),
            ..
        })
    ));
    assert!(started.elapsed() >= Duration::from_secs(10));
    assert!(rows(&harness.editor).iter().all(|row| row.enabled && !row.busy));
}

#[tokio::test]
async fn same_permission_cannot_be_flipped_while_pending() {
    let gate = Arc::new(Semaphore::new(0));
    let harness = loaded(FakeMutations {
        gate: Some(gate.clone()),
        ..FakeMutations::default()
    })
    .await;

    let first = tokio::spawn({
        let editor = harness.editor.clone();
        async move { editor.flip(&name("user.create")).await }
    });
    wait_for_pending(&harness.editor, 1).await;

    let second = harness.editor.flip(&name("user.create")).await;
    assert!(matches!(second, Err(AppError::Conflict(_))));
    assert!(matches!(
        harness.editor.stage(&name("user.create"), Grant::Revoked),
        Err(AppError::Conflict(_))
    ));
    assert_eq!(users_counter(&harness.editor).to_string(), "1/2");

    gate.add_permits(1);
    let Ok(first) = first.await else {
        panic!("flip task panicked");
    };
    assert!(matches!(first, Ok(FlipOutcome::Committed { .. })));
    assert_eq!(harness.mutations.singles.lock().await.len(), 1);
}

#[tokio::test]
async fn flips_on_different_permissions_run_concurrently() {
    let gate = Arc::new(Semaphore::new(0));
    let harness = loaded(FakeMutations {
        gate: Some(gate.clone()),
        ..FakeMutations::default()
    })
    .await;

    let create = tokio::spawn({
        let editor = harness.editor.clone();
        async move { editor.flip(&name("user.create")).await }
    });
    let read = tokio::spawn({
        let editor = harness.editor.clone();
        async move { editor.flip(&name("user.read")).await }
    });
    wait_for_pending(&harness.editor, 2).await;
    assert_eq!(harness.mutations.singles.lock().await.len(), 2);

    gate.add_permits(2);
    let (Ok(create), Ok(read)) = (create.await, read.await) else {
        panic!("flip task panicked");
    };

    assert!(matches!(create, Ok(FlipOutcome::Committed { grant: Grant::Granted, .. })));
    assert!(matches!(read, Ok(FlipOutcome::Committed { grant: Grant::Revoked, .. })));
    assert_eq!(users_counter(&harness.editor).to_string(), "1/2");
}

#[tokio::test]
async fn save_is_rejected_while_a_flip_is_pending() {
    let gate = Arc::new(Semaphore::new(0));
    let harness = loaded(FakeMutations {
        gate: Some(gate.clone()),
        ..FakeMutations::default()
    })
    .await;

    let flip = tokio::spawn({
        let editor = harness.editor.clone();
        async move { editor.flip(&name("user.create")).await }
    });
    wait_for_pending(&harness.editor, 1).await;

    assert!(matches!(
        harness.editor.save().await,
        Err(AppError::Conflict(_))
    ));
    assert!(!harness.editor.display().save_control.enabled);

    gate.add_permits(1);
    assert!(flip.await.is_ok());
    assert!(harness.mutations.batches.lock().await.is_empty());
}

#[tokio::test]
async fn second_save_is_rejected_while_first_is_in_flight() {
    let gate = Arc::new(Semaphore::new(0));
    let harness = loaded(FakeMutations {
        gate: Some(gate.clone()),
        ..FakeMutations::default()
    })
    .await;

    let save = tokio::spawn({
        let editor = harness.editor.clone();
        async move { editor.save().await }
    });
    for _ in 0..100 {
        if harness.editor.is_saving() {
            break;
        }
        tokio::task::yield_now().await;
    }

    let display = harness.editor.display();
    assert!(display.save_control.busy);
    assert_eq!(display.save_control.label, "Saving...");
    assert!(matches!(
        harness.editor.save().await,
        Err(AppError::Conflict(_))
    ));
    assert!(matches!(
        harness.editor.flip(&name("user.create")).await,
        Err(AppError::Conflict(_))
    ));

    gate.add_permits(1);
    assert!(matches!(save.await, Ok(Ok(SaveOutcome::Saved { changes: 2 }))));
    assert_eq!(harness.mutations.batches.lock().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn batch_success_commits_snapshot_and_closes_after_delay() {
    let harness = loaded(FakeMutations::default()).await;
    assert!(
        harness
            .editor
            .stage(&name("user.create"), Grant::Granted)
            .is_ok()
    );
    assert_eq!(users_counter(&harness.editor).to_string(), "2/2");
    let started = tokio::time::Instant::now();

    let outcome = harness.editor.save().await;

    assert_eq!(outcome, Ok(SaveOutcome::Saved { changes: 2 }));
    assert!(started.elapsed() >= Duration::from_millis(1500));
    assert_eq!(harness.editor.phase(), EditorPhase::Closed);
    let batches = harness.mutations.batches.lock().await;
    let actions: Vec<(&str, GrantAction)> = batches[0]
        .iter()
        .map(|change| (change.permission_name.as_str(), change.action))
        .collect();
    assert_eq!(
        actions,
        vec![
            ("user.create", GrantAction::Assign),
            ("user.read", GrantAction::Assign),
        ]
    );
    assert_eq!(
        harness.editor.committed_grants(),
        Some(
            [name("user.create"), name("user.read")]
                .into_iter()
                .collect::<GrantSet>()
        )
    );
    assert_eq!(
        harness.notifier.taken(),
        vec![Notification::new(
            "Permissions saved successfully!",
            NotificationSeverity::Success
        )]
    );
    assert!(matches!(
        harness.editor.flip(&name("user.create")).await,
        Err(AppError::Conflict(_))
    ));
}

#[tokio::test]
async fn batch_failure_keeps_staged_edits_and_stays_open() {
    let mutations = FakeMutations::default();
    mutations
        .responses
        .lock()
        .await
        .push_back(Err(AppError::Server("Batch rejected".to_owned())));
    let harness = loaded(mutations).await;
    assert!(
        harness
            .editor
            .stage(&name("user.read"), Grant::Revoked)
            .is_ok()
    );

    let outcome = harness.editor.save().await;

    assert!(matches!(outcome, Ok(SaveOutcome::Failed(AppError::Server(_)))));
    assert_eq!(harness.editor.phase(), EditorPhase::Ready);
    assert_eq!(users_counter(&harness.editor).to_string(), "0/2");
    assert!(!rows(&harness.editor)[1].checked);
    assert_eq!(
        harness.editor.committed_grants(),
        Some([name("user.read")].into_iter().collect::<GrantSet>())
    );
    let display = harness.editor.display();
    assert!(display.save_control.enabled);
    assert_eq!(display.save_control.label, "Save");
    assert_eq!(
        harness.notifier.taken(),
        vec![Notification::new(
            "Batch rejected",
            NotificationSeverity::Error
        )]
    );
}

#[tokio::test]
async fn flipping_a_staged_toggle_unstages_without_a_request() {
    let harness = loaded(FakeMutations::default()).await;
    assert!(
        harness
            .editor
            .stage(&name("user.create"), Grant::Granted)
            .is_ok()
    );

    let outcome = harness.editor.flip(&name("user.create")).await;

    assert_eq!(
        outcome,
        Ok(FlipOutcome::Unstaged {
            grant: Grant::Revoked,
            counter: ModuleCounter { active: 1, total: 2 },
        })
    );
    assert!(harness.mutations.singles.lock().await.is_empty());
}

#[tokio::test]
async fn set_skips_the_request_when_grant_already_matches() {
    let harness = loaded(FakeMutations::default()).await;

    let unchanged = harness.editor.set(&name("user.read"), Grant::Granted).await;
    let revoked = harness.editor.set(&name("user.read"), Grant::Revoked).await;

    assert_eq!(
        unchanged,
        Ok(FlipOutcome::Unchanged {
            grant: Grant::Granted
        })
    );
    assert!(matches!(
        revoked,
        Ok(FlipOutcome::Committed {
            grant: Grant::Revoked,
            ..
        })
    ));
    assert_eq!(harness.mutations.singles.lock().await.len(), 1);
}

#[tokio::test]
async fn operations_before_load_are_rejected() {
    let harness = harness(FakeMutations::default());

    assert!(matches!(
        harness.editor.flip(&name("user.create")).await,
        Err(AppError::Conflict(_))
    ));
    assert!(matches!(
        harness.editor.stage(&name("user.create"), Grant::Granted),
        Err(AppError::Conflict(_))
    ));
    assert!(matches!(
        harness.editor.reload().await,
        Err(AppError::Conflict(_))
    ));
    assert!(matches!(
        harness.editor.display().body,
        PermissionListView::Loading { .. }
    ));
}

#[tokio::test]
async fn unknown_permission_is_not_found() {
    let harness = loaded(FakeMutations::default()).await;

    assert!(matches!(
        harness.editor.flip(&name("report.view")).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn fetch_failure_shows_error_state_until_reload() {
    let harness = harness_with(
        vec![Err(AppError::NotFound("User not found".to_owned()))],
        FakeMutations::default(),
    );

    let outcome = harness.editor.load().await;

    assert!(matches!(outcome, Ok(LoadOutcome::Failed(AppError::NotFound(_)))));
    assert_eq!(harness.editor.phase(), EditorPhase::FetchFailed);
    assert!(matches!(
        harness.editor.display().body,
        PermissionListView::Failed { ref message, .. } if message == "User not found"
    ));
    assert!(matches!(
        harness.editor.flip(&name("user.create")).await,
        Err(AppError::Conflict(_))
    ));
    assert_eq!(
        harness.notifier.taken(),
        vec![Notification::new("User not found", NotificationSeverity::Error)]
    );

    assert!(matches!(
        harness.editor.reload().await,
        Ok(LoadOutcome::Loaded { .. })
    ));
    assert_eq!(harness.editor.phase(), EditorPhase::Ready);
}

#[tokio::test]
async fn empty_catalog_renders_placeholder() {
    let empty = PermissionSnapshot {
        catalog: PermissionCatalog::default(),
        grants: GrantSet::new(),
        subject: None,
    };
    let harness = harness_with(vec![Ok(empty)], FakeMutations::default());

    assert_eq!(
        harness.editor.load().await,
        Ok(LoadOutcome::Loaded {
            modules: 0,
            permissions: 0,
        })
    );
    assert!(matches!(
        harness.editor.display().body,
        PermissionListView::Empty { .. }
    ));
}

#[tokio::test(start_paused = true)]
async fn cancelled_flip_rolls_back_pending_toggle() {
    let harness = loaded(FakeMutations {
        hang: true,
        ..FakeMutations::default()
    })
    .await;

    let cancelled = tokio::time::timeout(
        Duration::from_millis(50),
        harness.editor.flip(&name("user.create")),
    )
    .await;

    assert!(cancelled.is_err());
    let rows = rows(&harness.editor);
    assert!(!rows[0].checked);
    assert!(!rows[0].busy);
    assert!(rows[0].enabled);
    assert_eq!(users_counter(&harness.editor).to_string(), "1/2");
    assert!(
        harness
            .editor
            .stage(&name("user.create"), Grant::Granted)
            .is_ok()
    );
}

#[tokio::test]
async fn closed_editor_rejects_every_operation() {
    let harness = loaded(FakeMutations::default()).await;
    harness.editor.close();
    harness.editor.close();

    assert_eq!(harness.editor.phase(), EditorPhase::Closed);
    assert!(matches!(
        harness.editor.flip(&name("user.create")).await,
        Err(AppError::Conflict(_))
    ));
    assert!(matches!(harness.editor.save().await, Err(AppError::Conflict(_))));
    assert!(matches!(harness.editor.load().await, Err(AppError::Conflict(_))));
}

async fn wait_until_disabled(editor: &PermissionEditor) {
    for _ in 0..100 {
        if rows(editor).iter().all(|row| !row.enabled) {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("expected every control to be disabled");
}

#[tokio::test]
async fn reload_in_flight_rejects_edits_and_disables_controls() {
    let gate = Arc::new(Semaphore::new(1));
    let harness = harness_with_fetcher(
        FakeFetcher {
            responses: Mutex::new(VecDeque::new()),
            fallback: user_management_snapshot(),
            gate: Some(gate.clone()),
        },
        FakeMutations::default(),
    );
    assert!(matches!(
        harness.editor.load().await,
        Ok(LoadOutcome::Loaded { .. })
    ));

    let reloading = tokio::spawn({
        let editor = harness.editor.clone();
        async move { editor.reload().await }
    });
    wait_until_disabled(&harness.editor).await;

    assert!(matches!(
        harness.editor.flip(&name("user.create")).await,
        Err(AppError::Conflict(_))
    ));
    assert!(matches!(
        harness.editor.set(&name("user.create"), Grant::Granted).await,
        Err(AppError::Conflict(_))
    ));
    assert!(matches!(
        harness.editor.stage(&name("user.create"), Grant::Granted),
        Err(AppError::Conflict(_))
    ));
    assert!(matches!(harness.editor.save().await, Err(AppError::Conflict(_))));
    assert!(!harness.editor.display().save_control.enabled);

    gate.add_permits(1);
    let Ok(reloaded) = reloading.await else {
        panic!("reload task panicked");
    };
    assert_eq!(
        reloaded,
        Ok(LoadOutcome::Loaded {
            modules: 1,
            permissions: 2,
        })
    );
    assert!(rows(&harness.editor).iter().all(|row| row.enabled));
    assert!(harness.editor.display().save_control.enabled);
    assert_eq!(users_counter(&harness.editor).to_string(), "1/2");
    assert!(harness.mutations.singles.lock().await.is_empty());
    assert!(harness.mutations.batches.lock().await.is_empty());
    assert!(harness.notifier.taken().is_empty());
}

#[tokio::test]
async fn load_fills_subject_header_from_snapshot() {
    let mut snapshot = user_management_snapshot();
    snapshot.subject = Some(SubjectProfile {
        id: SubjectId::new("4").unwrap_or_else(|error| panic!("{error}")),
        username: "jdoe".to_owned(),
        email: "jdoe@example.com".to_owned(),
        first_name: Some("Jane".to_owned()),
        last_name: Some("Doe".to_owned()),
        full_name: None,
        is_active: false,
    });
    let harness = harness_with(vec![Ok(snapshot)], FakeMutations::default());
    assert!(harness.editor.display().header.is_none());

    assert!(matches!(
        harness.editor.load().await,
        Ok(LoadOutcome::Loaded { .. })
    ));

    let Some(header) = harness.editor.display().header else {
        panic!("expected a subject header after load");
    };
    assert_eq!(header.subject_id, "4");
    assert_eq!(header.display_name, "Jane Doe");
    assert_eq!(header.username, "jdoe");
    assert_eq!(header.email, "jdoe@example.com");
    assert_eq!(header.status.label, "Inactive");

    // A later snapshot without a profile keeps the known header.
    assert!(harness.editor.reload().await.is_ok());
    assert!(harness.editor.display().header.is_some());
}
