use grantdeck_core::AppError;
use grantdeck_domain::{
    Grant, GrantSet, ModuleCounter, ModuleKey, PermissionCatalog, PermissionName, SubjectProfile,
    ToggleBoard,
};
use serde::Serialize;

use crate::Labels;

/// Complete display model of an open editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayModel {
    /// Header describing the subject, when a profile was supplied.
    pub header: Option<SubjectHeader>,
    /// Permission list body.
    pub body: PermissionListView,
    /// Batch save control.
    pub save_control: SaveControl,
}

/// Body of the permission list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PermissionListView {
    /// Catalog request has not resolved yet.
    Loading {
        /// Localized loading text.
        message: String,
    },
    /// Catalog request failed.
    Failed {
        /// Icon shown above the title.
        icon: StateIcon,
        /// Localized title.
        title: String,
        /// Server or transport message.
        message: String,
    },
    /// Catalog has no permissions.
    Empty {
        /// Icon shown above the message.
        icon: StateIcon,
        /// Localized placeholder text.
        message: String,
    },
    /// One card per module.
    Modules {
        /// Statistics strip mirroring the card counters.
        stats: Vec<ModuleStat>,
        /// Module cards in catalog order.
        cards: Vec<ModuleCard>,
    },
}

/// Icon of a non-list state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateIcon {
    /// Failure state.
    Warning,
    /// Neutral placeholder.
    Info,
}

/// Color family of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTone {
    /// Granted or active.
    Success,
    /// Revoked or inactive.
    Muted,
}

/// Text badge next to a row or header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    /// Localized text.
    pub label: String,
    /// Color family.
    pub tone: BadgeTone,
}

impl StatusBadge {
    fn for_grant(grant: Grant, labels: &Labels) -> Self {
        match grant {
            Grant::Granted => Self {
                label: labels.active.to_owned(),
                tone: BadgeTone::Success,
            },
            Grant::Revoked => Self {
                label: labels.inactive.to_owned(),
                tone: BadgeTone::Muted,
            },
        }
    }
}

/// Entry of the statistics strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleStat {
    /// Module key.
    pub module: String,
    /// Title shown above the counter.
    pub title: String,
    /// `active/total` counter.
    pub counter: ModuleCounter,
    /// Localized caption.
    pub label: String,
}

/// Card of one module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleCard {
    /// Module key.
    pub module: String,
    /// Header title, e.g. `Users Module`.
    pub title: String,
    /// `active/total` counter.
    pub counter: ModuleCounter,
    /// One row per permission in server order.
    pub rows: Vec<PermissionRow>,
}

/// Toggle row of one permission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionRow {
    /// Permission name, used as the row key.
    pub name: String,
    /// Primary label (description).
    pub label: String,
    /// Secondary label (name).
    pub secondary_label: String,
    /// Control position.
    pub checked: bool,
    /// Whether the control accepts input.
    pub enabled: bool,
    /// Whether a request for this toggle is in flight.
    pub busy: bool,
    /// Active/Inactive badge.
    pub badge: StatusBadge,
}

/// Batch save button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveControl {
    /// Current label.
    pub label: String,
    /// Whether the button accepts input.
    pub enabled: bool,
    /// Whether a save is in flight.
    pub busy: bool,
}

impl SaveControl {
    /// Save control for the given saving flag.
    #[must_use]
    pub fn new(labels: &Labels, enabled: bool, saving: bool) -> Self {
        Self {
            label: if saving { labels.saving } else { labels.save }.to_owned(),
            enabled: enabled && !saving,
            busy: saving,
        }
    }
}

/// Header with the subject's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectHeader {
    /// Subject identifier.
    pub subject_id: String,
    /// Display name.
    pub display_name: String,
    /// Login name.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Account status badge.
    pub status: StatusBadge,
}

/// Renders the header of a subject profile.
#[must_use]
pub fn render_subject_header(profile: &SubjectProfile, labels: &Labels) -> SubjectHeader {
    SubjectHeader {
        subject_id: profile.id.to_string(),
        display_name: profile.display_name(),
        username: profile.username.clone(),
        email: profile.email.clone(),
        status: StatusBadge::for_grant(Grant::from_checked(profile.is_active), labels),
    }
}

/// Renders a freshly fetched catalog and grant set.
#[must_use]
pub fn render(catalog: &PermissionCatalog, grants: &GrantSet, labels: &Labels) -> PermissionListView {
    render_board(&ToggleBoard::new(catalog.clone(), grants), labels, true)
}

/// Renders the current toggle board.
///
/// With `interactive` false every control is disabled, e.g. while a batch
/// save is in flight.
#[must_use]
pub fn render_board(board: &ToggleBoard, labels: &Labels, interactive: bool) -> PermissionListView {
    let catalog = board.catalog();
    if catalog.is_empty() {
        return PermissionListView::Empty {
            icon: StateIcon::Info,
            message: labels.no_permissions_found.to_owned(),
        };
    }

    let mut stats = Vec::new();
    let mut cards = Vec::new();
    for (module, definitions) in catalog.modules() {
        let counter = render_module_counter(board, module);
        stats.push(ModuleStat {
            module: module.to_string(),
            title: module.display_title(),
            counter,
            label: labels.active_permissions.to_owned(),
        });

        let rows = definitions
            .iter()
            .filter_map(|definition| {
                render_row(board, &definition.name, &definition.description, labels, interactive)
            })
            .collect();
        cards.push(ModuleCard {
            module: module.to_string(),
            title: format!("{} {}", module.display_title(), labels.module_suffix),
            counter,
            rows,
        });
    }

    PermissionListView::Modules { stats, cards }
}

/// Recomputes the counter of one module.
#[must_use]
pub fn render_module_counter(board: &ToggleBoard, module: &ModuleKey) -> ModuleCounter {
    board.counter(module)
}

/// Loading placeholder.
#[must_use]
pub fn render_loading(labels: &Labels) -> PermissionListView {
    PermissionListView::Loading {
        message: labels.loading_permissions.to_owned(),
    }
}

/// Error state of a failed fetch.
#[must_use]
pub fn render_fetch_failure(error: &AppError, labels: &Labels) -> PermissionListView {
    PermissionListView::Failed {
        icon: StateIcon::Warning,
        title: labels.error_loading_permissions.to_owned(),
        message: error
            .user_message()
            .map_or_else(|| error.to_string(), str::to_owned),
    }
}

fn render_row(
    board: &ToggleBoard,
    name: &PermissionName,
    description: &str,
    labels: &Labels,
    interactive: bool,
) -> Option<PermissionRow> {
    let slot = board.slot(name).ok()?;
    Some(PermissionRow {
        name: name.to_string(),
        label: description.to_owned(),
        secondary_label: name.to_string(),
        checked: slot.position().is_granted(),
        enabled: interactive && slot.is_enabled(),
        busy: slot.state().is_pending(),
        badge: StatusBadge::for_grant(slot.counted(), labels),
    })
}
