//! Application services and ports.

#![forbid(unsafe_code)]

mod labels;
mod permission_admin_service;
mod permission_editor;
mod permission_list_renderer;
mod permission_ports;

pub use labels::Labels;
pub use permission_admin_service::{
    BatchOutcome, PermissionAdminService, SubjectPermissionRepository, SubjectPermissions,
};
pub use permission_editor::{
    EditorConfig, EditorPhase, EditorPorts, FlipOutcome, LoadOutcome, PermissionEditor,
    SaveOutcome,
};
pub use permission_list_renderer::{
    BadgeTone, DisplayModel, ModuleCard, ModuleStat, PermissionListView, PermissionRow,
    SaveControl, StateIcon, StatusBadge, SubjectHeader, render, render_board,
    render_fetch_failure, render_loading, render_module_counter, render_subject_header,
};
pub use permission_ports::{
    AntiForgeryTokenSource, MutationAck, Notification, NotificationSeverity, Notifier,
    PermissionCatalogFetcher, PermissionMutationClient, PermissionSnapshot,
};
