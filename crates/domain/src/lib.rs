//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod board;
mod grant;
mod locale;
mod permission;
mod subject;
mod toggle;

pub use board::{ModuleCounter, ToggleBoard, ToggleSlot};
pub use grant::{Grant, GrantAction, GrantSet, PermissionChange};
pub use locale::Locale;
pub use permission::{
    ModuleKey, PermissionCatalog, PermissionDefinition, PermissionId, PermissionName,
};
pub use subject::SubjectProfile;
pub use toggle::{InvalidTransition, ToggleEvent, ToggleState};
