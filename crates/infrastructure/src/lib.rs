//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod anti_forgery_token_source;
mod http_permission_client;
mod in_memory_notification_center;
mod in_memory_subject_permission_repository;

pub use anti_forgery_token_source::{
    PageMarkupTokenSource, StaticAntiForgeryToken, TokenMarkupPatterns,
};
pub use http_permission_client::HttpPermissionClient;
pub use in_memory_notification_center::{ActiveNotification, InMemoryNotificationCenter};
pub use in_memory_subject_permission_repository::{
    InMemorySubjectPermissionRepository, default_permission_catalog, demo_subjects,
};
