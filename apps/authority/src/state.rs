use grantdeck_application::PermissionAdminService;
use grantdeck_core::AntiForgeryToken;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub permission_admin_service: PermissionAdminService,
    pub csrf_token: AntiForgeryToken,
}
