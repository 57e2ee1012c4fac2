use grantdeck_core::{AppResult, SubjectId};
use grantdeck_domain::{
    GrantSet, ModuleKey, PermissionCatalog, PermissionDefinition, PermissionId, PermissionName,
    SubjectProfile,
};

const DEFAULT_PERMISSIONS: &[(&str, &str, &str)] = &[
    ("user_view", "View users", "users"),
    ("user_create", "Create users", "users"),
    ("user_edit", "Edit users", "users"),
    ("user_delete", "Delete users", "users"),
    ("tour_view", "View tours", "tours"),
    ("tour_create", "Create tours", "tours"),
    ("tour_edit", "Edit tours", "tours"),
    ("tour_delete", "Delete tours", "tours"),
    ("cost_view", "View costs", "costs"),
    ("cost_create", "Create costs", "costs"),
    ("cost_edit", "Edit costs", "costs"),
    ("cost_delete", "Delete costs", "costs"),
    ("report_view", "View reports", "reports"),
    ("report_export", "Export reports", "reports"),
    ("settings_view", "View settings", "settings"),
    ("settings_edit", "Edit settings", "settings"),
    ("system_logs", "View system logs", "system"),
    ("system_backup", "Back up the system", "system"),
];

const VIEWER_GRANTS: &[&str] = &["user_view", "tour_view", "cost_view", "report_view"];

const OPERATOR_GRANTS: &[&str] = &[
    "tour_view",
    "tour_create",
    "tour_edit",
    "tour_delete",
    "cost_view",
    "cost_create",
    "cost_edit",
    "cost_delete",
    "report_view",
    "report_export",
];

/// Default permission catalog of the administrative panel.
///
/// Ids are assigned in declaration order starting at 1.
pub fn default_permission_catalog() -> AppResult<PermissionCatalog> {
    let definitions = DEFAULT_PERMISSIONS
        .iter()
        .enumerate()
        .map(|(index, (name, description, module))| {
            Ok(PermissionDefinition {
                name: PermissionName::new(*name)?,
                description: (*description).to_owned(),
                id: PermissionId::parse((index + 1).to_string()),
                module: ModuleKey::new(*module)?,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    PermissionCatalog::new(definitions)
}

struct DemoSubject {
    id: &'static str,
    username: &'static str,
    first_name: Option<&'static str>,
    last_name: Option<&'static str>,
    full_name: Option<&'static str>,
    is_active: bool,
    grants: Option<&'static [&'static str]>,
}

const DEMO_SUBJECTS: &[DemoSubject] = &[
    DemoSubject {
        id: "1",
        username: "admin",
        first_name: Some("System"),
        last_name: Some("Administrator"),
        full_name: None,
        is_active: true,
        grants: None,
    },
    DemoSubject {
        id: "2",
        username: "ayse",
        first_name: Some("Ayşe"),
        last_name: Some("Demir"),
        full_name: None,
        is_active: true,
        grants: Some(VIEWER_GRANTS),
    },
    DemoSubject {
        id: "3",
        username: "mehmet",
        first_name: None,
        last_name: None,
        full_name: Some("Mehmet Yılmaz"),
        is_active: true,
        grants: Some(OPERATOR_GRANTS),
    },
    DemoSubject {
        id: "4",
        username: "zeynep",
        first_name: Some("Zeynep"),
        last_name: Some("Kaya"),
        full_name: None,
        is_active: false,
        grants: Some(&["user_view"]),
    },
];

/// Demo subjects with their initial grants.
///
/// Subject `1` holds every permission of the default catalog.
pub fn demo_subjects() -> AppResult<Vec<(SubjectProfile, GrantSet)>> {
    DEMO_SUBJECTS
        .iter()
        .map(|demo| {
            let profile = SubjectProfile {
                id: SubjectId::new(demo.id)?,
                username: demo.username.to_owned(),
                email: format!("{}@example.com", demo.username),
                first_name: demo.first_name.map(str::to_owned),
                last_name: demo.last_name.map(str::to_owned),
                full_name: demo.full_name.map(str::to_owned),
                is_active: demo.is_active,
            };
            let held = match demo.grants {
                Some(names) => names
                    .iter()
                    .map(|name| PermissionName::new(*name))
                    .collect::<AppResult<GrantSet>>()?,
                None => DEFAULT_PERMISSIONS
                    .iter()
                    .map(|(name, _, _)| PermissionName::new(*name))
                    .collect::<AppResult<GrantSet>>()?,
            };

            Ok((profile, held))
        })
        .collect()
}
