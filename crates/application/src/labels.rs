use grantdeck_domain::Locale;

/// Localized texts used by the renderer and the editor's notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    /// Suffix appended to module titles.
    pub module_suffix: &'static str,
    /// Badge text of granted permissions.
    pub active: &'static str,
    /// Badge text of revoked permissions.
    pub inactive: &'static str,
    /// Caption under module statistics.
    pub active_permissions: &'static str,
    /// Shown while the catalog is loading.
    pub loading_permissions: &'static str,
    /// Shown for an empty catalog.
    pub no_permissions_found: &'static str,
    /// Title of the fetch failure state.
    pub error_loading_permissions: &'static str,
    /// Fallback success text of a single change.
    pub permission_updated: &'static str,
    /// Fallback error text of a single change.
    pub permission_update_failed: &'static str,
    /// Success text of a batch save.
    pub permissions_saved: &'static str,
    /// Fallback error text of a batch save.
    pub permissions_save_failed: &'static str,
    /// Idle label of the save control.
    pub save: &'static str,
    /// Busy label of the save control.
    pub saving: &'static str,
}

const ENGLISH: Labels = Labels {
    module_suffix: "Module",
    active: "Active",
    inactive: "Inactive",
    active_permissions: "Active",
    loading_permissions: "Loading permissions...",
    no_permissions_found: "No permissions found",
    error_loading_permissions: "Error loading permissions",
    permission_updated: "Permission updated successfully!",
    permission_update_failed: "Failed to update permission!",
    permissions_saved: "Permissions saved successfully!",
    permissions_save_failed: "Failed to save permissions!",
    save: "Save",
    saving: "Saving...",
};

const TURKISH: Labels = Labels {
    module_suffix: "Modülü",
    active: "Aktif",
    inactive: "Pasif",
    active_permissions: "Aktif",
    loading_permissions: "Yetkiler yükleniyor...",
    no_permissions_found: "Yetki bulunamadı",
    error_loading_permissions: "Yetkiler yüklenirken hata oluştu",
    permission_updated: "Yetki başarıyla güncellendi!",
    permission_update_failed: "Yetki güncellenemedi!",
    permissions_saved: "Yetkiler başarıyla kaydedildi!",
    permissions_save_failed: "Yetkiler kaydedilemedi!",
    save: "Kaydet",
    saving: "Kaydediliyor...",
};

impl Labels {
    /// Returns the label table of a locale.
    #[must_use]
    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::En => ENGLISH,
            Locale::Tr => TURKISH,
        }
    }
}

impl Default for Labels {
    fn default() -> Self {
        Self::for_locale(Locale::default())
    }
}
