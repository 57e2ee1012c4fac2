use grantdeck_core::SubjectId;
use serde::{Deserialize, Serialize};

/// Read-only profile of the subject whose permissions are edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectProfile {
    /// Subject identifier.
    pub id: SubjectId,
    /// Login name.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Given name, when recorded.
    pub first_name: Option<String>,
    /// Family name, when recorded.
    pub last_name: Option<String>,
    /// Free-form full name, when recorded.
    pub full_name: Option<String>,
    /// Whether the account is active.
    pub is_active: bool,
}

impl SubjectProfile {
    /// Name shown in the editor header.
    ///
    /// Prefers `first last`, then the free-form full name, then the username.
    #[must_use]
    pub fn display_name(&self) -> String {
        let non_blank = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_owned)
        };

        match (non_blank(&self.first_name), non_blank(&self.last_name)) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            _ => non_blank(&self.full_name).unwrap_or_else(|| self.username.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use grantdeck_core::SubjectId;

    use super::SubjectProfile;

    fn profile() -> SubjectProfile {
        SubjectProfile {
            id: SubjectId::new("7").unwrap_or_else(|error| panic!("{error}")),
            username: "jdoe".to_owned(),
            email: "jdoe@example.com".to_owned(),
            first_name: None,
            last_name: None,
            full_name: None,
            is_active: true,
        }
    }

    #[test]
    fn display_name_prefers_first_and_last() {
        let subject = SubjectProfile {
            first_name: Some("Jane".to_owned()),
            last_name: Some("Doe".to_owned()),
            full_name: Some("J. Doe".to_owned()),
            ..profile()
        };
        assert_eq!(subject.display_name(), "Jane Doe");
    }

    #[test]
    fn display_name_falls_back_to_full_name_then_username() {
        let with_full_name = SubjectProfile {
            first_name: Some("Jane".to_owned()),
            full_name: Some("Jane Q. Doe".to_owned()),
            ..profile()
        };
        assert_eq!(with_full_name.display_name(), "Jane Q. Doe");
        assert_eq!(profile().display_name(), "jdoe");
    }
}
