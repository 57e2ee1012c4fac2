use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult};

/// Header carrying the anti-forgery token on every mutating request.
pub const ANTI_FORGERY_HEADER: &str = "X-CSRFToken";

/// Anti-forgery token sourced from page metadata or a hidden form field.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AntiForgeryToken(String);

impl AntiForgeryToken {
    /// Creates a token, rejecting empty values.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "anti-forgery token must not be empty".to_owned(),
            ));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the raw token value for the request header.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Compares against a presented header value.
    #[must_use]
    pub fn matches(&self, presented: &str) -> bool {
        self.0 == presented.trim()
    }
}

impl std::fmt::Debug for AntiForgeryToken {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("AntiForgeryToken(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::AntiForgeryToken;

    #[test]
    fn debug_output_redacts_token() {
        let Ok(token) = AntiForgeryToken::new("s3cret") else {
            panic!("token should be valid");
        };
        let rendered = format!("{token:?}");
        assert!(!rendered.contains("s3cret"));
    }

    #[test]
    fn matches_ignores_surrounding_whitespace() {
        let Ok(token) = AntiForgeryToken::new("abc") else {
            panic!("token should be valid");
        };
        assert!(token.matches(" abc "));
        assert!(!token.matches("abd"));
    }
}
