//! Shared primitives for all Rust crates in Grantdeck.

#![forbid(unsafe_code)]

/// Anti-forgery primitives attached to mutating requests.
pub mod auth;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::{ANTI_FORGERY_HEADER, AntiForgeryToken};

/// Result type used across Grantdeck crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// URL fragment prefix used by the users page to deep-link an editor.
pub const PERMISSIONS_FRAGMENT_PREFIX: &str = "#permissions-";

/// Identifier of the subject (user account) whose grants are being edited.
///
/// The value is opaque to Grantdeck: it is only ever echoed back to the
/// authority in request paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectId(String);

impl SubjectId {
    /// Creates a subject identifier from a data attribute or path value.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "subject id must not be empty".to_owned(),
            ));
        }

        if trimmed.contains(['/', '\\', '?', '#', '%'])
            || trimmed.chars().any(char::is_whitespace)
        {
            return Err(AppError::Validation(format!(
                "subject id '{trimmed}' contains reserved characters"
            )));
        }

        if matches!(trimmed, "." | "..") {
            return Err(AppError::Validation(format!(
                "subject id '{trimmed}' is a relative path segment"
            )));
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Extracts a subject identifier from a `#permissions-<id>` fragment.
    pub fn from_fragment(fragment: &str) -> AppResult<Self> {
        let id = fragment
            .trim()
            .strip_prefix(PERMISSIONS_FRAGMENT_PREFIX)
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "fragment '{fragment}' does not start with '{PERMISSIONS_FRAGMENT_PREFIX}'"
                ))
            })?;

        Self::new(id)
    }

    /// Accepts either a bare identifier or a `#permissions-<id>` fragment.
    pub fn parse(value: &str) -> AppResult<Self> {
        if value.trim_start().starts_with('#') {
            Self::from_fragment(value)
        } else {
            Self::new(value)
        }
    }

    /// Returns the identifier as sent on the wire.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for SubjectId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Common application error categories.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested subject or permission does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Operation conflicts with in-flight or closed editor state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// User is authenticated but blocked by authorization policy.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Transport-level failure: no usable response was received.
    #[error("network error: {0}")]
    Network(String),

    /// A response was received but reported `success: false`.
    #[error("server error: {0}")]
    Server(String),

    /// The call did not resolve within its bounded wait.
    #[error("timed out: {0}")]
    Timeout(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the message supplied by the remote authority, if any.
    ///
    /// Only server-originated failures carry a message worth showing to the
    /// operator; transport failures and timeouts fall back to a localized
    /// generic text chosen by the caller.
    #[must_use]
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::Server(message) | Self::NotFound(message) | Self::Forbidden(message) => {
                let trimmed = message.trim();
                (!trimmed.is_empty()).then_some(trimmed)
            }
            _ => None,
        }
    }
}
