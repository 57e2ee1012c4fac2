//! Per-permission toggle state machine.
//!
//! ```text
//! Committed(g) --Flip--> Pending { prior: g, target: !g }
//! Pending      --Confirm--> Committed(target)
//! Pending      --Reject--> Error { reverted_to: prior } --Settle--> Committed(prior)
//! Committed(_) --Overwrite(g)--> Committed(g)
//! ```

use std::fmt::{Display, Formatter};

use grantdeck_core::AppError;

use crate::Grant;

/// Lifecycle state of one permission toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleState {
    /// Matches the last state confirmed by the authority.
    Committed(Grant),
    /// A mutation toward `target` is in flight; the control is disabled.
    Pending {
        /// Last committed value, restored on failure.
        prior: Grant,
        /// Value requested from the authority.
        target: Grant,
    },
    /// The mutation failed; shown once, then settled back.
    Error {
        /// Value the toggle reverts to.
        reverted_to: Grant,
    },
}

/// Input to the toggle state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleEvent {
    /// Operator flipped the control in immediate mode.
    Flip,
    /// Authority acknowledged the in-flight mutation.
    Confirm,
    /// In-flight mutation failed or timed out.
    Reject,
    /// Error was surfaced; restore the committed value.
    Settle,
    /// A batch save committed this value.
    Overwrite(Grant),
}

/// Event not accepted from the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTransition {
    /// State the event was applied to.
    pub from: ToggleState,
    /// Rejected event.
    pub event: ToggleEvent,
}

impl ToggleState {
    /// Applies one event, returning the next state.
    pub fn apply(self, event: ToggleEvent) -> Result<Self, InvalidTransition> {
        match (self, event) {
            (Self::Committed(grant), ToggleEvent::Flip) => Ok(Self::Pending {
                prior: grant,
                target: grant.flipped(),
            }),
            (Self::Committed(_), ToggleEvent::Overwrite(grant)) => Ok(Self::Committed(grant)),
            (Self::Pending { target, .. }, ToggleEvent::Confirm) => Ok(Self::Committed(target)),
            (Self::Pending { prior, .. }, ToggleEvent::Reject) => {
                Ok(Self::Error { reverted_to: prior })
            }
            (Self::Error { reverted_to }, ToggleEvent::Settle) => {
                Ok(Self::Committed(reverted_to))
            }
            (from, event) => Err(InvalidTransition { from, event }),
        }
    }

    /// Grant this state counts as.
    ///
    /// Pending toggles count as their prior value so counters only move on
    /// commit.
    #[must_use]
    pub fn resolved(self) -> Grant {
        match self {
            Self::Committed(grant) => grant,
            Self::Pending { prior, .. } => prior,
            Self::Error { reverted_to } => reverted_to,
        }
    }

    /// Position the control shows, with pending toggles shown optimistically.
    #[must_use]
    pub fn position(self) -> Grant {
        match self {
            Self::Pending { target, .. } => target,
            other => other.resolved(),
        }
    }

    /// Returns true while a mutation is in flight.
    #[must_use]
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

impl Display for InvalidTransition {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            formatter,
            "toggle cannot handle {:?} while in state {:?}",
            self.event, self.from
        )
    }
}

impl std::error::Error for InvalidTransition {}

impl From<InvalidTransition> for AppError {
    fn from(value: InvalidTransition) -> Self {
        AppError::Conflict(value.to_string())
    }
}
