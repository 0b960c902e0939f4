//! Validation results

use std::fmt;

use futures::future::LocalBoxFuture;

use crate::message::ErrorMessage;

/// Outcome of one field's validation cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    Invalid { message: ErrorMessage, render: bool },
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Result of `validate_field` / `validate_fields`.
///
/// `Ready` when only synchronous checks ran; `Pending` when an async
/// validator was involved. The pending future never fails.
#[must_use = "a pending validation only shows its result when awaited"]
pub enum Validation {
    Ready(bool),
    Pending(LocalBoxFuture<'static, bool>),
}

impl Validation {
    /// The result, if no async work is involved
    pub fn ready(&self) -> Option<bool> {
        match self {
            Self::Ready(valid) => Some(*valid),
            Self::Pending(_) => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// Wait for the result
    pub async fn settle(self) -> bool {
        match self {
            Self::Ready(valid) => valid,
            Self::Pending(future) => future.await,
        }
    }
}

impl fmt::Debug for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(valid) => f.debug_tuple("Ready").field(valid).finish(),
            Self::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}
