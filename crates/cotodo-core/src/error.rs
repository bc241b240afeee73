//! Error types
//!
//! `EngineError` is what the replicated-document engine reports.
//! `ActionError` is what a user intent (create, toggle, invite) reports.

use thiserror::Error;

use crate::domain::{GroupId, RecordId, Role};

/// Common result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Common result type for user intents
pub type ActionResult<T> = Result<T, ActionError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("record not found: {0}")]
    RecordNotFound(RecordId),

    #[error("group not found: {0}")]
    GroupNotFound(GroupId),

    #[error("permission denied in group {group}: requires {required}")]
    PermissionDenied { group: GroupId, required: Role },

    #[error("invalid invitation: {0}")]
    InvalidInvite(String),

    #[error("mutation rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Submitted input did not pass validation; nothing was performed
    #[error("{0}")]
    Validation(&'static str),

    /// The caller's role does not allow this action
    #[error("requires {required} role")]
    Forbidden { required: Role },

    /// The list or task cannot be read (yet)
    #[error("record is not readable: {0}")]
    Unreadable(RecordId),

    /// A browser capability (clipboard, code rendering) failed
    #[error("{capability} failed: {reason}")]
    Capability { capability: &'static str, reason: String },

    /// Another invocation of the same action is still in flight
    #[error("already in progress")]
    Busy,

    #[error(transparent)]
    Engine(#[from] EngineError),
}
