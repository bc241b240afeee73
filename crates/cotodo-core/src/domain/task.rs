//! Task Entity
//!
//! A single to-do entry. `deleted` is a one-way latch.

use super::entity::Entity;
use super::ids::{RecordId, TaskId};
use super::record::{RecordKind, RecordSnapshot};

pub const TEXT: &str = "text";
pub const DONE: &str = "done";
pub const DELETED: &str = "deleted";

/// A task as currently replicated
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Task {
    pub id: TaskId,
    /// `None` while still loading
    pub text: Option<String>,
    pub done: bool,
    pub deleted: bool,
}

impl Task {
    /// Has non-empty text and has not been soft-deleted.
    pub fn is_visible_when_filtered(&self) -> bool {
        let has_text = self.text.as_deref().is_some_and(|t| !t.is_empty());
        has_text && !self.deleted
    }
}

impl Entity for Task {
    type Id = TaskId;

    const KIND: RecordKind = RecordKind::Task;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn from_snapshot(id: TaskId, snapshot: &RecordSnapshot) -> Self {
        Self {
            id,
            text: snapshot.text(TEXT).map(str::to_string),
            done: snapshot.flag(DONE),
            deleted: snapshot.flag(DELETED),
        }
    }

    fn record_id(&self) -> &RecordId {
        self.id.record()
    }
}
