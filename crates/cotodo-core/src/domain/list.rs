//! List Entity
//!
//! A titled, grow-only set of task references.

use indexmap::IndexSet;

use super::entity::Entity;
use super::ids::{ListId, RecordId, TaskId};
use super::record::{RecordKind, RecordSnapshot};

/// Field holding the human-readable name
pub const TITLE: &str = "title";
/// Set field holding the task references
pub const TASKS: &str = "tasks";

/// A to-do list as currently replicated
#[derive(Debug, Clone, PartialEq)]
pub struct TodoList {
    pub id: ListId,
    /// `None` while the field has not been written or replicated yet
    pub title: Option<String>,
    /// Membership in insertion order, restricted to task-shaped references
    pub tasks: IndexSet<TaskId>,
}

impl TodoList {
    pub fn contains(&self, task: &TaskId) -> bool {
        self.tasks.contains(task)
    }
}

impl Entity for TodoList {
    type Id = ListId;

    const KIND: RecordKind = RecordKind::List;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn from_snapshot(id: ListId, snapshot: &RecordSnapshot) -> Self {
        let tasks = snapshot.set(TASKS).filter_map(TaskId::parse).collect();
        Self {
            id,
            title: snapshot.text(TITLE).map(str::to_string),
            tasks,
        }
    }

    fn record_id(&self) -> &RecordId {
        self.id.record()
    }
}
