//! Domain Layer
//!
//! Identifiers, roles and the two replicated entities (List, Task).
//! Nothing here talks to the engine; entities are decoded from snapshots.

mod entity;
mod ids;
mod invite;
pub mod list;
mod record;
mod role;
pub mod task;

pub use entity::Entity;
pub use ids::{AccountId, GroupId, ListId, RecordId, TaskId, RECORD_ID_PREFIX};
pub use invite::{InviteLink, InviteSecret};
pub use list::TodoList;
pub use record::{FieldValue, RecordKind, RecordSnapshot};
pub use role::Role;
pub use task::Task;

/// Display name of an identity, as published in its profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
}
