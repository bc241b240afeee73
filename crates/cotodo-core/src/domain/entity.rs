//! Domain Layer - Core Entity Trait
//!
//! Every replicated entity is decoded from a record snapshot and knows the
//! record kind it is stored as.

use super::ids::RecordId;
use super::record::{RecordKind, RecordSnapshot};

/// Core trait for all replicated entities
pub trait Entity: Sized + Clone {
    /// The type of the entity's identifier
    type Id: Clone + Eq + std::hash::Hash;

    /// Record kind the engine stores this entity as
    const KIND: RecordKind;

    /// Returns the entity's identifier
    fn id(&self) -> &Self::Id;

    /// Decode from a snapshot. Absent fields decode as unset, never as an error.
    fn from_snapshot(id: Self::Id, snapshot: &RecordSnapshot) -> Self;

    fn record_id(&self) -> &RecordId;
}
