//! Engine Layer - Core Traits
//!
//! Abstract interface of the replicated-document engine. Replication, merge,
//! transport and invite cryptography all live behind these traits.

use async_trait::async_trait;

use crate::domain::{
    AccountId, FieldValue, GroupId, InviteSecret, Profile, RecordId, RecordKind, RecordSnapshot,
    Role,
};
use crate::error::EngineResult;
use crate::observer::{Listener, Subscription};

/// Record creation, reads, attributed writes and change subscriptions.
///
/// Reads are non-blocking snapshot reads of locally replicated state; writes
/// are local and propagate asynchronously.
pub trait RecordStore {
    /// Create a group. The caller becomes its admin.
    fn create_group(&self) -> EngineResult<GroupId>;

    /// Create an empty record of `kind` owned by `group`.
    fn create_record(&self, group: &GroupId, kind: RecordKind) -> EngineResult<RecordId>;

    fn kind_of(&self, record: &RecordId) -> Option<RecordKind>;

    fn group_of(&self, record: &RecordId) -> EngineResult<GroupId>;

    /// `None` when the record is unknown or not readable by the caller.
    fn read(&self, record: &RecordId) -> Option<RecordSnapshot>;

    /// Write a scalar field, crediting the caller as last editor.
    fn set_field(&self, record: &RecordId, field: &str, value: FieldValue) -> EngineResult<()>;

    /// Add `member` to the grow-only set `field`. There is no removal.
    fn insert_into_set(&self, record: &RecordId, field: &str, member: &RecordId) -> EngineResult<()>;

    fn last_editor(&self, record: &RecordId, field: &str) -> Option<AccountId>;

    /// Every locally known record of `kind` readable by the caller.
    fn records(&self, kind: RecordKind) -> Vec<RecordId>;

    /// Push-based change notification for one record.
    fn subscribe(&self, record: &RecordId, listener: Listener) -> Subscription;
}

/// Identity, roles and invitations.
#[async_trait(?Send)]
pub trait AccessControl {
    fn me(&self) -> AccountId;

    fn role_in(&self, group: &GroupId) -> Option<Role>;

    /// Mint a capability secret granting `role` in `group`.
    fn mint_invite(&self, group: &GroupId, role: Role) -> EngineResult<InviteSecret>;

    /// Redeem a secret for the group owning `target`. Idempotent; the
    /// resulting role is returned.
    async fn accept_invite(&self, target: &RecordId, secret: &InviteSecret) -> EngineResult<Role>;
}

/// Profile lookup for attribution.
pub trait Profiles {
    fn profile(&self, account: &AccountId) -> Option<Profile>;
}

/// Everything the session needs from the engine.
pub trait Engine: RecordStore + AccessControl + Profiles {}

impl<T: RecordStore + AccessControl + Profiles> Engine for T {}
