//! In-memory engine
//!
//! `LocalNode` keeps a single replica in memory. Several nodes created with
//! [`LocalNode::peer`] share that replica, which models several participants
//! whose replicas are perfectly in sync. No networking, persistence or
//! cryptography happens here: invite secrets are random opaque strings.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::domain::{
    AccountId, FieldValue, GroupId, InviteSecret, Profile, RecordId, RecordKind, RecordSnapshot,
    Role, RECORD_ID_PREFIX,
};
use crate::error::{EngineError, EngineResult};
use crate::observer::{Listener, Observers, Subscription};

use super::traits::{AccessControl, Profiles, RecordStore};

fn mint_id(prefix: &str) -> String {
    format!("{prefix}z{}", Uuid::new_v4().simple())
}

struct StoredRecord {
    kind: RecordKind,
    group: GroupId,
    snapshot: RecordSnapshot,
    editors: HashMap<String, AccountId>,
}

#[derive(Clone)]
struct Grant {
    group: GroupId,
    role: Role,
}

#[derive(Default)]
struct Replica {
    members: HashMap<GroupId, HashMap<AccountId, Role>>,
    records: HashMap<RecordId, StoredRecord>,
    creation_order: Vec<RecordId>,
    invites: HashMap<InviteSecret, Grant>,
    profiles: HashMap<AccountId, Profile>,
    observers: HashMap<RecordId, Rc<Observers>>,
}

impl Replica {
    fn role(&self, group: &GroupId, account: &AccountId) -> Option<Role> {
        self.members.get(group)?.get(account).copied()
    }

    fn require_write(&self, group: &GroupId, account: &AccountId) -> EngineResult<()> {
        match self.role(group, account) {
            Some(role) if role.can_write() => Ok(()),
            _ => Err(EngineError::PermissionDenied {
                group: group.clone(),
                required: Role::Writer,
            }),
        }
    }

    fn record_mut(&mut self, record: &RecordId, account: &AccountId) -> EngineResult<&mut StoredRecord> {
        let group = self
            .records
            .get(record)
            .map(|stored| stored.group.clone())
            .ok_or_else(|| EngineError::RecordNotFound(record.clone()))?;
        self.require_write(&group, account)?;
        self.records
            .get_mut(record)
            .ok_or_else(|| EngineError::RecordNotFound(record.clone()))
    }

    fn observers(&self, record: &RecordId) -> Option<Rc<Observers>> {
        self.observers.get(record).cloned()
    }
}

/// One participant's handle on a shared in-memory replica.
#[derive(Clone)]
pub struct LocalNode {
    replica: Rc<RefCell<Replica>>,
    me: AccountId,
}

impl LocalNode {
    /// Fresh replica with a single account named `name`.
    pub fn new(name: &str) -> Self {
        let replica = Rc::new(RefCell::new(Replica::default()));
        Self::join(replica, name)
    }

    /// Another participant on the same replica.
    pub fn peer(&self, name: &str) -> Self {
        Self::join(self.replica.clone(), name)
    }

    fn join(replica: Rc<RefCell<Replica>>, name: &str) -> Self {
        let me = AccountId::new(mint_id(RECORD_ID_PREFIX));
        replica.borrow_mut().profiles.insert(
            me.clone(),
            Profile {
                name: name.to_string(),
            },
        );
        debug!(account = %me, name, "local account created");
        Self { replica, me }
    }

    /// Change the display name published in this account's profile.
    pub fn set_profile_name(&self, name: &str) {
        self.replica.borrow_mut().profiles.insert(
            self.me.clone(),
            Profile {
                name: name.to_string(),
            },
        );
    }

    /// Apply an invite; returns the resulting role and, when it changed,
    /// every record of the group.
    fn grant_membership(&self, target: &RecordId, secret: &InviteSecret) -> EngineResult<(Role, Vec<RecordId>)> {
        let mut replica = self.replica.borrow_mut();
        let grant = replica
            .invites
            .get(secret)
            .cloned()
            .ok_or_else(|| EngineError::InvalidInvite("unknown secret".to_string()))?;
        let target_group = replica
            .records
            .get(target)
            .map(|stored| stored.group.clone())
            .ok_or_else(|| EngineError::RecordNotFound(target.clone()))?;
        if target_group != grant.group {
            return Err(EngineError::InvalidInvite(format!(
                "secret does not belong to the group of {target}"
            )));
        }

        let members = replica.members.entry(grant.group.clone()).or_default();
        let previous = members.get(&self.me).copied();
        let role = match previous {
            Some(existing) => existing.max(grant.role),
            None => grant.role,
        };
        members.insert(self.me.clone(), role);
        debug!(group = %grant.group, %role, "invite accepted");

        if previous == Some(role) {
            return Ok((role, Vec::new()));
        }
        let opened = replica
            .creation_order
            .iter()
            .filter(|id| replica.records.get(*id).is_some_and(|stored| stored.group == grant.group))
            .cloned()
            .collect();
        Ok((role, opened))
    }

    fn notify(&self, record: &RecordId) {
        // Borrow is released before callbacks run, so they may re-enter.
        let observers = self.replica.borrow().observers(record);
        if let Some(observers) = observers {
            observers.notify();
        }
    }
}

impl RecordStore for LocalNode {
    fn create_group(&self) -> EngineResult<GroupId> {
        let group = GroupId::new(mint_id(RECORD_ID_PREFIX));
        let mut replica = self.replica.borrow_mut();
        replica
            .members
            .entry(group.clone())
            .or_default()
            .insert(self.me.clone(), Role::Admin);
        debug!(%group, "group created");
        Ok(group)
    }

    fn create_record(&self, group: &GroupId, kind: RecordKind) -> EngineResult<RecordId> {
        let mut replica = self.replica.borrow_mut();
        if !replica.members.contains_key(group) {
            return Err(EngineError::GroupNotFound(group.clone()));
        }
        replica.require_write(group, &self.me)?;

        let record = RecordId::new(mint_id(RECORD_ID_PREFIX));
        replica.records.insert(
            record.clone(),
            StoredRecord {
                kind,
                group: group.clone(),
                snapshot: RecordSnapshot::default(),
                editors: HashMap::new(),
            },
        );
        replica.creation_order.push(record.clone());
        debug!(%record, ?kind, %group, "record created");
        Ok(record)
    }

    fn kind_of(&self, record: &RecordId) -> Option<RecordKind> {
        self.replica.borrow().records.get(record).map(|stored| stored.kind)
    }

    fn group_of(&self, record: &RecordId) -> EngineResult<GroupId> {
        self.replica
            .borrow()
            .records
            .get(record)
            .map(|stored| stored.group.clone())
            .ok_or_else(|| EngineError::RecordNotFound(record.clone()))
    }

    fn read(&self, record: &RecordId) -> Option<RecordSnapshot> {
        let replica = self.replica.borrow();
        let stored = replica.records.get(record)?;
        replica.role(&stored.group, &self.me)?;
        Some(stored.snapshot.clone())
    }

    fn set_field(&self, record: &RecordId, field: &str, value: FieldValue) -> EngineResult<()> {
        {
            let me = self.me.clone();
            let mut replica = self.replica.borrow_mut();
            let stored = replica.record_mut(record, &me)?;
            stored.snapshot.fields.insert(field.to_string(), value);
            stored.editors.insert(field.to_string(), me);
        }
        self.notify(record);
        Ok(())
    }

    fn insert_into_set(&self, record: &RecordId, field: &str, member: &RecordId) -> EngineResult<()> {
        let inserted = {
            let me = self.me.clone();
            let mut replica = self.replica.borrow_mut();
            let stored = replica.record_mut(record, &me)?;
            let inserted = stored
                .snapshot
                .sets
                .entry(field.to_string())
                .or_default()
                .insert(member.clone());
            stored.editors.insert(field.to_string(), me);
            inserted
        };
        if inserted {
            self.notify(record);
        }
        Ok(())
    }

    fn last_editor(&self, record: &RecordId, field: &str) -> Option<AccountId> {
        self.replica.borrow().records.get(record)?.editors.get(field).cloned()
    }

    fn records(&self, kind: RecordKind) -> Vec<RecordId> {
        let replica = self.replica.borrow();
        replica
            .creation_order
            .iter()
            .filter(|id| {
                replica
                    .records
                    .get(*id)
                    .is_some_and(|stored| stored.kind == kind && replica.role(&stored.group, &self.me).is_some())
            })
            .cloned()
            .collect()
    }

    fn subscribe(&self, record: &RecordId, listener: Listener) -> Subscription {
        let observers = self
            .replica
            .borrow_mut()
            .observers
            .entry(record.clone())
            .or_insert_with(Observers::new)
            .clone();
        observers.subscribe(listener)
    }
}

#[async_trait(?Send)]
impl AccessControl for LocalNode {
    fn me(&self) -> AccountId {
        self.me.clone()
    }

    fn role_in(&self, group: &GroupId) -> Option<Role> {
        self.replica.borrow().role(group, &self.me)
    }

    fn mint_invite(&self, group: &GroupId, role: Role) -> EngineResult<InviteSecret> {
        let mut replica = self.replica.borrow_mut();
        match replica.role(group, &self.me) {
            Some(Role::Admin) => {}
            _ => {
                return Err(EngineError::PermissionDenied {
                    group: group.clone(),
                    required: Role::Admin,
                })
            }
        }
        let secret = InviteSecret::new(mint_id("inviteSecret_"));
        replica.invites.insert(
            secret.clone(),
            Grant {
                group: group.clone(),
                role,
            },
        );
        debug!(%group, %role, "invite minted");
        Ok(secret)
    }

    async fn accept_invite(&self, target: &RecordId, secret: &InviteSecret) -> EngineResult<Role> {
        let (role, opened) = self.grant_membership(target, secret)?;
        // Records of the group may have just become readable.
        for record in &opened {
            self.notify(record);
        }
        Ok(role)
    }
}

impl Profiles for LocalNode {
    fn profile(&self, account: &AccountId) -> Option<Profile> {
        self.replica.borrow().profiles.get(account).cloned()
    }
}
