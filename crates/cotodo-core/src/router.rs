//! Session Router
//!
//! Single authority for which list is open. The URL fragment is both input
//! and output: invitations in it are consumed and replaced by a plain list
//! reference, plain references are validated against the engine. The router
//! is the only writer of the location.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::FutureExt;
use tracing::{debug, info, warn};

use crate::domain::{InviteLink, ListId, RecordId, RecordKind};
use crate::observer::{Listener, Observers, Subscription};
use crate::session::Session;

pub struct SessionRouter {
    session: Session,
    active: RefCell<Option<ListId>>,
    /// Bumped by every resolution and navigation; stale resolutions compare
    /// against it after their await point and drop their result.
    generation: Cell<u64>,
    observers: Rc<Observers>,
    location_listener: RefCell<Option<Subscription>>,
}

impl SessionRouter {
    pub fn new(session: Session) -> Rc<Self> {
        Rc::new(Self {
            session,
            active: RefCell::new(None),
            generation: Cell::new(0),
            observers: Observers::new(),
            location_listener: RefCell::new(None),
        })
    }

    /// Register the location listener and schedule the initial resolution.
    /// Calling it again does nothing.
    pub fn start(self: &Rc<Self>) {
        if self.location_listener.borrow().is_some() {
            return;
        }
        let weak = Rc::downgrade(self);
        let listener = self.session.env().location.on_change(Rc::new(move || {
            if let Some(router) = weak.upgrade() {
                router.schedule_resolve();
            }
        }));
        *self.location_listener.borrow_mut() = Some(listener);
        self.schedule_resolve();
    }

    /// Drop the location listener.
    pub fn stop(&self) {
        self.location_listener.borrow_mut().take();
    }

    fn schedule_resolve(self: &Rc<Self>) {
        let router = Rc::clone(self);
        self.session.env().spawner.spawn(
            async move {
                router.resolve().await;
            }
            .boxed_local(),
        );
    }

    pub fn active(&self) -> Option<ListId> {
        self.active.borrow().clone()
    }

    /// Notified whenever the active list changes.
    pub fn subscribe(&self, listener: Listener) -> Subscription {
        self.observers.subscribe(listener)
    }

    /// Interpret the current fragment and update the active list.
    pub async fn resolve(&self) -> Option<ListId> {
        let generation = self.next_generation();
        let location = self.session.env().location.clone();
        let fragment = location.fragment();

        let resolved = match InviteLink::parse_fragment(&fragment) {
            Some(invite) => {
                let accepted = self
                    .session
                    .engine()
                    .accept_invite(invite.target.record(), &invite.secret)
                    .await;
                if self.generation.get() != generation {
                    debug!(target_list = %invite.target, "discarding stale invite resolution");
                    return self.active();
                }
                match accepted {
                    Ok(role) => match self.session.engine().kind_of(invite.target.record()) {
                        Some(RecordKind::List) => {
                            info!(list = %invite.target, %role, "invitation accepted");
                            Some(invite.target)
                        }
                        other => {
                            warn!(target_record = %invite.target, kind = ?other, "invitation does not target a list");
                            None
                        }
                    },
                    Err(err) => {
                        warn!(list = %invite.target, error = %err, "invitation could not be consumed");
                        None
                    }
                }
            }
            None => self.plain_reference(&fragment),
        };

        if let Some(list) = &resolved {
            if location.fragment() != list.as_str() {
                location.set_fragment(list.as_str());
            }
        }
        self.set_active(resolved.clone());
        resolved
    }

    /// Open a list chosen in the UI.
    pub fn open(&self, list: ListId) {
        self.next_generation();
        let location = &self.session.env().location;
        if location.fragment() != list.as_str() {
            location.set_fragment(list.as_str());
        }
        self.set_active(Some(list));
    }

    /// Close the open list and clear the fragment.
    pub fn close(&self) {
        self.next_generation();
        self.session.env().location.set_fragment("");
        self.set_active(None);
    }

    fn plain_reference(&self, fragment: &str) -> Option<ListId> {
        if fragment.is_empty() {
            return None;
        }
        let record = RecordId::new(fragment);
        match self.session.engine().kind_of(&record) {
            Some(RecordKind::List) => Some(ListId::new(record)),
            other => {
                debug!(%record, kind = ?other, "fragment does not reference a known list");
                None
            }
        }
    }

    fn next_generation(&self) -> u64 {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        generation
    }

    fn set_active(&self, list: Option<ListId>) {
        let changed = *self.active.borrow() != list;
        if changed {
            *self.active.borrow_mut() = list;
            self.observers.notify();
        }
    }
}
