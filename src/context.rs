//! Application Context
//!
//! Shared state provided via Leptos Context API. The session and router are
//! `Rc`-based, so they live in local stored values.

use std::rc::Rc;

use leptos::prelude::*;

use cotodo_core::domain::ListId;
use cotodo_core::env::Toast;
use cotodo_core::{ListViewModel, Session, SessionRouter, Subscription};

use crate::store::{store_set_lists, UiStore};

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    session: StoredValue<Session, LocalStorage>,
    router: StoredValue<Rc<SessionRouter>, LocalStorage>,
    /// Keeps the router-to-signal bridge alive
    _router_subscription: StoredValue<Subscription, LocalStorage>,
    store: UiStore,
    /// Active list id - read
    pub active: ReadSignal<Option<ListId>>,
}

impl AppContext {
    /// Bridge router changes into the `active` signal and start routing.
    pub fn new(session: Session, router: Rc<SessionRouter>, store: UiStore) -> Self {
        let (active, set_active) = signal(router.active());
        let weak = Rc::downgrade(&router);
        let subscription = router.subscribe(Rc::new(move || {
            if let Some(router) = weak.upgrade() {
                set_active.set(router.active());
            }
        }));
        router.start();

        Self {
            session: StoredValue::new_local(session),
            router: StoredValue::new_local(router),
            _router_subscription: StoredValue::new_local(subscription),
            store,
            active,
        }
    }

    pub fn session(&self) -> Session {
        self.session.get_value()
    }

    pub fn router(&self) -> Rc<SessionRouter> {
        self.router.get_value()
    }

    pub fn notify(&self, toast: Toast) {
        self.session.with_value(|session| session.notify(toast));
    }

    /// Reload the existing-lists picker from the local replica
    pub fn refresh_lists(&self) {
        let lists = self
            .session
            .with_value(|session| ListViewModel::known_lists(session));
        store_set_lists(&self.store, lists);
    }
}
