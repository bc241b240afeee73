//! Toaster Component
//!
//! Renders transient notifications and implements the core `Notifier` on top
//! of the UI store.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use cotodo_core::env::{Notifier, Toast, ToastKind};

use crate::store::{store_dismiss_toast, store_push_toast, use_ui_store, UiStateStoreFields, UiStore};

/// How long a toast stays up, in milliseconds
const TOAST_TTL_MS: u32 = 5_000;

pub struct StoreNotifier {
    store: UiStore,
}

impl StoreNotifier {
    pub fn new(store: UiStore) -> Self {
        Self { store }
    }
}

impl Notifier for StoreNotifier {
    fn notify(&self, toast: Toast) {
        let store = self.store;
        let id = store_push_toast(&store, toast);
        spawn_local(async move {
            TimeoutFuture::new(TOAST_TTL_MS).await;
            store_dismiss_toast(&store, id);
        });
    }
}

#[component]
pub fn Toaster() -> impl IntoView {
    let store = use_ui_store();

    view! {
        <div class="toaster">
            <For
                each=move || store.toasts().get()
                key=|entry| entry.id
                children=move |entry| {
                    let id = entry.id;
                    let class = match entry.toast.kind {
                        ToastKind::Info => "toast",
                        ToastKind::Error => "toast error",
                    };
                    view! {
                        <div class=class on:click=move |_| store_dismiss_toast(&store, id)>
                            <strong>{entry.toast.title}</strong>
                            {entry.toast.description.map(|text| view! { <p>{text}</p> })}
                            {entry.toast.image.map(|src| view! { <img src=src alt="QR code" /> })}
                        </div>
                    }
                }
            />
        </div>
    }
}
