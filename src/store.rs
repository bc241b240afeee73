//! UI State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. Holds what the
//! page shows that isn't owned by a list view-model: toasts and the picker.

use leptos::prelude::*;
use reactive_stores::Store;

use cotodo_core::domain::{ListId, TodoList};
use cotodo_core::env::Toast;

#[derive(Clone, Debug, PartialEq)]
pub struct ToastEntry {
    pub id: u64,
    pub toast: Toast,
}

/// A list the local replica knows, as shown in the picker
#[derive(Clone, Debug, PartialEq)]
pub struct ListEntry {
    pub id: ListId,
    pub title: Option<String>,
}

impl ListEntry {
    pub fn label(&self) -> String {
        self.title.clone().unwrap_or_else(|| self.id.to_string())
    }
}

/// Page state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct UiState {
    /// Toasts currently on screen, oldest first
    pub toasts: Vec<ToastEntry>,
    pub next_toast_id: u64,
    /// Lists for the existing-lists picker
    pub lists: Vec<ListEntry>,
}

/// Type alias for the store
pub type UiStore = Store<UiState>;

/// Get the UI store from context
pub fn use_ui_store() -> UiStore {
    expect_context::<UiStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Show a toast; returns its id for dismissal
pub fn store_push_toast(store: &UiStore, toast: Toast) -> u64 {
    let id = {
        let field = store.next_toast_id();
        let mut next = field.write();
        *next += 1;
        *next
    };
    store.toasts().write().push(ToastEntry { id, toast });
    id
}

pub fn store_dismiss_toast(store: &UiStore, id: u64) {
    store.toasts().write().retain(|entry| entry.id != id);
}

/// Replace the picker entries
pub fn store_set_lists(store: &UiStore, lists: Vec<TodoList>) {
    *store.lists().write() = lists
        .into_iter()
        .map(|list| ListEntry {
            id: list.id,
            title: list.title,
        })
        .collect();
}
