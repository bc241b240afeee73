//! List Picker Component
//!
//! Buttons for every list the local replica knows about.

use leptos::prelude::*;

use crate::context::AppContext;
use crate::store::{use_ui_store, UiStateStoreFields};

#[component]
pub fn ListPicker() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let store = use_ui_store();

    view! {
        <Show when=move || !store.lists().read().is_empty()>
            <div class="list-picker">
                <h2>"Existing Lists"</h2>
                <For
                    each=move || store.lists().get()
                    key=|entry| entry.id.clone()
                    children=move |entry| {
                        let label = entry.label();
                        let id = entry.id;
                        let active_id = id.clone();
                        let is_active = move || ctx.active.get().as_ref() == Some(&active_id);
                        view! {
                            <button
                                class=move || if is_active() { "list-btn active" } else { "list-btn" }
                                on:click=move |_| ctx.router().open(id.clone())
                            >
                                {label}
                            </button>
                        }
                    }
                />
            </div>
        </Show>
    }
}
