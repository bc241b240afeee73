//! Cotodo Frontend App
//!
//! Wires the local replica, the browser bindings and the router into one
//! session, then shows either the active list or the create-list input.

use std::rc::Rc;

use leptos::prelude::*;
use reactive_stores::Store;

use cotodo_core::{ActionResult, Config, ListViewModel, LocalNode, Session, SessionRouter};

use crate::commands;
use crate::components::{ListPicker, StoreNotifier, SubmittableInput, Toaster, TodoListView};
use crate::context::AppContext;
use crate::store::UiState;

#[component]
pub fn App(config: Config) -> impl IntoView {
    let store = Store::new(UiState::default());
    provide_context(store);

    let env = commands::browser_environment(&config, Rc::new(StoreNotifier::new(store)));
    let node = LocalNode::new(&config.profile_name);
    let session = Session::new(Rc::new(node), env, config);
    let router = SessionRouter::new(session.clone());

    // Provide context to all children
    let ctx = AppContext::new(session, router, store);
    provide_context(ctx);

    // Picker follows list activation (created, opened or joined by invite)
    Effect::new(move |_| {
        ctx.active.track();
        ctx.refresh_lists();
    });

    let create_list = Callback::new(move |title: String| -> ActionResult<()> {
        let list = ListViewModel::create_list(&ctx.session(), &title)?;
        ctx.router().open(list);
        Ok(())
    });

    view! {
        <div class="app-layout">
            <main class="main-content">
                <ListPicker />

                {move || match ctx.active.get() {
                    Some(list) => view! { <TodoListView list=list /> }.into_any(),
                    None => view! {
                        <SubmittableInput
                            label="Create New List"
                            placeholder="New list title"
                            on_submit=create_list
                        />
                    }
                    .into_any(),
                }}

                <button class="close-btn" on:click=move |_| ctx.router().close()>
                    "Close List"
                </button>
            </main>

            <Toaster />
        </div>
    }
}
