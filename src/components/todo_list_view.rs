//! Todo List View Component
//!
//! The active list: title, invite button, filter, tasks and the new-task
//! input. Owns the list's view-model and invite manager for as long as the
//! list stays active.

use std::rc::Rc;

use leptos::prelude::*;

use cotodo_core::domain::ListId;
use cotodo_core::{InviteManager, ListViewModel};

use crate::components::{FilterBar, InviteButton, SubmittableInput, TaskItem};
use crate::context::AppContext;

#[component]
pub fn TodoListView(list: ListId) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let session = ctx.session();

    let vm = Rc::new(ListViewModel::new(session.clone(), list.clone()));
    let list_view = RwSignal::new(vm.snapshot());
    let weak = Rc::downgrade(&vm);
    let subscription = vm.subscribe(Rc::new(move || {
        if let Some(vm) = weak.upgrade() {
            list_view.set(vm.snapshot());
        }
    }));
    let vm = StoredValue::new_local(vm);
    let _subscription = StoredValue::new_local(subscription);
    let manager = StoredValue::new_local(Rc::new(InviteManager::new(session, list.clone())));

    let list_id = list.to_string();
    let title = move || match list_view.get().title {
        Some(title) => view! {
            {title} " " <span class="list-id">"(" {list_id.clone()} ")"</span>
        }
        .into_any(),
        None => view! { <span class="skeleton"></span> }.into_any(),
    };

    let filter = Signal::derive(move || list_view.get().filter);
    let can_write = Signal::derive(move || list_view.get().can_write());
    let can_invite = Signal::derive(move || list_view.get().role.is_some_and(|role| role.can_invite()));

    let create_task = Callback::new(move |text: String| vm.get_value().create_task(&text).map(|_| ()));

    view! {
        <div class="todo-list">
            <div class="todo-list-header">
                <h1>{title}</h1>
                <InviteButton manager=manager can_invite=can_invite />
            </div>

            <FilterBar current=filter on_change=move |mode| vm.get_value().set_filter(mode) />

            <div class="task-table">
                <For
                    each={move || list_view.get().visible().into_iter().cloned().collect::<Vec<_>>()}
                    key={|row| row.clone()}
                    children={move |row| view! { <TaskItem row=row vm=vm /> }}
                />
                <div class="task-row new-task">
                    <input type="checkbox" disabled=true />
                    <SubmittableInput
                        label="Add"
                        placeholder="New task"
                        on_submit=create_task
                        disabled={Signal::derive(move || !can_write.get())}
                    />
                </div>
            </div>
        </div>
    }
}
