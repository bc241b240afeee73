//! Task Item Component
//!
//! One row of the list: done checkbox, text, last-editor badge, delete.

use std::rc::Rc;

use leptos::prelude::*;

use cotodo_core::{ActionResult, ListViewModel, TaskRow};

use crate::components::{DeleteConfirmButton, NameBadge};

fn report(result: ActionResult<()>) {
    if let Err(e) = result {
        tracing::warn!(error = %e, "task update failed");
    }
}

#[component]
pub fn TaskItem(row: TaskRow, vm: StoredValue<Rc<ListViewModel>, LocalStorage>) -> impl IntoView {
    let TaskRow { id, task, text_editor } = row;
    let loading = task.is_none();
    let (text, done, deleted) = task
        .map(|task| (task.text, task.done, task.deleted))
        .unwrap_or((None, false, false));

    let text_class = match (done, deleted) {
        (true, true) => "task-text done deleted",
        (true, false) => "task-text done",
        (false, true) => "task-text deleted",
        (false, false) => "task-text",
    };

    let toggle_id = id.clone();
    let on_toggle = move |_| {
        report(vm.get_value().toggle_done(&toggle_id).map(|_| ()));
    };
    let on_delete = Callback::new(move |()| {
        report(vm.get_value().set_deleted(&id));
    });

    view! {
        <div class="task-row">
            <input type="checkbox" checked=done disabled=loading on:change=on_toggle />
            <span class=text_class>
                {match text {
                    Some(text) => text.into_any(),
                    None => view! { <span class="skeleton"></span> }.into_any(),
                }}
            </span>
            <div class="task-actions">
                <NameBadge account=text_editor />
                <DeleteConfirmButton on_confirm=on_delete disabled={loading || deleted} />
            </div>
        </div>
    }
}
