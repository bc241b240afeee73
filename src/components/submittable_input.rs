//! Submittable Input Component
//!
//! Single text field with a submit button. Failures are reported as toasts;
//! the field is cleared only on success.

use leptos::prelude::*;

use cotodo_core::env::Toast;
use cotodo_core::{ActionError, ActionResult};

use crate::context::AppContext;

const SUBMIT_FAILED: &str = "Couldn't submit";

#[component]
pub fn SubmittableInput(
    #[prop(into)] label: String,
    #[prop(into)] placeholder: String,
    #[prop(into)] on_submit: Callback<String, ActionResult<()>>,
    #[prop(optional, into)] disabled: Signal<bool>,
) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let (value, set_value) = signal(String::new());

    let submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        match on_submit.run(value.get()) {
            Ok(()) => set_value.set(String::new()),
            Err(ActionError::Validation(reason)) => {
                ctx.notify(Toast::error(SUBMIT_FAILED, reason));
            }
            Err(e) => {
                tracing::warn!(error = %e, "submit failed");
                ctx.notify(Toast::error(SUBMIT_FAILED, e.to_string()));
            }
        }
    };

    view! {
        <form class="submittable-input" on:submit=submit>
            <input
                type="text"
                placeholder=placeholder
                prop:value=move || value.get()
                prop:disabled=move || disabled.get()
                on:input=move |ev| set_value.set(event_target_value(&ev))
            />
            <button type="submit" disabled=move || disabled.get()>{label}</button>
        </form>
    }
}
