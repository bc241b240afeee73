//! Invite Button Component
//!
//! Admin-only button that copies an invite link and shows its QR code.

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use cotodo_core::{ActionError, InviteManager};

use crate::context::AppContext;

#[component]
pub fn InviteButton(
    manager: StoredValue<Rc<InviteManager>, LocalStorage>,
    #[prop(into)] can_invite: Signal<bool>,
) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let role = ctx.session().config().invite_role;
    let (pending, set_pending) = signal(false);

    let on_click = move |_| {
        let manager = manager.get_value();
        set_pending.set(true);
        spawn_local(async move {
            match manager.invite(role).await {
                Ok(_) => tracing::info!(list = %manager.list(), %role, "invite shared"),
                Err(ActionError::Busy) => {}
                Err(e) => tracing::warn!(error = %e, "invite failed"),
            }
            set_pending.set(false);
        });
    };

    view! {
        <Show when=move || can_invite.get()>
            <button class="invite-btn" disabled=move || pending.get() on:click=on_click>
                "Invite"
            </button>
        </Show>
    }
}
