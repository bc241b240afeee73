use leptos::prelude::*;

use cotodo_core::attribution::badge_for_account;
use cotodo_core::domain::AccountId;

use crate::context::AppContext;

/// Rounded name tag of the last editor, colored by identity.
#[component]
pub fn NameBadge(account: Option<AccountId>) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");
    let session = ctx.session();

    account
        .and_then(|account| badge_for_account(&session, &account))
        .map(|badge| {
            let style = format!(
                "color: {}; background: {};",
                badge.style.foreground, badge.style.background
            );
            view! { <span class="name-badge" style=style>{badge.name}</span> }
        })
}
