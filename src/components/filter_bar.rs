//! Filter Bar Component
//!
//! Switches a list between showing every task and only live ones.

use leptos::prelude::*;

use cotodo_core::FilterMode;

const FILTERS: &[(FilterMode, &str)] = &[(FilterMode::All, "All"), (FilterMode::Filtered, "Filtered")];

#[component]
pub fn FilterBar(
    #[prop(into)] current: Signal<FilterMode>,
    on_change: impl Fn(FilterMode) + Copy + 'static,
) -> impl IntoView {
    view! {
        <div class="filter-bar">
            {FILTERS.iter().map(|(mode, label)| {
                let mode = *mode;
                let is_selected = move || current.get() == mode;
                view! {
                    <button
                        class=move || if is_selected() { "filter-btn active" } else { "filter-btn" }
                        on:click=move |_| on_change(mode)
                    >
                        {*label}
                    </button>
                }
            }).collect_view()}
        </div>
    }
}
