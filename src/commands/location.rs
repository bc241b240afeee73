//! Page Location
//!
//! `Location` over `window.location`, with `hashchange` as the change signal.

use cotodo_core::env::Location;
use cotodo_core::{Listener, Subscription};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

pub struct BrowserLocation;

fn location() -> Option<web_sys::Location> {
    web_sys::window().map(|window| window.location())
}

impl Location for BrowserLocation {
    fn fragment(&self) -> String {
        location()
            .and_then(|location| location.hash().ok())
            .map(|hash| hash.trim_start_matches('#').to_string())
            .unwrap_or_default()
    }

    fn set_fragment(&self, fragment: &str) {
        if self.fragment() == fragment {
            return;
        }
        if let Some(location) = location() {
            if let Err(e) = location.set_hash(fragment) {
                tracing::warn!(error = ?e, "failed to set location hash");
            }
        }
    }

    fn base_url(&self) -> String {
        let Some(location) = location() else {
            return String::new();
        };
        let origin = location.origin().unwrap_or_default();
        let path = location.pathname().unwrap_or_default();
        format!("{origin}{path}")
    }

    fn on_change(&self, listener: Listener) -> Subscription {
        let Some(window) = web_sys::window() else {
            return Subscription::noop();
        };
        let on_hash_change = Closure::wrap(Box::new(move |_: web_sys::Event| {
            listener();
        }) as Box<dyn FnMut(_)>);
        if let Err(e) = window
            .add_event_listener_with_callback("hashchange", on_hash_change.as_ref().unchecked_ref())
        {
            tracing::warn!(error = ?e, "failed to listen for hashchange");
            return Subscription::noop();
        }

        Subscription::new(move || {
            let _ = window.remove_event_listener_with_callback(
                "hashchange",
                on_hash_change.as_ref().unchecked_ref(),
            );
        })
    }
}
