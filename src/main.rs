//! Cotodo Frontend Entry Point

mod app;
mod commands;
mod components;
mod context;
mod store;

use app::App;
use leptos::prelude::*;
use tracing::Level;

fn console_sink(level: Level, line: &str) {
    let line = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::ERROR => web_sys::console::error_1(&line),
        Level::WARN => web_sys::console::warn_1(&line),
        _ => web_sys::console::log_1(&line),
    }
}

fn main() {
    console_error_panic_hook::set_once();

    let loaded = commands::load_config();
    let config = loaded.as_ref().cloned().unwrap_or_default();
    if let Err(e) = rolling_logger::init_logger("Cotodo", config.log_capacity, Box::new(console_sink)) {
        web_sys::console::error_1(&format!("failed to init logger: {e}").into());
    }
    if let Err(e) = loaded {
        tracing::warn!(error = %e, "ignoring page config");
    }

    mount_to_body(move || view! { <App config=config /> });
}
