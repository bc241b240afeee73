//! Browser Bindings
//!
//! Implementations of the core's environment traits on top of the page.

mod clipboard;
mod color_scheme;
mod location;
mod qr;
mod spawn;

use std::rc::Rc;

use cotodo_core::env::{Environment, Notifier};
use cotodo_core::{Config, ConfigError};

pub use clipboard::BrowserClipboard;
pub use color_scheme::MediaColorScheme;
pub use location::BrowserLocation;
pub use qr::QrRenderer;
pub use spawn::LocalSpawner;

const CONFIG_ELEMENT_ID: &str = "cotodo-config";

/// Read `<script id="cotodo-config" type="application/json">`. An absent
/// element yields the defaults.
pub fn load_config() -> Result<Config, ConfigError> {
    let text = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|element| element.text_content());

    match text {
        Some(text) => Config::from_json(&text),
        None => Ok(Config::default()),
    }
}

pub fn browser_environment(config: &Config, notifier: Rc<dyn Notifier>) -> Environment {
    Environment {
        location: Rc::new(BrowserLocation),
        clipboard: Rc::new(BrowserClipboard),
        color_scheme: Rc::new(MediaColorScheme),
        code_renderer: Rc::new(QrRenderer::new(config.qr.error_correction.clone())),
        notifier,
        spawner: Rc::new(LocalSpawner),
    }
}
