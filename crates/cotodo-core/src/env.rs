//! Browser collaborators
//!
//! Everything the session needs from the page: the addressable location,
//! the clipboard, the color-scheme preference, an image encoder for invite
//! codes, transient notifications and a local executor.

use std::rc::Rc;

use async_trait::async_trait;
use futures::future::LocalBoxFuture;

use crate::observer::{Listener, Subscription};

/// The page's addressable location.
pub trait Location {
    /// Current fragment without the leading `#`.
    fn fragment(&self) -> String;

    /// Replace the fragment. Implementations fire change listeners only when
    /// the value actually changes.
    fn set_fragment(&self, fragment: &str);

    /// Origin and path of the page, used as the base of shareable links.
    fn base_url(&self) -> String;

    fn on_change(&self, listener: Listener) -> Subscription;
}

#[async_trait(?Send)]
pub trait Clipboard {
    async fn write_text(&self, text: &str) -> Result<(), String>;
}

pub trait ColorScheme {
    fn prefers_dark(&self) -> bool;
}

/// Encodes a string as a scannable image, returned as a data URL.
#[async_trait(?Send)]
pub trait CodeRenderer {
    async fn render(&self, text: &str) -> Result<String, String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Error,
}

/// A transient notification shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub title: String,
    pub description: Option<String>,
    /// Image data URL shown with the toast
    pub image: Option<String>,
}

impl Toast {
    pub fn info(title: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Info,
            title: title.into(),
            description: None,
            image: None,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: ToastKind::Error,
            title: title.into(),
            description: Some(description.into()),
            image: None,
        }
    }

    pub fn with_image(mut self, image: String) -> Self {
        self.image = Some(image);
        self
    }
}

pub trait Notifier {
    fn notify(&self, toast: Toast);
}

/// Runs a future in the background on the current thread.
pub trait Spawn {
    fn spawn(&self, future: LocalBoxFuture<'static, ()>);
}

/// Bundle of collaborators, cheap to clone.
#[derive(Clone)]
pub struct Environment {
    pub location: Rc<dyn Location>,
    pub clipboard: Rc<dyn Clipboard>,
    pub color_scheme: Rc<dyn ColorScheme>,
    pub code_renderer: Rc<dyn CodeRenderer>,
    pub notifier: Rc<dyn Notifier>,
    pub spawner: Rc<dyn Spawn>,
}
