//! Session and membership model of a collaborative to-do list.
//!
//! Lists and tasks live in a replicated-document engine (see [`engine`]).
//! This crate decides which list a page shows ([`router`]), keeps a live view
//! of it ([`view_model`]), gates and shares access ([`access`]) and shows who
//! edited what ([`attribution`]). Nothing here depends on a UI framework; the
//! browser is reached through the traits in [`env`].

pub mod access;
pub mod attribution;
pub mod config;
pub mod domain;
pub mod engine;
pub mod env;
pub mod error;
pub mod observer;
pub mod router;
pub mod session;
pub mod view_model;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;

pub use access::InviteManager;
pub use attribution::{badge_for, badge_for_account, Badge, BadgeColors, BadgeStyle};
pub use config::{Config, ConfigError};
pub use engine::{Engine, LocalNode};
pub use error::{ActionError, ActionResult, EngineError, EngineResult};
pub use observer::{Listener, Observers, Subscription};
pub use router::SessionRouter;
pub use session::Session;
pub use view_model::{FilterMode, ListView, ListViewModel, TaskRow};
