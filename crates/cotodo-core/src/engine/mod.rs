//! Engine Layer
//!
//! Abstractions over the replicated-document engine and the in-memory
//! implementation the app and the tests run against.

mod local;
mod traits;


pub use local::LocalNode;
pub use traits::{AccessControl, Engine, Profiles, RecordStore};
