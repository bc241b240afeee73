//! Session handle
//!
//! The explicitly passed context every component works against: one engine
//! handle, the browser collaborators and the configuration.

use std::rc::Rc;

use crate::config::Config;
use crate::engine::Engine;
use crate::env::{Environment, Toast};

#[derive(Clone)]
pub struct Session {
    engine: Rc<dyn Engine>,
    env: Environment,
    config: Rc<Config>,
}

impl Session {
    pub fn new(engine: Rc<dyn Engine>, env: Environment, config: Config) -> Self {
        Self {
            engine,
            env,
            config: Rc::new(config),
        }
    }

    pub fn engine(&self) -> &dyn Engine {
        self.engine.as_ref()
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn notify(&self, toast: Toast) {
        self.env.notifier.notify(toast);
    }
}
