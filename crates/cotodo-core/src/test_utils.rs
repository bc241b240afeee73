//! In-memory fakes of the browser collaborators, plus a `TestBed` that wires
//! them to a `LocalNode` session.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use futures::future::LocalBoxFuture;

use crate::config::Config;
use crate::engine::{Engine, LocalNode};
use crate::env::{Clipboard, CodeRenderer, ColorScheme, Environment, Location, Notifier, Spawn, Toast};
use crate::observer::{Listener, Observers, Subscription};
use crate::session::Session;

pub const BASE_URL: &str = "https://todo.example/";

pub struct MemoryLocation {
    fragment: RefCell<String>,
    observers: Rc<Observers>,
    writes: Cell<usize>,
}

impl MemoryLocation {
    pub fn new(fragment: &str) -> Self {
        Self {
            fragment: RefCell::new(fragment.trim_start_matches('#').to_string()),
            observers: Observers::new(),
            writes: Cell::new(0),
        }
    }

    /// Number of effective fragment rewrites.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    pub fn listeners(&self) -> usize {
        self.observers.len()
    }
}

impl Location for MemoryLocation {
    fn fragment(&self) -> String {
        self.fragment.borrow().clone()
    }

    fn set_fragment(&self, fragment: &str) {
        let fragment = fragment.trim_start_matches('#');
        if *self.fragment.borrow() == fragment {
            return;
        }
        *self.fragment.borrow_mut() = fragment.to_string();
        self.writes.set(self.writes.get() + 1);
        self.observers.notify();
    }

    fn base_url(&self) -> String {
        BASE_URL.to_string()
    }

    fn on_change(&self, listener: Listener) -> Subscription {
        self.observers.subscribe(listener)
    }
}

#[derive(Default)]
pub struct MemoryClipboard {
    pub contents: RefCell<Option<String>>,
    pub fail: Cell<bool>,
}

#[async_trait(?Send)]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<(), String> {
        if self.fail.get() {
            return Err("clipboard access denied".to_string());
        }
        *self.contents.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct FixedScheme {
    pub dark: Cell<bool>,
}

impl ColorScheme for FixedScheme {
    fn prefers_dark(&self) -> bool {
        self.dark.get()
    }
}

#[derive(Default)]
pub struct FakeCodeRenderer {
    pub fail: Cell<bool>,
    pub calls: Cell<usize>,
}

#[async_trait(?Send)]
impl CodeRenderer for FakeCodeRenderer {
    async fn render(&self, text: &str) -> Result<String, String> {
        self.calls.set(self.calls.get() + 1);
        if self.fail.get() {
            return Err("encoder unavailable".to_string());
        }
        Ok(format!("data:image/png;base64,{}", text.len()))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub toasts: RefCell<Vec<Toast>>,
}

impl Notifier for RecordingNotifier {
    fn notify(&self, toast: Toast) {
        self.toasts.borrow_mut().push(toast);
    }
}

/// Queues spawned futures until `run_until_idle` drives them.
#[derive(Default)]
pub struct QueueSpawner {
    queue: RefCell<VecDeque<LocalBoxFuture<'static, ()>>>,
}

impl QueueSpawner {
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Run queued futures, including ones they spawn, until the queue is empty.
    pub async fn run_until_idle(&self) {
        loop {
            let next = self.queue.borrow_mut().pop_front();
            match next {
                Some(future) => future.await,
                None => break,
            }
        }
    }
}

impl Spawn for QueueSpawner {
    fn spawn(&self, future: LocalBoxFuture<'static, ()>) {
        self.queue.borrow_mut().push_back(future);
    }
}

/// A session over a `LocalNode` with every collaborator faked.
pub struct TestBed {
    pub node: LocalNode,
    pub session: Session,
    pub location: Rc<MemoryLocation>,
    pub clipboard: Rc<MemoryClipboard>,
    pub scheme: Rc<FixedScheme>,
    pub renderer: Rc<FakeCodeRenderer>,
    pub notifier: Rc<RecordingNotifier>,
    pub spawner: Rc<QueueSpawner>,
}

impl TestBed {
    pub fn new(name: &str) -> Self {
        Self::for_node(LocalNode::new(name), "")
    }

    pub fn for_node(node: LocalNode, fragment: &str) -> Self {
        Self::with_engine(node.clone(), Rc::new(node), fragment)
    }

    /// Like `for_node`, but the session talks to `engine`, which is expected
    /// to wrap `node`.
    pub fn with_engine(node: LocalNode, engine: Rc<dyn Engine>, fragment: &str) -> Self {
        let location = Rc::new(MemoryLocation::new(fragment));
        let clipboard = Rc::new(MemoryClipboard::default());
        let scheme = Rc::new(FixedScheme::default());
        let renderer = Rc::new(FakeCodeRenderer::default());
        let notifier = Rc::new(RecordingNotifier::default());
        let spawner = Rc::new(QueueSpawner::default());

        let env = Environment {
            location: location.clone(),
            clipboard: clipboard.clone(),
            color_scheme: scheme.clone(),
            code_renderer: renderer.clone(),
            notifier: notifier.clone(),
            spawner: spawner.clone(),
        };
        let session = Session::new(engine, env, Config::default());

        Self {
            node,
            session,
            location,
            clipboard,
            scheme,
            renderer,
            notifier,
            spawner,
        }
    }

    /// Another participant sharing this bed's replica, with its own page.
    pub fn peer(&self, name: &str) -> Self {
        Self::for_node(self.node.peer(name), "")
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.notifier.toasts.borrow().clone()
    }
}
