use cotodo_core::env::Spawn;
use futures::future::LocalBoxFuture;
use leptos::task::spawn_local;

/// Runs core futures on the Leptos local executor.
pub struct LocalSpawner;

impl Spawn for LocalSpawner {
    fn spawn(&self, future: LocalBoxFuture<'static, ()>) {
        spawn_local(future);
    }
}
