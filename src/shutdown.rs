use async_shutdown::{ShutdownManager, ShutdownSignal};

/// Cancellation handle threaded through a drain.
///
/// Eviction workers and the disappearance waiter select on
/// [`Shutdown::wait_shutdown_triggered`] at every API call and every sleep,
/// so an in-flight drain unwinds promptly when the caller shuts down.
#[derive(Clone)]
pub struct Shutdown {
    manager: ShutdownManager<()>,
}

impl Shutdown {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Shutdown {
        Shutdown {
            manager: ShutdownManager::new(),
        }
    }

    pub fn trigger_shutdown(&self) {
        _ = self.manager.trigger_shutdown(());
    }

    pub fn is_shutdown_triggered(&self) -> bool {
        self.manager.is_shutdown_triggered()
    }

    pub fn wait_shutdown_triggered(&self) -> ShutdownSignal<()> {
        self.manager.wait_shutdown_triggered()
    }
}
