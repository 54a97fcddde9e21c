use crate::application::ports::connectivity::Connectivity;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Connectivity monitor backed by a watch channel. The host environment
/// reports state via `set_online`; redundant reports of the same state are
/// dropped at the sender, so each wake a subscriber sees is a genuine
/// transition.
pub struct ConnectionMonitor {
    tx: watch::Sender<bool>,
}

impl ConnectionMonitor {
    pub fn new(initially_online: bool) -> Self {
        let (tx, _rx) = watch::channel(initially_online);
        Self { tx }
    }

    pub fn set_online(&self, online: bool) {
        self.tx.send_if_modified(|state| {
            if *state != online {
                tracing::info!(online, "connectivity changed");
                *state = online;
                true
            } else {
                false
            }
        });
    }

    /// Runs `callback` on every transition until the returned guard is
    /// dropped.
    pub fn on_change<F>(&self, callback: F) -> OnChangeGuard
    where
        F: Fn(bool) + Send + 'static,
    {
        let mut rx = self.tx.subscribe();
        let handle = tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let online = *rx.borrow_and_update();
                callback(online);
            }
        });

        OnChangeGuard { handle }
    }
}

impl Connectivity for ConnectionMonitor {
    fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    fn watch_online(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

/// Unsubscribes on drop.
pub struct OnChangeGuard {
    handle: JoinHandle<()>,
}

impl Drop for OnChangeGuard {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
