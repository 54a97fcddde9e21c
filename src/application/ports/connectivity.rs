use tokio::sync::watch;

/// Connectivity as seen by the host environment.
pub trait Connectivity: Send + Sync {
    /// Synchronous point-in-time query, no side effects.
    fn is_online(&self) -> bool;

    /// Receiver that wakes on genuine transitions only; redundant reports of
    /// the same state are suppressed at the sender. Extremely rapid
    /// flip-flops may coalesce but are never reordered.
    fn watch_online(&self) -> watch::Receiver<bool>;
}
