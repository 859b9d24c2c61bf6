//! Shutdown coordination for the gateway.
//!
//! `startup::run` owns one `Shutdown`, hands a receiver to `HttpServer::run`,
//! and triggers it when SIGINT or SIGTERM arrives. The server treats both a
//! received message and a closed channel as the start of the drain.

use tokio::sync::broadcast;

/// Fans a single stop request out to the server and any other listener.
pub struct Shutdown {
    notify: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        // One slot: only the first trigger matters.
        let (notify, _) = broadcast::channel(1);
        Self { notify }
    }

    /// Receiver that resolves once `trigger` is called or `self` is dropped.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.notify.subscribe()
    }

    /// Ask every subscriber to stop. A no-op when nobody is listening.
    pub fn trigger(&self) {
        let _ = self.notify.send(());
    }

    /// Subscribers whose receivers are still alive.
    pub fn receiver_count(&self) -> usize {
        self.notify.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}
