//! Store connection lifecycle events.
//!
//! Lifecycle transitions are published on a broadcast channel, independent
//! of any push or read call, and consumed by an operational reporter.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::observability::{metrics, OPS_TARGET};

/// A transition of the store client's connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// A connection attempt to `endpoint` has started.
    Connecting { endpoint: String },
    /// The transport is established.
    Connected,
    /// The store answered a health probe and accepts commands.
    Ready,
    /// A connection or command error was observed.
    Error(String),
    /// The client was closed.
    End,
}

/// Broadcast channel of [`ConnectionEvent`]s.
#[derive(Debug, Clone)]
pub struct ConnectionEvents {
    tx: broadcast::Sender<ConnectionEvent>,
}

impl ConnectionEvents {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ConnectionEvent> {
        self.tx.subscribe()
    }

    /// Publish an event. Events with no subscriber are dropped.
    pub fn emit(&self, event: ConnectionEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for ConnectionEvents {
    fn default() -> Self {
        Self::new(64)
    }
}

/// Spawn a task that reports every event on the operational log target.
///
/// The task exits once every sender has been dropped.
pub fn spawn_reporter(events: &ConnectionEvents) -> JoinHandle<()> {
    let mut rx = events.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => report(&event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(target: OPS_TARGET, skipped, "Connection event reporter lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

fn report(event: &ConnectionEvent) {
    match event {
        ConnectionEvent::Connecting { endpoint } => {
            tracing::info!(target: OPS_TARGET, endpoint = %endpoint, "Connecting to store");
        }
        ConnectionEvent::Connected => {
            tracing::info!(target: OPS_TARGET, "Connected to store");
        }
        ConnectionEvent::Ready => {
            tracing::info!(target: OPS_TARGET, "Store connection is ready");
            metrics::record_connection_state(true);
        }
        ConnectionEvent::Error(message) => {
            tracing::error!(target: OPS_TARGET, error = %message, "Store error");
        }
        ConnectionEvent::End => {
            tracing::info!(target: OPS_TARGET, "Store connection closed");
            metrics::record_connection_state(false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_see_events_in_order() {
        let events = ConnectionEvents::default();
        let mut rx = events.subscribe();

        events.emit(ConnectionEvent::Connected);
        events.emit(ConnectionEvent::Ready);
        events.emit(ConnectionEvent::Error("reset by peer".to_string()));

        assert_eq!(rx.recv().await.unwrap(), ConnectionEvent::Connected);
        assert_eq!(rx.recv().await.unwrap(), ConnectionEvent::Ready);
        assert_eq!(
            rx.recv().await.unwrap(),
            ConnectionEvent::Error("reset by peer".to_string())
        );
    }

    #[tokio::test]
    async fn test_reporter_exits_when_senders_drop() {
        let events = ConnectionEvents::default();
        let handle = spawn_reporter(&events);

        events.emit(ConnectionEvent::End);
        drop(events);

        tokio::time::timeout(std::time::Duration::from_secs(1), handle)
            .await
            .expect("reporter should stop")
            .unwrap();
    }

    #[test]
    fn test_emit_without_subscribers() {
        let events = ConnectionEvents::new(4);
        events.emit(ConnectionEvent::Connected);
    }
}
