//! Destinations for scan events.

use serde_json::Value;
use tokio::sync::mpsc;

use shelfscan_core::{EventKind, ScanEvent};

/// Receives events synchronously, once per event, in traversal order.
///
/// Implementations must not panic. The scanner never retries a delivery.
pub trait EventSink {
    /// Deliver one event.
    fn emit(&mut self, event: ScanEvent);
}

impl<F> EventSink for F
where
    F: FnMut(ScanEvent),
{
    fn emit(&mut self, event: ScanEvent) {
        self(event)
    }
}

/// Forwards events into a bounded tokio channel from a blocking thread.
///
/// Must be used off the async runtime (e.g. inside `spawn_blocking`), since
/// delivery blocks while the channel is full.
#[derive(Debug)]
pub struct ChannelSink {
    tx: mpsc::Sender<ScanEvent>,
    closed: bool,
}

impl ChannelSink {
    /// Wrap the sending half of a channel.
    pub fn new(tx: mpsc::Sender<ScanEvent>) -> Self {
        Self { tx, closed: false }
    }

    /// Whether the receiver has gone away.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl EventSink for ChannelSink {
    fn emit(&mut self, event: ScanEvent) {
        if self.closed {
            return;
        }
        if self.tx.blocking_send(event).is_err() {
            tracing::debug!("scan event receiver dropped, discarding further events");
            self.closed = true;
        }
    }
}

/// Adapt a `(kind, payload)` callback into an event sink.
///
/// The payload is the path string for heartbeats, the record object for
/// matches, and a message string for errors.
pub fn tagged<F>(mut on_event: F) -> impl FnMut(ScanEvent)
where
    F: FnMut(EventKind, Value),
{
    move |event: ScanEvent| on_event(event.kind(), event.payload())
}
