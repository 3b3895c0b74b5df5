//! Bounded hand-off between the HTTP boundary and the worker.
//!
//! Any number of request handlers hold an [`EventSender`]; exactly one
//! worker owns the [`EventReceiver`]. Events come out in the order they
//! were accepted. When the buffer is full, [`EventSender::enqueue`] waits
//! for the worker to make room, which backs pressure up into the HTTP
//! request that delivered the event.

use thiserror::Error;
use tokio::sync::mpsc;

use crate::webhooks::ThemeEvent;

/// Number of accepted events buffered ahead of the worker.
pub const QUEUE_CAPACITY: usize = 10;

/// The worker has stopped; the rejected event is handed back.
#[derive(Debug, Error)]
#[error("event queue is closed")]
pub struct QueueClosed(pub Box<ThemeEvent>);

/// Producer half of the event queue.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::Sender<ThemeEvent>,
}

impl EventSender {
    /// Queues `event` for the worker, waiting while the buffer is full.
    pub async fn enqueue(&self, event: ThemeEvent) -> Result<(), QueueClosed> {
        self.tx
            .send(event)
            .await
            .map_err(|mpsc::error::SendError(event)| QueueClosed(Box::new(event)))
    }

    /// Returns true once the receiver has been dropped or closed.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Free slots in the buffer right now.
    pub fn capacity(&self) -> usize {
        self.tx.capacity()
    }
}

/// Consumer half of the event queue.
#[derive(Debug)]
pub struct EventReceiver {
    rx: mpsc::Receiver<ThemeEvent>,
}

impl EventReceiver {
    /// Waits for the next event. Returns `None` once every sender is gone
    /// and the buffer is drained.
    pub async fn recv(&mut self) -> Option<ThemeEvent> {
        self.rx.recv().await
    }

    /// Takes the next event if one is already buffered.
    pub fn try_recv(&mut self) -> Option<ThemeEvent> {
        self.rx.try_recv().ok()
    }

    /// Stops accepting new events. Buffered events can still be received.
    pub fn close(&mut self) {
        self.rx.close();
    }
}

/// Creates a queue buffering up to `capacity` events.
pub fn channel(capacity: usize) -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (EventSender { tx }, EventReceiver { rx })
}
