//! Change notification publishing/subscription (mechanics only).
//!
//! The bus replaces reactive re-rendering: after a session applies a change it
//! publishes one message, and every subscriber receives its own copy.
//!
//! - **Broadcast**: each subscription sees every message published after it
//!   was created.
//! - **No persistence**: the audit log is the record; the bus only notifies.
//! - **Best-effort**: a failed publish never rolls back the change.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvError, TryRecvError};

/// A subscription to a change stream.
///
/// ```ignore
/// let subscription = session.subscribe();
/// session.purchase("Headset", 2)?;
///
/// while let Ok(envelope) = subscription.try_recv() {
///     redraw(envelope.payload());
/// }
/// ```
///
/// Subscriptions are meant for single-threaded consumption.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Drain every message that is already queued, without blocking.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

/// Domain-agnostic pub/sub abstraction.
///
/// The trait requires `Send + Sync` so a bus can be shared behind an `Arc`
/// with a presentation thread, even though the session itself is
/// single-threaded.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
