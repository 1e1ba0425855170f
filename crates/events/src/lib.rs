//! Change events and their in-process distribution.
//!
//! Aggregates decide events, sessions apply them and then publish an
//! [`EventEnvelope`] on an [`EventBus`] so presentation layers learn about
//! the change without polling.

pub mod bus;
pub mod envelope;
pub mod event;
pub mod handler;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use envelope::EventEnvelope;
pub use event::Event;
pub use handler::execute;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
