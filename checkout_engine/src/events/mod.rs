//! Order lifecycle events.
//!
//! The engine publishes an event whenever an order is created, paid or abandoned. Interested parties register
//! closures in [`EventHooks`]; each hook runs on its own tokio task and never blocks the request that triggered it.
mod channel;
mod event_types;
mod hooks;

pub use channel::{EventHandler, EventProducer, Handler};
pub use event_types::*;
pub use hooks::{EventHandlers, EventHooks, EventProducers};
