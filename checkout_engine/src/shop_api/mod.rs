//! The public face of the engine.
//!
//! Each API object wraps a backend (anything implementing the traits in [`crate::traits`]) and exposes the operations
//! the server needs. None of them hold mutable state of their own, so they can be cloned into every worker.
pub mod cart_validator;
pub mod catalog_api;
pub mod catalog_objects;
pub mod checkout_api;
pub mod checkout_objects;
pub mod errors;
pub mod order_flow_api;
pub mod order_objects;
pub mod pricing;
pub mod revenue_api;
