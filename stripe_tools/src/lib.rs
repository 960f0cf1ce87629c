//! A small client for the parts of the Stripe API the checkout server needs: creating hosted Checkout Sessions.
mod api;
mod config;
mod data_objects;
mod error;

pub use api::StripeApi;
pub use config::StripeConfig;
pub use data_objects::{CheckoutSession, NewCheckoutSession, SessionLineItem};
pub use error::StripeApiError;
