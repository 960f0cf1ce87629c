//! # Checkout server
//! This crate hosts the HTTP server for the storefront checkout. It is responsible for:
//! * Accepting carts from the storefront, turning them into orders and redirecting buyers to a hosted payment page.
//! * Serving the storefront product catalog.
//! * Serving the store owner's dashboard: the order listing and total revenue.
//! * Periodically marking orders that were never paid as abandoned.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `POST /api/{store_id}/checkout`: Creates an order from a cart and returns the payment page URL.
//! * `GET /api/{store_id}/products[/{product_id}]`: The storefront catalog.
//! * `GET /api/{store_id}/orders`, `GET /api/{store_id}/revenue`: Dashboard data. Store owners only.
pub mod auth;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod routes;
pub mod server;
pub mod sweep_worker;

#[cfg(test)]
mod endpoint_tests;
