//! # Subscription payment server
//! This module hosts the HTTP surface of the payment engine. It is responsible for:
//! Listening for incoming bank transfer webhooks from the payment provider.
//! Authenticating each call via HMAC signature or API key.
//! Normalizing the payload, recording the receipt, and driving reconciliation and renewals.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/webhook/payment`: The webhook route for receiving bank transfer notifications.

pub mod auth;
pub mod bank_transaction;
pub mod config;
pub mod errors;
pub mod notifier;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
