//! HTTP client for the remote asset store.
//!
//! Async client using `reqwest`. Project and deployment endpoints are
//! authenticated with the account API token; asset endpoints use the
//! short-lived upload JWT obtained from [`Client::upload_token`].

pub mod client;

pub use client::{Client, ClientConfig, Error};
