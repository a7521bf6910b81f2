//! Clients - HTTP Clients for External APIs
//!
//! This module contains the gateway contract and its HTTP implementation
//! for the yard backend.

pub mod api_client;
pub mod gateway;

#[cfg(test)]
pub(crate) mod fake;

pub use api_client::ApiClient;
pub use gateway::MotoGateway;
