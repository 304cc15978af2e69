//! HTTP access to the marketplace API
//!
//! `Transport` is the seam: `RestTransport` talks to the real server through
//! reqwest, tests substitute their own implementation. `ApiClient` pairs a
//! transport with a credential store and attaches the bearer token to every
//! request.

pub mod transport;
pub mod client;
pub mod envelope;

pub use transport::{ApiRequest, ApiResponse, RestTransport, Transport};
pub use client::ApiClient;
