//! Client code for the fractalthorns API.
//!
//! This crate provides endpoint descriptors, the HTTP transport, and the
//! fetch-or-refresh operations that sit on top of the shared cache.

pub mod api;
pub mod endpoint;
pub mod transport;

pub use api::ThornsClient;
pub use endpoint::{ArgumentSpec, Arguments, Endpoint, EndpointDescriptor, HttpRequest};
pub use transport::{HttpTransport, Transport, TransportConfig};
