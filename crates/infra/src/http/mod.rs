//! HTTP transport for the request gateway.

mod client;

pub use client::{HttpTransport, HttpTransportBuilder};
