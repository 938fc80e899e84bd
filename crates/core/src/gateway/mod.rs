//! Backend request gateway with timeout and bounded retry.

pub mod client;
pub mod ports;

pub use client::{RequestGateway, RetryPolicy};
pub use ports::{ApiRequest, ApiResponse, GatewayError, Transport};
