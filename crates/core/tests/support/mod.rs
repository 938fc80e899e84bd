//! Shared test helpers for `appraisal-core` integration tests.
//!
//! These helpers provide a scriptable backend and a fully wired data layer
//! so scenario tests can focus on behaviour instead of boilerplate.

#![allow(dead_code)]

pub mod harness;
pub mod transport;

pub use harness::Harness;
pub use transport::{Gate, MockTransport};
