//! Lifecycle window resolution.

pub mod resolver;

pub use resolver::{ResolvedWindows, TimeWindowResolver, WindowSource};
