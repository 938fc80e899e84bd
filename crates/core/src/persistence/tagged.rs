//! Freshness tagging for facade results

use serde::Serialize;

/// Where a facade result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    /// Confirmed by the backend during this call.
    Live,
    /// Served from the local cache after the backend was unreachable.
    Stale,
    /// Saved locally and queued for replay.
    Queued,
}

/// A value together with its [`Freshness`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tagged<T> {
    pub value: T,
    pub freshness: Freshness,
}

impl<T> Tagged<T> {
    pub fn live(value: T) -> Self {
        Self { value, freshness: Freshness::Live }
    }

    pub fn stale(value: T) -> Self {
        Self { value, freshness: Freshness::Stale }
    }

    pub fn queued(value: T) -> Self {
        Self { value, freshness: Freshness::Queued }
    }

    /// True unless the backend confirmed the value during this call.
    pub fn is_offline(&self) -> bool {
        self.freshness != Freshness::Live
    }

    pub fn into_inner(self) -> T {
        self.value
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Tagged<U> {
        Tagged { value: f(self.value), freshness: self.freshness }
    }
}
