//! Port interfaces for the persistence facade

use appraisal_domain::EntityKind;
use serde_json::Value;

/// Business validation applied to a payload before any save is attempted.
///
/// A rejected payload is reported to the caller and never queued for replay.
pub trait EntityValidator: Send + Sync {
    /// Return `Err(message)` to reject `payload`.
    fn validate(&self, kind: EntityKind, payload: &Value) -> Result<(), String>;
}

impl<F> EntityValidator for F
where
    F: Fn(EntityKind, &Value) -> Result<(), String> + Send + Sync,
{
    fn validate(&self, kind: EntityKind, payload: &Value) -> Result<(), String> {
        self(kind, payload)
    }
}
