//! Persistence facade: the online/offline policy shared by every entity.

pub mod facade;
pub mod ports;
pub mod tagged;

pub use facade::{PersistenceFacade, AUTH_PATH};
pub use ports::EntityValidator;
pub use tagged::{Freshness, Tagged};
