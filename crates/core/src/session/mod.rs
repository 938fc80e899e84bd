//! Session authority and the local activity log.

pub mod activity;
pub mod authority;

pub use activity::ActivityLog;
pub use authority::SessionAuthority;
