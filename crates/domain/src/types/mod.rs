//! Domain types and models

pub mod activity;
pub mod competency;
pub mod employee;
pub mod entity;
pub mod goals;
pub mod session;
pub mod sync;
pub mod time_window;

pub use activity::{ActivityEntry, ActivityKind};
pub use competency::{CompetencyDefinition, CompetencyEvaluation, CompetencyScore};
pub use employee::{EmployeeRecord, PerformanceSummary, Role};
pub use entity::{namespaced_key, EntityKind, HttpMethod, Route};
pub use goals::{Goal, GoalSet};
pub use session::{AccountLock, Session, SessionState};
pub use sync::{DrainReport, SyncTask};
pub use time_window::{
    month_in_range, MonthRange, TimeWindowConfig, WindowName, WindowRanges, WindowSettings,
    WindowStatus,
};
