//! Time window state resolution
//!
//! Status is recomputed on every query from the admin configuration held in
//! the local cache. When no admin configuration has ever been cached the
//! calendar fallback applies: a window is editable exactly when the current
//! month lies inside its configured range.

use std::sync::Arc;

use appraisal_common::time::Clock;
use appraisal_domain::{
    EntityKind, TimeWindowConfig, WindowName, WindowRanges, WindowStatus,
};
use serde::Serialize;
use tracing::{debug, warn};

use crate::persistence::PersistenceFacade;

/// Which source produced the effective configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowSource {
    Admin,
    Calendar,
}

/// Effective configuration plus its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResolvedWindows {
    pub config: TimeWindowConfig,
    pub source: WindowSource,
}

/// Answers "what state is window X in right now".
pub struct TimeWindowResolver {
    facade: Arc<PersistenceFacade>,
    ranges: WindowRanges,
    clock: Arc<dyn Clock>,
}

impl TimeWindowResolver {
    pub fn new(facade: Arc<PersistenceFacade>, ranges: WindowRanges, clock: Arc<dyn Clock>) -> Self {
        Self { facade, ranges, clock }
    }

    pub fn status(&self, name: WindowName) -> WindowStatus {
        self.resolve().config.status(name)
    }

    pub fn is_editable(&self, name: WindowName) -> bool {
        self.status(name).is_editable()
    }

    /// Effective configuration from the cache or the calendar.
    pub fn resolve(&self) -> ResolvedWindows {
        let key = EntityKind::SystemConfig.singleton_key().unwrap_or_default();
        match self.facade.cached::<TimeWindowConfig>(EntityKind::SystemConfig, key) {
            Some(config) => ResolvedWindows { config, source: WindowSource::Admin },
            None => ResolvedWindows {
                config: TimeWindowConfig::from_calendar(&self.ranges, self.clock.current_month()),
                source: WindowSource::Calendar,
            },
        }
    }

    /// Status of every window, in lifecycle order.
    pub fn snapshot(&self) -> Vec<(WindowName, WindowStatus)> {
        let resolved = self.resolve();
        WindowName::ALL.into_iter().map(|name| (name, resolved.config.status(name))).collect()
    }

    /// Fetch the admin configuration through the facade so later queries
    /// see it. Failures leave the previous state in place.
    pub async fn refresh(&self) -> ResolvedWindows {
        match self.facade.time_window().await {
            Ok(tagged) => debug!(freshness = ?tagged.freshness, "time window config refreshed"),
            Err(err) => warn!(error = %err, "time window config unavailable; using fallback"),
        }
        self.resolve()
    }
}

impl std::fmt::Debug for TimeWindowResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeWindowResolver").field("ranges", &self.ranges).finish()
    }
}
