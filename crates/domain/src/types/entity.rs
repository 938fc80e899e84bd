//! Entity routing table
//!
//! Every entity the data layer serves maps to a cache namespace plus the
//! backend routes used to read and write it. The facade applies the same
//! online/offline policy to every kind; only this table differs.

use serde::{Deserialize, Serialize};

use crate::constants::TIME_WINDOW_KEY;
use crate::impl_domain_enum_conversions;

/// HTTP verb used on the backend contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Whether a failed request with this method is a mutation to queue.
    pub fn is_mutating(self) -> bool {
        !matches!(self, Self::Get)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl_domain_enum_conversions!(HttpMethod {
    Get => "get",
    Post => "post",
    Put => "put",
    Delete => "delete",
});

/// A resolved backend route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub method: HttpMethod,
    pub path: String,
}

impl Route {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self { method, path: path.into() }
    }
}

/// Kinds of entity served through the persistence facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Employee,
    Goals,
    Competencies,
    CompetencyMaster,
    SystemConfig,
    PerformanceSummary,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Employee,
        EntityKind::Goals,
        EntityKind::Competencies,
        EntityKind::CompetencyMaster,
        EntityKind::SystemConfig,
        EntityKind::PerformanceSummary,
    ];

    /// Cache namespace for this kind.
    pub fn namespace(self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Goals => "goals",
            Self::Competencies => "competencies",
            Self::CompetencyMaster => "competency_master",
            Self::SystemConfig => "system_config",
            Self::PerformanceSummary => "performance",
        }
    }

    /// Route used to fetch `key`.
    pub fn read_route(self, key: &str) -> Route {
        let path = match self {
            Self::Employee => format!("/employee/{key}"),
            Self::Goals => format!("/goals/{key}"),
            Self::Competencies => format!("/competencies/{key}"),
            Self::CompetencyMaster => "/competencies/master".to_string(),
            Self::SystemConfig => "/system/timewindow".to_string(),
            Self::PerformanceSummary => format!("/performance/summary/{key}"),
        };
        Route::new(HttpMethod::Get, path)
    }

    /// Route used to persist `key`, or `None` for read-only kinds.
    pub fn write_route(self, key: &str) -> Option<Route> {
        match self {
            Self::Employee => Some(Route::new(HttpMethod::Put, format!("/employee/{key}"))),
            Self::Goals => Some(Route::new(HttpMethod::Post, format!("/goals/{key}"))),
            Self::Competencies => {
                Some(Route::new(HttpMethod::Post, format!("/competencies/{key}")))
            }
            Self::SystemConfig => Some(Route::new(HttpMethod::Post, "/system/settings")),
            Self::CompetencyMaster | Self::PerformanceSummary => None,
        }
    }

    /// Key used for kinds that hold a single global record.
    pub fn singleton_key(self) -> Option<&'static str> {
        match self {
            Self::CompetencyMaster => Some("catalog"),
            Self::SystemConfig => Some(TIME_WINDOW_KEY),
            _ => None,
        }
    }
}

impl_domain_enum_conversions!(EntityKind {
    Employee => "employee",
    Goals => "goals",
    Competencies => "competencies",
    CompetencyMaster => "competency_master",
    SystemConfig => "system_config",
    PerformanceSummary => "performance",
});

/// Namespaced storage key, `namespace:key`.
pub fn namespaced_key(namespace: &str, key: &str) -> String {
    format!("{namespace}:{key}")
}
