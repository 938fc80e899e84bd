//! Employee records and performance summaries
//!
//! Created server-side and only ever fetched/cached on the client.

use serde::{Deserialize, Serialize};

use crate::impl_domain_enum_conversions;

/// Role tag attached to an employee record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Employee,
    Reviewer,
    Admin,
}

impl_domain_enum_conversions!(Role {
    Employee => "employee",
    Reviewer => "reviewer",
    Admin => "admin",
});

/// Employee master record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    pub employee_code: String,
    pub name: String,
    #[serde(default)]
    pub division: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub role: Role,
}

/// Read-only performance summary for one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub employee_code: String,
    #[serde(default)]
    pub goal_score: Option<f64>,
    #[serde(default)]
    pub competency_score: Option<f64>,
    #[serde(default)]
    pub overall_rating: Option<String>,
    /// Fields the backend adds that the data layer passes through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
