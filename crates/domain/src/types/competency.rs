//! Competency evaluations and the competency catalog

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Reviewer scores for one competency.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetencyScore {
    #[serde(default)]
    pub behavior_one: String,
    #[serde(default)]
    pub behavior_two: String,
    #[serde(default)]
    pub score_one: Option<u8>,
    #[serde(default)]
    pub score_two: Option<u8>,
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub remarks: Option<String>,
}

impl CompetencyScore {
    /// Arithmetic mean of both scores, only when both are present.
    pub fn average(&self) -> Option<f64> {
        match (self.score_one, self.score_two) {
            (Some(a), Some(b)) => Some((f64::from(a) + f64::from(b)) / 2.0),
            _ => None,
        }
    }
}

/// All competency scores for one employee, keyed by competency id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetencyEvaluation {
    pub employee_code: String,
    #[serde(default)]
    pub competencies: BTreeMap<String, CompetencyScore>,
}

impl CompetencyEvaluation {
    pub fn new(employee_code: impl Into<String>) -> Self {
        Self { employee_code: employee_code.into(), competencies: BTreeMap::new() }
    }

    pub fn recalculate(&mut self) {
        for score in self.competencies.values_mut() {
            score.total = score.average();
        }
    }
}

/// Catalog entry served by `/competencies/master`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetencyDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub behaviors: Vec<String>,
}
