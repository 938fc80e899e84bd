//! Goal sheets
//!
//! Weightage totals and per-goal bounds belong to the business-rule layer;
//! this module only keeps the derived score consistent with its inputs.

use serde::{Deserialize, Serialize};

/// A single KRA with its KPIs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub title: String,
    #[serde(default)]
    pub kpis: Vec<String>,
    pub weightage: f64,
    #[serde(default)]
    pub mid_year_status: Option<String>,
    #[serde(default)]
    pub achieved_ratio: Option<f64>,
    #[serde(default)]
    pub calculated_score: Option<f64>,
}

impl Goal {
    /// `weightage × achieved_ratio / 100`, or `None` until a ratio is set.
    pub fn score(&self) -> Option<f64> {
        self.achieved_ratio.map(|ratio| self.weightage * ratio / 100.0)
    }

    pub fn set_weightage(&mut self, weightage: f64) {
        self.weightage = weightage;
        self.calculated_score = self.score();
    }

    pub fn set_achieved_ratio(&mut self, ratio: Option<f64>) {
        self.achieved_ratio = ratio;
        self.calculated_score = self.score();
    }
}

/// One goal sheet per employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSet {
    pub employee_code: String,
    #[serde(default)]
    pub goals: Vec<Goal>,
}

impl GoalSet {
    pub fn new(employee_code: impl Into<String>) -> Self {
        Self { employee_code: employee_code.into(), goals: Vec::new() }
    }

    /// Recompute every derived score from its inputs.
    pub fn recalculate(&mut self) {
        for goal in &mut self.goals {
            goal.calculated_score = goal.score();
        }
    }

    pub fn total_weightage(&self) -> f64 {
        self.goals.iter().map(|goal| goal.weightage).sum()
    }

    pub fn total_score(&self) -> f64 {
        self.goals.iter().filter_map(Goal::score).sum()
    }
}
