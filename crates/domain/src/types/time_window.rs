//! Time window types
//!
//! Four admin-controlled windows gate editability across every review
//! module. Each window resolves to one of three states; the admin record is
//! the source of truth and the calendar ranges are the fallback.

use serde::{Deserialize, Serialize};

use crate::impl_domain_enum_conversions;

/// Named lifecycle window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WindowName {
    GoalSetting,
    MidYear,
    YearEnd,
    Competency,
}

impl WindowName {
    /// All windows in lifecycle order.
    pub const ALL: [WindowName; 4] =
        [WindowName::GoalSetting, WindowName::MidYear, WindowName::YearEnd, WindowName::Competency];
}

impl_domain_enum_conversions!(WindowName {
    GoalSetting => "goalsetting",
    MidYear => "midyear",
    YearEnd => "yearend",
    Competency => "competency",
});

/// Resolved state of a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowStatus {
    Inactive,
    ActiveEditable,
    ActiveReadOnly,
}

impl WindowStatus {
    pub fn is_active(self) -> bool {
        !matches!(self, Self::Inactive)
    }

    pub fn is_editable(self) -> bool {
        matches!(self, Self::ActiveEditable)
    }
}

impl_domain_enum_conversions!(WindowStatus {
    Inactive => "inactive",
    ActiveEditable => "active_editable",
    ActiveReadOnly => "active_read_only",
});

/// Wrap-around aware month containment.
///
/// `start` and `end` are inclusive 1-based months. When `start > end` the
/// range spans the year boundary (`12..=1` contains December and January).
/// Any month outside `1..=12` is treated as not contained.
pub fn month_in_range(month: u32, start: u32, end: u32) -> bool {
    let valid = 1..=12;
    if !valid.contains(&month) || !valid.contains(&start) || !valid.contains(&end) {
        return false;
    }

    if start <= end {
        start <= month && month <= end
    } else {
        start <= month || month <= end
    }
}

/// Inclusive calendar month range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthRange {
    pub start_month: u32,
    pub end_month: u32,
}

impl MonthRange {
    pub const fn new(start_month: u32, end_month: u32) -> Self {
        Self { start_month, end_month }
    }

    pub fn contains(&self, month: u32) -> bool {
        month_in_range(month, self.start_month, self.end_month)
    }

    pub fn is_valid(&self) -> bool {
        (1..=12).contains(&self.start_month) && (1..=12).contains(&self.end_month)
    }
}

/// Admin settings for a single window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSettings {
    pub active: bool,
    #[serde(default)]
    pub read_only: bool,
    pub start_month: u32,
    pub end_month: u32,
}

impl WindowSettings {
    /// State derived from the admin flags.
    pub fn status(&self) -> WindowStatus {
        match (self.active, self.read_only) {
            (false, _) => WindowStatus::Inactive,
            (true, true) => WindowStatus::ActiveReadOnly,
            (true, false) => WindowStatus::ActiveEditable,
        }
    }

    pub fn range(&self) -> MonthRange {
        MonthRange::new(self.start_month, self.end_month)
    }
}

/// Single admin-owned record holding all four windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeWindowConfig {
    pub goal_setting: WindowSettings,
    pub mid_year: WindowSettings,
    pub year_end: WindowSettings,
    pub competency: WindowSettings,
}

impl TimeWindowConfig {
    pub fn window(&self, name: WindowName) -> &WindowSettings {
        match name {
            WindowName::GoalSetting => &self.goal_setting,
            WindowName::MidYear => &self.mid_year,
            WindowName::YearEnd => &self.year_end,
            WindowName::Competency => &self.competency,
        }
    }

    pub fn window_mut(&mut self, name: WindowName) -> &mut WindowSettings {
        match name {
            WindowName::GoalSetting => &mut self.goal_setting,
            WindowName::MidYear => &mut self.mid_year,
            WindowName::YearEnd => &mut self.year_end,
            WindowName::Competency => &mut self.competency,
        }
    }

    pub fn status(&self, name: WindowName) -> WindowStatus {
        self.window(name).status()
    }

    /// Config derived purely from the calendar: a window is active and
    /// editable when `month` falls inside its range.
    pub fn from_calendar(ranges: &WindowRanges, month: u32) -> Self {
        let settings = |range: MonthRange| WindowSettings {
            active: range.contains(month),
            read_only: false,
            start_month: range.start_month,
            end_month: range.end_month,
        };

        Self {
            goal_setting: settings(ranges.goal_setting),
            mid_year: settings(ranges.mid_year),
            year_end: settings(ranges.year_end),
            competency: settings(ranges.competency),
        }
    }

    /// Names of all windows currently active.
    pub fn active_windows(&self) -> Vec<WindowName> {
        WindowName::ALL.into_iter().filter(|name| self.status(*name).is_active()).collect()
    }
}

/// Calendar fallback ranges for the four windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowRanges {
    pub goal_setting: MonthRange,
    pub mid_year: MonthRange,
    pub year_end: MonthRange,
    pub competency: MonthRange,
}

impl WindowRanges {
    pub fn range(&self, name: WindowName) -> MonthRange {
        match name {
            WindowName::GoalSetting => self.goal_setting,
            WindowName::MidYear => self.mid_year,
            WindowName::YearEnd => self.year_end,
            WindowName::Competency => self.competency,
        }
    }
}

impl Default for WindowRanges {
    fn default() -> Self {
        use crate::constants::{
            COMPETENCY_MONTHS, GOAL_SETTING_MONTHS, MID_YEAR_MONTHS, YEAR_END_MONTHS,
        };

        Self {
            goal_setting: MonthRange::new(GOAL_SETTING_MONTHS.0, GOAL_SETTING_MONTHS.1),
            mid_year: MonthRange::new(MID_YEAR_MONTHS.0, MID_YEAR_MONTHS.1),
            year_end: MonthRange::new(YEAR_END_MONTHS.0, YEAR_END_MONTHS.1),
            competency: MonthRange::new(COMPETENCY_MONTHS.0, COMPETENCY_MONTHS.1),
        }
    }
}
