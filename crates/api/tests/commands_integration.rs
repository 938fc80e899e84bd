//! End-to-end command tests against a mock backend.

mod support;

use std::time::Duration;

use appraisal_core::persistence::Freshness;
use appraisal_domain::{
    AppraisalError, Goal, GoalSet, Role, TimeWindowConfig, WindowName, WindowSettings,
};
use appraisal_lib::commands;
use serde_json::json;
use support::TestApp;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

fn goal_sheet(code: &str, weightage: f64) -> GoalSet {
    let mut goals = GoalSet::new(code);
    goals.goals.push(Goal {
        title: "Reduce onboarding time".into(),
        kpis: vec!["days to first commit".into()],
        weightage,
        mid_year_status: None,
        achieved_ratio: Some(80.0),
        calculated_score: None,
    });
    goals
}

fn window(active: bool, read_only: bool, start_month: u32, end_month: u32) -> WindowSettings {
    WindowSettings { active, read_only, start_month, end_month }
}

#[tokio::test]
async fn commands_require_a_session() {
    let app = TestApp::start().await;

    let err = commands::get_goals(&app.ctx, "E100").await.unwrap_err();
    assert!(matches!(err, AppraisalError::Auth(_)));

    let err = commands::window_statuses(&app.ctx).await.unwrap_err();
    assert!(matches!(err, AppraisalError::Auth(_)));
}

#[tokio::test]
async fn employee_reads_own_goals_but_not_others() {
    let app = TestApp::start().await;
    app.allow_login("E100", Role::Employee).await;
    Mock::given(method("GET"))
        .and(path("/api/goals/E100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "employeeCode": "E100",
            "goals": [{"title": "Ship", "weightage": 50.0}]
        })))
        .mount(&app.server)
        .await;

    commands::login(&app.ctx, "E100").await.expect("login");

    let goals = commands::get_goals(&app.ctx, "E100").await.expect("own goals");
    assert_eq!(goals.freshness, Freshness::Live);
    assert_eq!(goals.value.goals.len(), 1);

    let err = commands::get_goals(&app.ctx, "E200").await.unwrap_err();
    assert!(matches!(err, AppraisalError::Auth(_)));
    assert_eq!(app.requests_to("/goals/E200").await, 0);
}

#[tokio::test]
async fn goal_saves_follow_window_state() {
    let app = TestApp::start().await;
    app.allow_login("E100", Role::Employee).await;
    app.accept_writes("POST", "/goals/E100").await;
    commands::login(&app.ctx, "E100").await.expect("login");

    let saved = commands::save_goals(&app.ctx, WindowName::GoalSetting, goal_sheet("E100", 60.0))
        .await
        .expect("goal setting is open in April");
    assert_eq!(saved.freshness, Freshness::Live);
    assert_eq!(saved.value.goals[0].calculated_score, Some(48.0));

    let err = commands::save_goals(&app.ctx, WindowName::MidYear, goal_sheet("E100", 60.0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppraisalError::InvalidInput(_)), "unexpected error: {err:?}");

    let err = commands::save_goals(&app.ctx, WindowName::GoalSetting, goal_sheet("E100", 120.0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppraisalError::Validation(_)), "unexpected error: {err:?}");
    assert_eq!(app.requests_to("/goals/E100").await, 1);
}

#[tokio::test]
async fn admin_window_override_closes_editing() {
    let app = TestApp::start().await;
    app.allow_login("A1", Role::Admin).await;
    app.allow_login("E100", Role::Employee).await;
    app.accept_writes("POST", "/system/settings").await;

    commands::login(&app.ctx, "E100").await.expect("employee login");
    let config = TimeWindowConfig {
        goal_setting: window(true, true, 4, 5),
        mid_year: window(false, false, 10, 11),
        year_end: window(true, false, 3, 4),
        competency: window(true, false, 3, 4),
    };
    let err = commands::save_time_windows(&app.ctx, config).await.unwrap_err();
    assert!(matches!(err, AppraisalError::Auth(_)), "employees may not change settings");

    commands::logout(&app.ctx).await.expect("logout");
    commands::login(&app.ctx, "A1").await.expect("admin login");
    commands::save_time_windows(&app.ctx, config).await.expect("admin saves settings");

    let statuses = commands::window_statuses(&app.ctx).await.expect("statuses");
    assert!(statuses.contains(&(WindowName::GoalSetting, appraisal_domain::WindowStatus::ActiveReadOnly)));

    commands::logout(&app.ctx).await.expect("logout");
    commands::login(&app.ctx, "E100").await.expect("employee login");
    let err = commands::save_goals(&app.ctx, WindowName::GoalSetting, goal_sheet("E100", 40.0))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("editing is closed"));
}

#[tokio::test]
async fn offline_saves_replay_when_connectivity_returns() {
    let app = TestApp::start().await;
    app.allow_login("E100", Role::Employee).await;
    app.accept_writes("POST", "/goals/E100").await;
    commands::login(&app.ctx, "E100").await.expect("login");

    commands::set_connectivity(&app.ctx, false).await.expect("offline");
    let saved = commands::save_goals(&app.ctx, WindowName::GoalSetting, goal_sheet("E100", 30.0))
        .await
        .expect("queued save");
    assert_eq!(saved.freshness, Freshness::Queued);
    assert_eq!(commands::sync_status(&app.ctx).await.unwrap().pending, 1);
    assert_eq!(app.requests_to("/goals/E100").await, 0);

    assert!(commands::set_connectivity(&app.ctx, true).await.expect("online"));
    assert!(app.wait_for_empty_queue(Duration::from_secs(5)).await, "queue should drain");
    assert_eq!(app.requests_to("/goals/E100").await, 1);
}

#[tokio::test]
async fn repeated_rejections_lock_the_browser() {
    let app = TestApp::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&app.server)
        .await;

    for remaining in (0..5).rev() {
        let err = commands::login(&app.ctx, "E404").await.unwrap_err();
        assert!(
            matches!(err, AppraisalError::LoginFailed { remaining_attempts } if remaining_attempts == remaining),
            "unexpected error: {err:?}"
        );
    }

    let err = commands::login(&app.ctx, "E404").await.unwrap_err();
    assert!(matches!(err, AppraisalError::Lockout { .. }), "unexpected error: {err:?}");
    assert_eq!(app.requests_to("/auth").await, 5);
}

#[tokio::test]
async fn activity_log_is_admin_only() {
    let app = TestApp::start().await;
    app.allow_login("A1", Role::Admin).await;
    app.allow_login("E100", Role::Employee).await;

    commands::login(&app.ctx, "E100").await.expect("login");
    assert!(commands::activity_log(&app.ctx).await.is_err());
    commands::logout(&app.ctx).await.expect("logout");

    commands::login(&app.ctx, "A1").await.expect("admin login");
    let entries = commands::activity_log(&app.ctx).await.expect("entries");
    assert!(entries.len() >= 3, "expected login, logout, login; got {entries:?}");
}
