//! Online/offline policy of the persistence facade.

mod support;

use std::sync::Arc;

use appraisal_core::persistence::{EntityValidator, Freshness};
use appraisal_domain::{
    ActivityKind, AppraisalError, EmployeeRecord, EntityKind, Goal, GoalSet, HttpMethod, Role,
};
use serde_json::{json, Value};
use support::Harness;

fn employee(code: &str) -> EmployeeRecord {
    EmployeeRecord {
        employee_code: code.into(),
        name: "Asha Rao".into(),
        division: Some("Operations".into()),
        designation: None,
        location: None,
        department: None,
        role: Role::Employee,
    }
}

fn goal_set(code: &str, ratio: Option<f64>) -> GoalSet {
    let mut goals = GoalSet::new(code);
    goals.goals.push(Goal {
        title: "Reduce churn".into(),
        kpis: vec!["Retention rate".into()],
        weightage: 40.0,
        mid_year_status: None,
        achieved_ratio: ratio,
        calculated_score: None,
    });
    goals
}

#[tokio::test]
async fn live_read_is_written_through_to_cache() {
    let h = Harness::new();
    h.transport.respond("GET", "/employee/E100", serde_json::to_value(employee("E100")).unwrap());

    let result = h.facade.employee("E100").await.unwrap();

    assert_eq!(result.freshness, Freshness::Live);
    assert_eq!(result.value.name, "Asha Rao");
    assert_eq!(h.facade.cached::<EmployeeRecord>(EntityKind::Employee, "E100"), Some(employee("E100")));
    assert!(h.store.raw("employee:E100").is_some());
}

#[tokio::test]
async fn failed_read_serves_last_known_value_as_stale() {
    let h = Harness::new();
    h.transport.respond("GET", "/employee/E100", serde_json::to_value(employee("E100")).unwrap());
    h.facade.employee("E100").await.unwrap();

    h.transport.set_offline(true);
    let result = h.facade.employee("E100").await.unwrap();

    assert_eq!(result.freshness, Freshness::Stale);
    assert_eq!(result.value, employee("E100"));
}

#[tokio::test]
async fn failed_read_with_empty_cache_is_a_network_error() {
    let h = Harness::new();
    h.transport.set_offline(true);

    let err = h.facade.goals("E404").await.unwrap_err();

    assert!(matches!(err, AppraisalError::Network(_)));
}

#[tokio::test]
async fn known_offline_reads_skip_the_backend() {
    let h = Harness::new();
    h.cache().write("goals", "E100", &goal_set("E100", None)).unwrap();
    h.go_offline();

    let result = h.facade.goals("E100").await.unwrap();

    assert_eq!(result.freshness, Freshness::Stale);
    assert_eq!(h.transport.request_count(), 0);
}

#[tokio::test]
async fn successful_save_is_live_and_not_queued() {
    let h = Harness::new();

    let saved = h.facade.save_goals(goal_set("E100", Some(50.0))).await.unwrap();

    assert_eq!(saved.freshness, Freshness::Live);
    assert!(h.queue().is_empty());
    let requests = h.transport.requests_to("/goals/E100");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, HttpMethod::Post);
}

#[tokio::test]
async fn save_goals_recalculates_scores_before_sending() {
    let h = Harness::new();

    let saved = h.facade.save_goals(goal_set("E100", Some(50.0))).await.unwrap();

    assert_eq!(saved.value.goals[0].calculated_score, Some(20.0));
    let body = h.transport.requests_to("/goals/E100")[0].body.clone().unwrap();
    assert_eq!(body["goals"][0]["calculatedScore"], json!(20.0));
}

#[tokio::test]
async fn failed_save_is_cached_and_queued_then_readable() {
    let h = Harness::new();
    h.go_offline();

    let saved = h.facade.save_goals(goal_set("E100", Some(100.0))).await.unwrap();

    assert_eq!(saved.freshness, Freshness::Queued);
    let pending = h.queue().pending();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].endpoint, "/goals/E100");
    assert_eq!(pending[0].method, HttpMethod::Post);

    // read-your-writes while still offline
    let read = h.facade.goals("E100").await.unwrap();
    assert_eq!(read.freshness, Freshness::Queued);
    assert_eq!(read.value.goals[0].calculated_score, Some(40.0));
}

#[tokio::test]
async fn saved_value_is_served_unchanged_once_backend_goes_away() {
    let h = Harness::new();
    let saved = h.facade.save_goals(goal_set("E100", Some(50.0))).await.unwrap();
    assert_eq!(saved.freshness, Freshness::Live);

    h.transport.set_offline(true);
    let read = h.facade.goals("E100").await.unwrap();

    assert_eq!(read.freshness, Freshness::Stale);
    assert_eq!(read.value, saved.value);
}

#[tokio::test]
async fn live_read_does_not_overwrite_a_queued_write() {
    let h = Harness::new();
    let mut server_copy = goal_set("E100", None);
    server_copy.goals[0].title = "v1".into();
    h.transport.respond("GET", "/goals/E100", serde_json::to_value(&server_copy).unwrap());
    h.transport.fail("/goals/E100");

    let mut edited = goal_set("E100", None);
    edited.goals[0].title = "v2".into();
    let saved = h.facade.save_goals(edited).await.unwrap();
    assert_eq!(saved.freshness, Freshness::Queued);

    h.transport.heal("/goals/E100");
    let read = h.facade.goals("E100").await.unwrap();
    assert_eq!(read.freshness, Freshness::Queued);
    assert_eq!(read.value.goals[0].title, "v2");
    assert!(h.transport.requests().iter().all(|r| r.method != HttpMethod::Get));

    let report = h.facade.sync_pending().await;
    assert_eq!(report.succeeded.len(), 1);
    let cached = h.facade.cached::<GoalSet>(EntityKind::Goals, "E100").unwrap();
    assert_eq!(cached.goals[0].title, "v2");
}

#[tokio::test]
async fn online_save_waits_behind_queued_write_to_same_route() {
    let h = Harness::new();
    h.transport.fail("/goals/E100");
    let mut first = goal_set("E100", None);
    first.goals[0].title = "first".into();
    h.facade.save_goals(first).await.unwrap();

    h.transport.heal("/goals/E100");
    let mut second = goal_set("E100", None);
    second.goals[0].title = "second".into();
    let saved = h.facade.save_goals(second).await.unwrap();

    assert_eq!(saved.freshness, Freshness::Queued);
    assert_eq!(h.queue().len(), 2);

    h.facade.sync_pending().await;
    let titles: Vec<_> = h
        .transport
        .requests_to("/goals/E100")
        .into_iter()
        .filter_map(|r| r.body)
        .map(|body| body["goals"][0]["title"].clone())
        .collect();
    // the failed attempt, then both replays in save order
    assert_eq!(titles, vec![json!("first"), json!("first"), json!("second")]);
}

#[tokio::test]
async fn backend_failure_while_online_also_queues() {
    let h = Harness::new();
    h.transport.fail("/competencies/E100");

    let mut evaluation = appraisal_domain::CompetencyEvaluation::new("E100");
    evaluation.competencies.insert("C1".into(), Default::default());
    let saved = h.facade.save_competencies(evaluation).await.unwrap();

    assert_eq!(saved.freshness, Freshness::Queued);
    assert_eq!(h.queue().len(), 1);
}

#[tokio::test]
async fn validation_failures_are_reported_and_never_queued() {
    let weightage_cap: Arc<dyn EntityValidator> = Arc::new(|_kind: EntityKind, payload: &Value| {
        let total: f64 = payload["goals"]
            .as_array()
            .map(|goals| goals.iter().filter_map(|g| g["weightage"].as_f64()).sum())
            .unwrap_or_default();
        if total > 100.0 {
            Err(format!("total weightage {total} exceeds 100"))
        } else {
            Ok(())
        }
    });
    let h = Harness::builder().validator(EntityKind::Goals, weightage_cap).build();
    h.go_offline();

    let mut goals = goal_set("E100", None);
    goals.goals[0].weightage = 120.0;
    let err = h.facade.save_goals(goals).await.unwrap_err();

    assert!(matches!(err, AppraisalError::Validation(msg) if msg.contains("exceeds 100")));
    assert!(h.queue().is_empty());
    assert!(h.facade.cached::<GoalSet>(EntityKind::Goals, "E100").is_none());
}

#[tokio::test]
async fn read_only_entities_cannot_be_saved() {
    let h = Harness::new();

    let err = h
        .facade
        .save(EntityKind::PerformanceSummary, "E100", json!({"employeeCode": "E100"}))
        .await
        .unwrap_err();

    assert!(matches!(err, AppraisalError::InvalidInput(_)));
    assert_eq!(h.transport.request_count(), 0);
}

#[tokio::test]
async fn sync_pending_replays_and_logs_activity() {
    let h = Harness::new();
    h.go_offline();
    h.facade.save_goals(goal_set("E100", None)).await.unwrap();
    h.facade.update_employee(employee("E100")).await.unwrap();

    assert!(h.facade.sync_pending().await.skipped, "offline pass must not run");
    assert_eq!(h.queue().len(), 2);

    h.go_online();
    let report = h.facade.sync_pending().await;

    assert_eq!(report.succeeded.len(), 2);
    assert!(h.queue().is_empty());
    assert_eq!(h.facade.activity().entries_of(ActivityKind::SyncReplayed).len(), 1);
}

#[tokio::test]
async fn authenticate_falls_back_to_cached_employee() {
    let h = Harness::new();
    h.transport.respond("POST", "/auth", serde_json::to_value(employee("E100")).unwrap());
    assert_eq!(h.facade.authenticate("E100").await.unwrap().freshness, Freshness::Live);

    h.go_offline();
    let offline = h.facade.authenticate("E100").await.unwrap();

    assert_eq!(offline.freshness, Freshness::Stale);
    assert_eq!(offline.value.employee_code, "E100");
}

#[tokio::test]
async fn authenticate_rejection_does_not_fall_back() {
    let h = Harness::new();
    h.cache().write("employee", "E100", &employee("E100")).unwrap();
    h.transport.respond_with(
        "POST",
        "/auth",
        appraisal_core::ApiResponse { status: 401, body: json!({"error": "unknown employee"}) },
    );

    let err = h.facade.authenticate("E100").await.unwrap_err();

    assert!(matches!(err, AppraisalError::Auth(_)));
}

#[tokio::test]
async fn time_window_uses_the_system_config_singleton() {
    let h = Harness::new();
    let config = appraisal_domain::TimeWindowConfig::from_calendar(&Default::default(), 4);
    h.transport.respond("GET", "/system/timewindow", serde_json::to_value(config).unwrap());

    let fetched = h.facade.time_window().await.unwrap();

    assert_eq!(fetched.value, config);
    assert!(h.store.raw("system_config:timewindow").is_some());

    h.facade.save_time_window(config).await.unwrap();
    assert_eq!(h.transport.requests_to("/system/settings").len(), 1);
}
