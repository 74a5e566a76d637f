//! Integration tests for the swipe audit engine.
//!
//! This test suite drives the HTTP router end to end and covers:
//! - Night-shift lateness across midnight
//! - Day-shift outings and leave suppression
//! - Authorized overtime accounting
//! - Unpaired swipes
//! - Mixed day and night tables
//! - Chinese headers and row-embedded joins
//! - Error cases

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use swipe_audit::api::{create_router, AppState};
use swipe_audit::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/audit.yaml").expect("Failed to load config");
    AppState::new(config)
}

fn create_router_for_test() -> Router {
    create_router(create_test_state())
}

async fn post_audit(router: Router, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/audit")
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

fn columns() -> Value {
    json!([
        "employee_id",
        "name",
        "department",
        "swipe_date",
        "swipe_time",
        "swipe_device",
        "shift_label"
    ])
}

/// A swipe row as (employee, date, time, device, label).
fn swipe(employee: &str, date: &str, time: &str, device: &str, label: &str) -> Value {
    json!([employee, format!("Worker {}", employee), "Assembly", date, time, device, label])
}

fn create_request(rows: Vec<Value>, overtime: Vec<Value>, leave: Vec<Value>) -> Value {
    json!({
        "swipes": { "columns": columns(), "rows": rows },
        "overtime": overtime,
        "leave": leave
    })
}

fn categories(body: &Value) -> Vec<String> {
    body["report"]["anomalies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["category"].as_str().unwrap().to_string())
        .collect()
}

fn report_rows(body: &Value) -> &Vec<Value> {
    body["report"]["rows"].as_array().unwrap()
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn test_night_late_arrival_without_overtime() {
    let request = create_request(
        vec![
            swipe("N1", "2026-01-15", "20:05:00", "Gate IN", "夜班"),
            swipe("N1", "2026-01-16", "04:10:00", "Gate OUT", "夜班"),
        ],
        vec![],
        vec![],
    );

    let (status, body) = post_audit(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(categories(&body), vec!["late_arrival"]);

    let rows = report_rows(&body);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["anchor_date"], "2026-01-15");
    assert_eq!(rows[1]["anchor_date"], "2026-01-15");
    assert_eq!(rows[1]["swipe_date"], "2026-01-16");
    assert_eq!(rows[0]["anomaly_flag"], "yes");
    assert_eq!(rows[0]["anomaly_description"], "late arrival");
    assert_eq!(rows[0]["realized_overtime_hours"], Value::Null);
}

#[tokio::test]
async fn test_day_excess_outing_evidence() {
    let request = create_request(
        vec![
            swipe("D1", "2026-01-15", "07:58:00", "大门进", "白班"),
            swipe("D1", "2026-01-15", "12:05:00", "大门出", "白班"),
            swipe("D1", "2026-01-15", "12:25:00", "大门进", "白班"),
            swipe("D1", "2026-01-15", "16:40:00", "大门出", "白班"),
        ],
        vec![],
        vec![],
    );

    let (status, body) = post_audit(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(categories(&body), vec!["excess_outing"]);

    let rows = report_rows(&body);
    assert_eq!(rows.len(), 4);
    for row in rows {
        assert_eq!(row["outing_start"], "12:05:00");
        assert_eq!(row["outing_end"], "12:25:00");
        assert_eq!(row["outing_duration"], 20);
        assert_eq!(
            row["anomaly_description"],
            "excess outing over 15 minutes (12:05:00, 12:25:00, 20 min)"
        );
    }
}

#[tokio::test]
async fn test_night_insufficient_authorized_overtime() {
    let request = create_request(
        vec![
            swipe("N2", "2026-01-15", "19:55:00", "in", "夜班"),
            swipe("N2", "2026-01-16", "04:00:00", "out", "夜班"),
            swipe("N2", "2026-01-16", "04:50:00", "in", "夜班"),
            swipe("N2", "2026-01-16", "07:30:00", "out", "夜班"),
        ],
        vec![json!({
            "employee_id": "N2",
            "date": "2026-01-15",
            "start_time": "04:40:00",
            "end_time": "08:10:00",
            "authorized_hours": "3.5"
        })],
        vec![],
    );

    let (status, body) = post_audit(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(categories(&body).contains(&"insufficient_overtime".to_string()));

    let rows = report_rows(&body);
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["realized_overtime_hours"], "2.67");
    assert_eq!(rows[0]["overtime_hours"], "3.5");
    assert_eq!(rows[0]["overtime_start_time"], "04:40:00");
    assert!(rows[0]["anomaly_description"]
        .as_str()
        .unwrap()
        .contains("insufficient overtime (04:40:00, 07:30:00, 2.67 of 3.5 hours)"));
}

#[tokio::test]
async fn test_day_unpaired_exit_cites_both_swipes() {
    let request = create_request(
        vec![
            swipe("D2", "2026-01-15", "09:00:00", "out", "白班"),
            swipe("D2", "2026-01-15", "09:30:00", "out", "白班"),
        ],
        vec![],
        vec![],
    );

    let (status, body) = post_audit(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::OK);
    let anomaly = body["report"]["anomalies"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["category"] == "unpaired_exit")
        .expect("unpaired exit reported");
    assert_eq!(
        anomaly["evidence"]["timestamps"],
        json!(["2026-01-15T09:00:00", "2026-01-15T09:30:00"])
    );
}

#[tokio::test]
async fn test_leave_covering_outing_suppresses_it() {
    let request = create_request(
        vec![
            swipe("D3", "2026-01-15", "07:58:00", "in", "白班"),
            swipe("D3", "2026-01-15", "10:00:00", "out", "白班"),
            swipe("D3", "2026-01-15", "12:00:00", "in", "白班"),
            swipe("D3", "2026-01-15", "16:40:00", "out", "白班"),
        ],
        vec![],
        vec![json!({
            "employee_id": "D3",
            "date": "2026-01-15",
            "start_time": "09:30:00",
            "end_time": "12:00:00",
            "leave_hours": "2.5"
        })],
    );

    let (status, body) = post_audit(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(report_rows(&body).is_empty());
    assert_eq!(body["report"]["summary"]["anomalous_instances"], 0);
}

#[tokio::test]
async fn test_mixed_day_and_night_groups_stay_contiguous() {
    let request = create_request(
        vec![
            swipe("N3", "2026-01-15", "20:30:00", "in", "夜班"),
            swipe("D4", "2026-01-15", "08:15:00", "in", "白班"),
            swipe("N3", "2026-01-16", "04:05:00", "out", "夜班"),
            swipe("D4", "2026-01-15", "16:45:00", "out", "白班"),
            swipe("N3", "2026-01-16", "15:00:00", "out", "夜班"),
        ],
        vec![],
        vec![],
    );

    let (status, body) = post_audit(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::OK);
    let employees: Vec<&str> = report_rows(&body)
        .iter()
        .map(|r| r["employee_id"].as_str().unwrap())
        .collect();
    assert_eq!(employees, vec!["N3", "N3", "D4", "D4"]);
    assert_eq!(body["report"]["summary"]["dead_zone_swipes"], 1);
}

#[tokio::test]
async fn test_chinese_headers_with_row_embedded_overtime() {
    let request = json!({
        "swipes": {
            "columns": ["工号", "姓名", "部门", "刷卡日期", "刷卡时间", "刷卡机", "班别",
                        "加班单开始时间", "加班单结束时间", "加班单时数"],
            "rows": [
                [1001, "张三", "装配", "2026-01-15", "07:55:00", "一号门进", "白班", "17:10:00", "20:10:00", 3],
                [1001, "张三", "装配", "2026-01-15", "16:40:00", "一号门出", "白班", null, null, null]
            ]
        }
    });

    let (status, body) = post_audit(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(categories(&body), vec!["overtime_not_entered"]);
    let rows = report_rows(&body);
    assert_eq!(rows[0]["employee_id"], "1001");
    assert_eq!(rows[0]["department"], "装配");
    assert_eq!(rows[0]["overtime_end_time"], "20:10:00");
}

#[tokio::test]
async fn test_unparseable_rows_are_skipped() {
    let request = create_request(
        vec![
            json!(["D5", "Worker", "Assembly", 45672, "08:00:00", "in", "白班"]),
            swipe("D5", "2026-01-15", "not a time", "in", "白班"),
            swipe("D5", "2026-01-15", "07:50:00", "in", "白班"),
            swipe("D5", "2026-01-15", "16:50:00", "out", "白班"),
        ],
        vec![],
        vec![],
    );

    let (status, body) = post_audit(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["report"]["summary"]["rows_read"], 4);
    assert_eq!(body["report"]["summary"]["rows_skipped"], 2);
    assert!(report_rows(&body).is_empty());
}

#[tokio::test]
async fn test_unclassified_label_is_not_evaluated() {
    let request = create_request(
        vec![swipe("X1", "2026-01-15", "11:00:00", "out", "培训")],
        vec![],
        vec![],
    );

    let (status, body) = post_audit(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(report_rows(&body).is_empty());
    assert_eq!(body["report"]["summary"]["unclassified_instances"], 1);
}

// =============================================================================
// Error Cases
// =============================================================================

#[tokio::test]
async fn test_missing_column_is_fatal() {
    let request = json!({
        "swipes": {
            "columns": ["employee_id", "name", "swipe_date", "swipe_device", "shift_label"],
            "rows": [["E1", "Ann", "2026-01-15", "in", "白班"]]
        }
    });

    let (status, body) = post_audit(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "MISSING_COLUMN");
    assert_eq!(body["message"], "missing column swipe_time");
}

#[tokio::test]
async fn test_malformed_json_returns_400() {
    let response = create_router_for_test()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/audit")
                .header("Content-Type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_endpoint() {
    let response = create_router_for_test()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(json, json!({"status": "ok"}));
}
