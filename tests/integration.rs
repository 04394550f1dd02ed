//! Integration tests for the payout API.
//!
//! This test suite drives the router end to end:
//! - Base pay and tip split for a single day
//! - Events spanning the switch time
//! - Rounding remainders
//! - Unstaffed windows (carry forward)
//! - Roster matching, rate overrides and timezone conversion
//! - Pay periods, tip reports and the schedule matrix
//! - Error cases

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use barista_pay::api::{AppState, create_router};
use barista_pay::config::ConfigLoader;
use barista_pay::error::PayError;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/barista-pay").expect("Failed to load config");
    AppState::new(config)
}

fn create_router_for_test() -> Router {
    create_router(create_test_state())
}

fn decimal(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn dec_at(value: &Value) -> Decimal {
    decimal(value.as_str().unwrap_or_else(|| panic!("expected decimal string, got {}", value)))
}

async fn post_json(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
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

fn event(summary: &str, date: &str, start: &str, end: &str) -> Value {
    json!({
        "summary": summary,
        "start": format!("{}T{}:00", date, start),
        "end": format!("{}T{}:00", date, end)
    })
}

fn line<'a>(payout: &'a Value, worker: &str, window: &str) -> &'a Value {
    payout["payouts"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["worker_label"] == worker && p["shift_window"] == window)
        .unwrap_or_else(|| panic!("no {} line for {}", window, worker))
}

fn warning_codes(warnings: &Value) -> Vec<String> {
    warnings
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["code"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// Day payouts
// =============================================================================

#[tokio::test]
async fn test_single_morning_worker() {
    let body = json!({
        "date": "2026-02-03",
        "events": [event("Kat", "2026-02-03", "08:00", "14:00")],
        "hourly_rate": "10",
        "tips": {"mode": "total", "amount": "30"}
    });

    let (status, payout) = post_json(create_router_for_test(), "/payouts/day", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payout["payouts"].as_array().unwrap().len(), 1);
    let kat = line(&payout, "Kat", "morning");
    assert_eq!(dec_at(&kat["hours"]), decimal("6"));
    assert_eq!(kat["base_pay"], "60.00");
    assert_eq!(kat["tip_share"], "30.00");
    assert_eq!(kat["total"], "90.00");
    assert_eq!(dec_at(&payout["totals"]["grand_total"]), decimal("90"));
    assert!(payout["calculation_id"].is_string());
}

#[tokio::test]
async fn test_two_afternoon_workers_share_by_hours() {
    let body = json!({
        "date": "2026-02-03",
        "events": [
            event("Rony", "2026-02-03", "14:00", "17:00"),
            event("Kat", "2026-02-03", "16:00", "21:00")
        ],
        "hourly_rate": "10",
        "tips": {"mode": "total", "amount": "40"}
    });

    let (status, payout) = post_json(create_router_for_test(), "/payouts/day", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(dec_at(&line(&payout, "Rony", "afternoon")["tip_share"]), decimal("15.00"));
    assert_eq!(dec_at(&line(&payout, "Kat", "afternoon")["tip_share"]), decimal("25.00"));
    assert_eq!(dec_at(&payout["totals"]["tips_distributed"]), decimal("40"));
}

#[tokio::test]
async fn test_event_spanning_switch_is_split() {
    let body = json!({
        "date": "2026-02-03",
        "events": [event("Kat", "2026-02-03", "13:00", "15:00")],
        "hourly_rate": "10"
    });

    let (status, payout) = post_json(create_router_for_test(), "/payouts/day", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(dec_at(&line(&payout, "Kat", "morning")["hours"]), decimal("1"));
    assert_eq!(dec_at(&line(&payout, "Kat", "afternoon")["hours"]), decimal("1"));
    assert_eq!(dec_at(&line(&payout, "Kat", "morning")["base_pay"]), decimal("10"));
    assert_eq!(dec_at(&line(&payout, "Kat", "afternoon")["base_pay"]), decimal("10"));
}

#[tokio::test]
async fn test_rounding_remainder_goes_to_earliest_starter() {
    let body = json!({
        "date": "2026-02-03",
        "events": [
            event("Rony", "2026-02-03", "15:00", "17:00"),
            event("Kat", "2026-02-03", "14:00", "16:00"),
            event("Daphne", "2026-02-03", "18:00", "20:00")
        ],
        "tips": {"mode": "total", "amount": "10.00"}
    });

    let (status, payout) = post_json(create_router_for_test(), "/payouts/day", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(line(&payout, "Kat", "afternoon")["tip_share"], "3.34");
    assert_eq!(line(&payout, "Rony", "afternoon")["tip_share"], "3.33");
    assert_eq!(line(&payout, "Daphne", "afternoon")["tip_share"], "3.33");
    assert_eq!(dec_at(&payout["totals"]["tips_distributed"]), decimal("10.00"));
}

#[tokio::test]
async fn test_unstaffed_morning_tips_carry_forward() {
    let body = json!({
        "date": "2026-02-03",
        "events": [event("Rony", "2026-02-03", "14:00", "21:00")],
        "tips": {"mode": "per_window", "morning": "12.00", "afternoon": "20.00"}
    });

    let (status, payout) = post_json(create_router_for_test(), "/payouts/day", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(line(&payout, "Rony", "afternoon")["tip_share"], "32.00");
    assert!(payout["unallocated_tips"].as_array().unwrap().is_empty());
    let codes = warning_codes(&payout["audit_trace"]["warnings"]);
    assert!(codes.contains(&"TIPS_CARRIED_FORWARD".to_string()));
}

#[tokio::test]
async fn test_tips_with_nobody_working_are_unallocated() {
    let body = json!({
        "date": "2026-02-03",
        "events": [],
        "tips": {"mode": "total", "amount": "25.00"}
    });

    let (status, payout) = post_json(create_router_for_test(), "/payouts/day", body).await;

    assert_eq!(status, StatusCode::OK);
    assert!(payout["payouts"].as_array().unwrap().is_empty());
    assert_eq!(dec_at(&payout["totals"]["tips_unallocated"]), decimal("25"));
    assert_eq!(payout["unallocated_tips"][0]["shift_window"], Value::Null);
    let codes = warning_codes(&payout["audit_trace"]["warnings"]);
    assert!(codes.contains(&"UNALLOCATED_TIPS".to_string()));
}

#[tokio::test]
async fn test_roster_match_and_rate_override() {
    let body = json!({
        "date": "2026-02-03",
        "events": [
            event("Open - Yusuf", "2026-02-03", "08:00", "14:00"),
            {
                "summary": "Close",
                "start": "2026-02-03T14:00:00",
                "end": "2026-02-03T21:00:00",
                "attendees": ["daphne@example.com"]
            }
        ]
    });

    let (status, payout) = post_json(create_router_for_test(), "/payouts/day", body).await;

    assert_eq!(status, StatusCode::OK);
    // Youssef has his own rate on the roster
    let youssef = line(&payout, "Youssef", "morning");
    assert_eq!(dec_at(&youssef["hourly_rate"]), decimal("16.50"));
    assert_eq!(dec_at(&youssef["base_pay"]), decimal("99.00"));
    // Daphne takes the shop default
    let daphne = line(&payout, "Daphne", "afternoon");
    assert_eq!(dec_at(&daphne["hourly_rate"]), decimal("15.00"));
    assert_eq!(dec_at(&daphne["base_pay"]), decimal("105.00"));
}

#[tokio::test]
async fn test_request_rate_does_not_replace_roster_rate() {
    let body = json!({
        "date": "2026-02-03",
        "events": [
            event("Youssef", "2026-02-03", "08:00", "10:00"),
            event("Kat", "2026-02-03", "08:00", "10:00")
        ],
        "hourly_rate": "20"
    });

    let (status, payout) = post_json(create_router_for_test(), "/payouts/day", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(dec_at(&line(&payout, "Youssef", "morning")["base_pay"]), decimal("33.00"));
    assert_eq!(dec_at(&line(&payout, "Kat", "morning")["base_pay"]), decimal("40.00"));
}

#[tokio::test]
async fn test_utc_timestamps_converted_to_shop_time() {
    let body = json!({
        "date": "2026-02-03",
        "events": [{
            "summary": "Kat",
            "start": "2026-02-03T14:00:00Z",
            "end": "2026-02-03T20:00:00Z"
        }],
        "hourly_rate": "10"
    });

    let (status, payout) = post_json(create_router_for_test(), "/payouts/day", body).await;

    assert_eq!(status, StatusCode::OK);
    // 14:00Z is 08:00 in Chicago in February
    assert_eq!(dec_at(&line(&payout, "Kat", "morning")["hours"]), decimal("6"));
    assert_eq!(payout["payouts"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unusable_events_are_reported() {
    let body = json!({
        "date": "2026-02-03",
        "events": [
            {"id": "evt_1", "summary": "Deep clean", "start": "2026-02-03T08:00:00", "end": "2026-02-03T09:00:00"},
            {"id": "evt_2", "summary": "Kat", "start": "2026-02-03T09:00:00", "end": "2026-02-03T09:00:00"},
            {"id": "evt_3", "summary": "Kat", "start": "whenever", "end": "2026-02-03T09:00:00"},
            {"id": "evt_4", "summary": "Rony", "start": "2026-02-03T08:00:00", "end": "2026-02-03T12:00:00"}
        ]
    });

    let (status, payout) = post_json(create_router_for_test(), "/payouts/day", body).await;

    assert_eq!(status, StatusCode::OK);
    let skipped = payout["skipped_events"].as_array().unwrap();
    let reasons: Vec<&str> = skipped.iter().map(|s| s["reason"].as_str().unwrap()).collect();
    assert_eq!(skipped.len(), 3);
    assert!(reasons.contains(&"unknown_worker"));
    assert!(reasons.contains(&"invalid_timestamp"));
    assert!(reasons.contains(&"zero_duration"));
    assert_eq!(
        warning_codes(&payout["audit_trace"]["warnings"])
            .iter()
            .filter(|c| *c == "SKIPPED_EVENT")
            .count(),
        3
    );
    assert_eq!(payout["payouts"].as_array().unwrap().len(), 1);
}

// =============================================================================
// Period payouts
// =============================================================================

const TIP_REPORT: &str = "\
02-10-2026
12:15 AM
Tips
Monday, February 2, 2026 8:00 AM - Monday, February 2, 2026 9:00 PM
$50.00

02-10-2026
12:15 AM
Tips
Tuesday, February 3, 2026 8:00 AM - Tuesday, February 3, 2026 9:00 PM
$88.20

02-11-2026
12:15 AM
Tips
Tuesday, February 10, 2026 8:00 AM - Tuesday, February 10, 2026 9:00 PM
$20.00
";

fn period_request() -> Value {
    json!({
        "start_date": "2026-02-02",
        "end_date": "2026-02-08",
        "events": [
            event("Kat", "2026-02-02", "08:00", "14:00"),
            event("Rony", "2026-02-02", "14:00", "21:00"),
            event("Kat", "2026-02-03", "08:00", "16:00"),
            event("Daphne", "2026-02-03", "14:00", "21:00")
        ],
        "tip_payload": TIP_REPORT,
        "daily_tips": {
            "2026-02-03": {"mode": "per_window", "morning": "30.00", "afternoon": "40.00"}
        }
    })
}

async fn post_period(body: Value) -> (StatusCode, Value) {
    post_json(create_router_for_test(), "/payouts/period", body).await
}

#[tokio::test]
async fn test_period_payout_totals() {
    let (status, payout) = post_period(period_request()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payout["days"].as_array().unwrap().len(), 7);
    assert_eq!(payout["totals"]["days"], 7);
    // 50.00 from the report, 70.00 from daily_tips replacing the report's 88.20
    assert_eq!(dec_at(&payout["totals"]["total_tips"]), decimal("120.00"));
    assert_eq!(dec_at(&payout["totals"]["total_unallocated"]), Decimal::ZERO);
}

#[tokio::test]
async fn test_period_worker_summaries() {
    let (_, payout) = post_period(period_request()).await;

    let workers = payout["workers"].as_array().unwrap();
    let names: Vec<&str> = workers.iter().map(|w| w["worker_label"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Daphne", "Kat", "Rony"]);

    let kat = &workers[1];
    assert_eq!(dec_at(&kat["hours"]), decimal("14"));
    assert_eq!(dec_at(&kat["base_pay"]), decimal("210.00"));
    // Monday 23.08 (6 of 13 hours of 50.00), Tuesday 30.00 + 8.89 (2 of 9 hours of 40.00)
    assert_eq!(dec_at(&kat["tips"]), decimal("61.97"));
    assert_eq!(kat["opening_shifts"], 2);
    assert_eq!(kat["closing_shifts"], 1);
}

#[tokio::test]
async fn test_period_schedule_matrix() {
    let (_, payout) = post_period(period_request()).await;

    let monday = &payout["schedule"][0];
    assert_eq!(monday["day_of_week"], "Monday");
    assert_eq!(monday["cells"]["Kat"], "O");
    assert_eq!(monday["cells"]["Rony"], "C");
    assert_eq!(monday["cells"]["Daphne"], "");

    let tuesday = &payout["schedule"][1];
    assert_eq!(tuesday["cells"]["Kat"], "O/C*");
    assert_eq!(tuesday["cells"]["Daphne"], "C*");
}

#[tokio::test]
async fn test_period_tip_report_outside_range_warns() {
    let (_, payout) = post_period(period_request()).await;

    let warnings = payout["warnings"].as_array().unwrap();
    let report_warning = warnings
        .iter()
        .find(|w| w["code"] == "TIP_REPORT_OUTSIDE_PERIOD")
        .expect("tip report warning");
    assert_eq!(
        report_warning["message"],
        "Date 2026-02-10 ($20.00) is outside selected range and will be skipped"
    );
}

#[tokio::test]
async fn test_reversed_period_returns_400() {
    let body = json!({
        "start_date": "2026-02-08",
        "end_date": "2026-02-02",
        "events": []
    });

    let (status, error) = post_json(create_router_for_test(), "/payouts/period", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_PERIOD");
}

#[tokio::test]
async fn test_oversized_period_returns_400() {
    let body = json!({
        "start_date": "1900-01-01",
        "end_date": "2100-01-01",
        "events": []
    });

    let (status, error) = post_period(body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_PERIOD");
}

#[tokio::test]
async fn test_oversized_tip_report_range_returns_400() {
    let body = json!({
        "start_date": "0001-01-01",
        "end_date": "9999-12-31",
        "text": TIP_REPORT
    });

    let (status, error) = post_json(create_router_for_test(), "/tips/parse", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_PERIOD");
}

// =============================================================================
// Tip report parsing
// =============================================================================

#[tokio::test]
async fn test_tip_parse_endpoint() {
    let body = json!({
        "start_date": "2026-02-02",
        "end_date": "2026-02-08",
        "text": TIP_REPORT
    });

    let (status, parsed) = post_json(create_router_for_test(), "/tips/parse", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(dec_at(&parsed["daily_tips"]["2026-02-02"]), decimal("50.00"));
    assert_eq!(dec_at(&parsed["daily_tips"]["2026-02-03"]), decimal("88.20"));
    assert_eq!(dec_at(&parsed["total"]), decimal("138.20"));
    assert_eq!(parsed["warnings"].as_array().unwrap().len(), 1);
}

// =============================================================================
// Error cases
// =============================================================================

#[tokio::test]
async fn test_negative_tips_return_400() {
    let body = json!({
        "date": "2026-02-03",
        "events": [],
        "tips": {"mode": "total", "amount": "-5"}
    });

    let (status, error) = post_json(create_router_for_test(), "/payouts/day", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_TIPS");
}

#[tokio::test]
async fn test_sub_cent_tips_return_400() {
    let body = json!({
        "date": "2026-02-03",
        "events": [],
        "tips": {"mode": "per_window", "morning": "1.005"}
    });

    let (status, error) = post_json(create_router_for_test(), "/payouts/day", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_TIPS");
}

#[tokio::test]
async fn test_negative_rate_returns_400() {
    let body = json!({
        "date": "2026-02-03",
        "events": [],
        "hourly_rate": "-1"
    });

    let (status, error) = post_json(create_router_for_test(), "/payouts/day", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "INVALID_RATE");
}

#[tokio::test]
async fn test_missing_field_returns_validation_error() {
    let body = json!({ "events": [] });

    let (status, error) = post_json(create_router_for_test(), "/payouts/day", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
    assert!(error["message"].as_str().unwrap().contains("date"));
}

#[tokio::test]
async fn test_missing_content_type_returns_400() {
    let response = create_router_for_test()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/payouts/day")
                .body(Body::from(r#"{"date": "2026-02-03", "events": []}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let error: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(error["code"], "MISSING_CONTENT_TYPE");
}

#[test]
fn test_switch_before_open_rejected_at_startup() {
    let result = ConfigLoader::load("./config/barista-pay")
        .unwrap()
        .with_overrides(|name| (name == "SWITCH_TIME").then(|| "07:00".to_string()));

    assert!(matches!(result, Err(PayError::InvalidBoundaries { .. })));
}
