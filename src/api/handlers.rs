//! HTTP request handlers for the payout API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{compute_period, parse_tip_payload, resolve_events};
use crate::error::PayResult;
use crate::models::{AuditWarning, DayPayout, PeriodPayout, SkippedEvent};

use super::request::{DayPayoutRequest, PeriodPayoutRequest, TipParseRequest};
use super::response::{
    ApiError, ApiErrorResponse, ConfigResponse, HealthResponse, TipParseResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config", get(config_handler))
        .route("/payouts/day", post(day_payout_handler))
        .route("/payouts/period", post(period_payout_handler))
        .route("/tips/parse", post(tip_parse_handler))
        .with_state(state)
}

/// Handler for GET /health.
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handler for GET /config.
///
/// Reports the configuration the server started with.
async fn config_handler(State(state): State<AppState>) -> Json<ConfigResponse> {
    Json(ConfigResponse::from(state.config().config()))
}

/// Handler for POST /payouts/day.
async fn day_payout_handler(
    State(state): State<AppState>,
    payload: Result<Json<DayPayoutRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing day payout request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    match compute_day_payout(&state, &request) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                date = %result.date,
                events_count = request.events.len(),
                payout_lines = result.payouts.len(),
                skipped_events = result.skipped_events.len(),
                grand_total = %result.totals.grand_total,
                duration_us = start_time.elapsed().as_micros(),
                "Day payout completed successfully"
            );
            json_response(StatusCode::OK, &result)
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Day payout failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /payouts/period.
async fn period_payout_handler(
    State(state): State<AppState>,
    payload: Result<Json<PeriodPayoutRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing period payout request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    match compute_period_payout(&state, &request) {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                start_date = %result.period.start_date,
                end_date = %result.period.end_date,
                events_count = request.events.len(),
                workers = result.workers.len(),
                grand_total = %result.totals.grand_total,
                duration_us = start_time.elapsed().as_micros(),
                "Period payout completed successfully"
            );
            json_response(StatusCode::OK, &result)
        }
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Period payout failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for POST /tips/parse.
async fn tip_parse_handler(payload: Result<Json<TipParseRequest>, JsonRejection>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing tip report");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let period = match request.period() {
        Ok(period) => period,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Tip report rejected");
            return ApiErrorResponse::from(err).into_response();
        }
    };

    let parsed = parse_tip_payload(&request.text, &period);
    let total: Decimal = parsed.daily_tips.values().copied().sum();
    info!(
        correlation_id = %correlation_id,
        days = parsed.daily_tips.len(),
        warnings = parsed.warnings.len(),
        total = %total,
        "Tip report parsed"
    );

    json_response(
        StatusCode::OK,
        &TipParseResponse {
            daily_tips: parsed.daily_tips,
            total,
            warnings: parsed.warnings,
        },
    )
}

/// Resolves the request's calendar entries and computes the day.
fn compute_day_payout(state: &AppState, request: &DayPayoutRequest) -> PayResult<DayPayout> {
    let config = state.config().config();
    let rates = config.pay_rates(request.hourly_rate)?;
    let resolved = resolve_events(&request.events, config.roster(), config.timezone());

    let mut payout = config.calculator().compute_day(
        request.date,
        &resolved.events,
        &rates,
        &request.tips,
    )?;
    record_unresolved(
        &mut payout.skipped_events,
        &mut payout.audit_trace.warnings,
        resolved.skipped,
    );
    Ok(payout)
}

/// Resolves the request's calendar entries and tips and computes the period.
///
/// Tips from `daily_tips` take precedence over the same date in the tip
/// report.
fn compute_period_payout(
    state: &AppState,
    request: &PeriodPayoutRequest,
) -> PayResult<PeriodPayout> {
    let config = state.config().config();
    let period = request.period()?;
    let rates = config.pay_rates(request.hourly_rate)?;
    let resolved = resolve_events(&request.events, config.roster(), config.timezone());

    let mut daily_tips = BTreeMap::new();
    let mut report_warnings = Vec::new();
    if let Some(text) = &request.tip_payload {
        let parsed = parse_tip_payload(text, &period);
        daily_tips.extend(parsed.tip_inputs());
        report_warnings = parsed.warnings;
    }
    daily_tips.extend(request.daily_tips.iter().map(|(date, tips)| (*date, *tips)));

    let mut payout = compute_period(
        &config.calculator(),
        period,
        &resolved.events,
        &rates,
        &daily_tips,
    )?;
    payout.warnings.extend(
        report_warnings
            .into_iter()
            .map(|message| AuditWarning::new("TIP_REPORT_OUTSIDE_PERIOD", message, "low")),
    );
    record_unresolved(&mut payout.skipped_events, &mut payout.warnings, resolved.skipped);
    Ok(payout)
}

/// Adds calendar entries that never became shift events to a result.
fn record_unresolved(
    skipped_events: &mut Vec<SkippedEvent>,
    warnings: &mut Vec<AuditWarning>,
    unresolved: Vec<SkippedEvent>,
) {
    for skipped in &unresolved {
        warnings.push(AuditWarning::new(
            "SKIPPED_EVENT",
            format!(
                "Skipped calendar event '{}' ({} to {}): {}",
                skipped.worker_label, skipped.start, skipped.end, skipped.reason
            ),
            "medium",
        ));
    }
    skipped_events.splice(0..0, unresolved);
}

fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], Json(body)).into_response()
}

/// Maps a JSON extraction failure to a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, &error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigLoader;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let config = ConfigLoader::load("./config/barista-pay").unwrap();
        AppState::new(config)
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let router = create_router(create_test_state());
        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_config_lists_roster() {
        let router = create_router(create_test_state());
        let response = router
            .oneshot(Request::builder().uri("/config").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["switch"], "14:00");
        assert_eq!(json["employees"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_day_payout_valid_request_returns_200() {
        let router = create_router(create_test_state());
        let body = r#"{
            "date": "2026-02-03",
            "events": [
                {"summary": "Kat", "start": "2026-02-03T08:00:00", "end": "2026-02-03T14:00:00"}
            ],
            "hourly_rate": "10",
            "tips": {"mode": "total", "amount": "30"}
        }"#;

        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/payouts/day")
                    .header("Content-Type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let json = body_json(response).await;
        assert_eq!(json["payouts"][0]["worker_label"], "Kat");
        assert_eq!(json["payouts"][0]["base_pay"], "60.00");
        assert_eq!(json["payouts"][0]["tip_share"], "30.00");
    }

    #[tokio::test]
    async fn test_day_payout_malformed_json_returns_400() {
        let router = create_router(create_test_state());
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/payouts/day")
                    .header("Content-Type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "MALFORMED_JSON");
    }

    #[test]
    fn test_record_unresolved_prepends_and_warns() {
        let mut skipped = vec![SkippedEvent {
            event_id: None,
            worker_label: "Kat".to_string(),
            start: "2026-02-03 09:00:00".to_string(),
            end: "2026-02-03 09:00:00".to_string(),
            reason: crate::models::SkipReason::ZeroDuration,
        }];
        let mut warnings = Vec::new();
        let unresolved = vec![SkippedEvent {
            event_id: Some("evt_9".to_string()),
            worker_label: "Deep clean".to_string(),
            start: "2026-02-03T08:00:00".to_string(),
            end: "2026-02-03T09:00:00".to_string(),
            reason: crate::models::SkipReason::UnknownWorker,
        }];

        record_unresolved(&mut skipped, &mut warnings, unresolved);

        assert_eq!(skipped.len(), 2);
        assert_eq!(skipped[0].event_id.as_deref(), Some("evt_9"));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("Deep clean"));
    }
}
