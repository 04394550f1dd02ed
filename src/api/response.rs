//! Response types for the payout API.
//!
//! This module defines the small informational responses, the error body,
//! and the mapping from [`PayError`] to HTTP status and error code.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::{ShopConfig, UnstaffedTipPolicy};
use crate::error::PayError;

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "ok".
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Response body for `GET /config`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigResponse {
    /// Shop name.
    pub name: String,
    /// IANA timezone name.
    pub timezone: String,
    /// Opening time, `HH:MM`.
    pub open: String,
    /// Switch time, `HH:MM`.
    pub switch: String,
    /// Closing time, `HH:MM`.
    pub close: String,
    /// Default hourly rate.
    pub default_hourly_rate: Decimal,
    /// Unstaffed tip policy.
    pub unstaffed_tips: UnstaffedTipPolicy,
    /// Names of the employees on the roster.
    pub employees: Vec<String>,
}

impl From<&ShopConfig> for ConfigResponse {
    fn from(config: &ShopConfig) -> Self {
        let boundaries = config.boundaries();
        Self {
            name: config.name().to_string(),
            timezone: config.timezone().name().to_string(),
            open: boundaries.open().format("%H:%M").to_string(),
            switch: boundaries.switch().format("%H:%M").to_string(),
            close: boundaries.close().format("%H:%M").to_string(),
            default_hourly_rate: config.default_hourly_rate(),
            unstaffed_tips: config.unstaffed_tips(),
            employees: config
                .roster()
                .employees()
                .iter()
                .map(|e| e.name.clone())
                .collect(),
        }
    }
}

/// Response body for `POST /tips/parse`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TipParseResponse {
    /// Tips per date inside the range.
    pub daily_tips: BTreeMap<NaiveDate, Decimal>,
    /// Sum of `daily_tips`.
    pub total: Decimal,
    /// Entries outside the range.
    pub warnings: Vec<String>,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }

    fn internal(error: ApiError) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<PayError> for ApiErrorResponse {
    fn from(error: PayError) -> Self {
        let text = error.to_string();
        match error {
            PayError::InvalidTips { message } => ApiErrorResponse::bad_request(
                ApiError::with_details("INVALID_TIPS", text, message),
            ),
            PayError::InvalidRate { message } => ApiErrorResponse::bad_request(
                ApiError::with_details("INVALID_RATE", text, message),
            ),
            PayError::InvalidPeriod { message } => ApiErrorResponse::bad_request(
                ApiError::with_details("INVALID_PERIOD", text, message),
            ),
            PayError::InvalidTimestamp { value } => {
                ApiErrorResponse::bad_request(ApiError::with_details(
                    "INVALID_TIMESTAMP",
                    text,
                    format!("'{}' is not an RFC 3339 timestamp or a YYYY-MM-DD date", value),
                ))
            }
            PayError::CalculationError { message } => ApiErrorResponse::internal(
                ApiError::with_details("CALCULATION_ERROR", "Calculation failed", message),
            ),
            PayError::ConfigNotFound { .. }
            | PayError::ConfigParseError { .. }
            | PayError::InvalidBoundaries { .. }
            | PayError::InvalidTime { .. }
            | PayError::InvalidTimezone { .. } => ApiErrorResponse::internal(
                ApiError::with_details("CONFIG_ERROR", "Configuration error", text),
            ),
        }
    }
}
