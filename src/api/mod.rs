//! HTTP API module for the payout calculator.
//!
//! This module provides JSON endpoints for computing day and period payouts
//! from calendar events, and for reading card-terminal tip reports.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{DayPayoutRequest, PeriodPayoutRequest, TipParseRequest};
pub use response::{ApiError, ApiErrorResponse, ConfigResponse, HealthResponse, TipParseResponse};
pub use state::AppState;
