//! Calculation logic for the payout calculator.
//!
//! This module contains the individual payout rules (window splitting, base
//! pay, tip pool allocation and tip distribution), the daily calculator that
//! chains them, period aggregation, and the input normalization that turns
//! calendar entries and tip reports into calculator input.

mod base_pay;
mod day_payout;
mod period_summary;
mod roster_match;
mod rounding;
mod tip_payload;
mod tip_pool;
mod tip_split;
mod window_split;

pub use base_pay::{BasePayResult, PayRates, calculate_base_pay};
pub use day_payout::{ENGINE_VERSION, PayoutCalculator};
pub use period_summary::compute_period;
pub use roster_match::{ResolvedEvents, resolve_events};
pub use rounding::round_money;
pub use tip_payload::{TipPayload, parse_tip_payload};
pub use tip_pool::{PoolAllocation, allocate_pools};
pub use tip_split::{TipShare, TipSplit, WindowWorker, split_pool};
pub use window_split::{WindowSegment, WindowSplit, split_by_window};
