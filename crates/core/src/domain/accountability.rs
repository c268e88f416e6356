use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_ACCOUNTABILITY_WINDOW_DAYS: u32 = 14;

/// Activity rollup over a trailing window ending at `window_end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct AccountabilitySummary {
    pub window_days: u32,
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub prospects_added: usize,
    pub follow_ups_completed: usize,
    pub follow_ups_missed: usize,
    /// Completed plus missed.
    pub follow_ups_resolved: usize,
    pub interactions_logged: usize,
    pub follow_up_streak: u32,
}
