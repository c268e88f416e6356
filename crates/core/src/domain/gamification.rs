use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::follow_up::FollowUpStatus;

/// How a resolved follow-up counted toward the streak.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FollowUpOutcome {
    OnTime,
    Late,
    Missed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct GamificationStats {
    pub daily_prospects_added: u32,
    pub last_prospect_added_date: Option<NaiveDate>,
    pub follow_up_streak: u32,
    pub total_on_time_follow_ups: u32,
    pub total_missed_follow_ups: u32,
}

impl GamificationStats {
    pub fn record_prospect_added(&mut self, today: NaiveDate) {
        if self.last_prospect_added_date == Some(today) {
            self.daily_prospects_added += 1;
        } else {
            self.daily_prospects_added = 1;
            self.last_prospect_added_date = Some(today);
        }
    }

    /// Counts a follow-up that left Pending. `completed_on` is the calendar
    /// date of the completion instant; only the date portions are compared.
    pub fn record_follow_up_resolved(
        &mut self,
        scheduled: NaiveDate,
        status: FollowUpStatus,
        completed_on: NaiveDate,
    ) -> Option<FollowUpOutcome> {
        let outcome = match status {
            FollowUpStatus::Pending => return None,
            FollowUpStatus::Completed if completed_on <= scheduled => FollowUpOutcome::OnTime,
            FollowUpStatus::Completed => FollowUpOutcome::Late,
            FollowUpStatus::Missed => FollowUpOutcome::Missed,
        };

        match outcome {
            FollowUpOutcome::OnTime => {
                self.follow_up_streak += 1;
                self.total_on_time_follow_ups += 1;
            }
            FollowUpOutcome::Late | FollowUpOutcome::Missed => {
                self.follow_up_streak = 0;
                self.total_missed_follow_ups += 1;
            }
        }

        Some(outcome)
    }

    /// The daily counter as of `today`: zero when the last add was on another day.
    pub fn refreshed(mut self, today: NaiveDate) -> Self {
        if self.last_prospect_added_date != Some(today) {
            self.daily_prospects_added = 0;
        }
        self
    }
}
