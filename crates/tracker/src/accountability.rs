//! Read-only rollup of recent activity.

use chrono::{DateTime, Duration, Utc};
use prospect_core::{AccountabilitySummary, FollowUp, FollowUpStatus, Prospect};

use crate::error::{Result, TrackerError};

/// Summarizes activity within `[now - window_days, now]`.
///
/// Prospects count by creation time, resolved follow-ups by their last
/// update, interactions by their own date.
pub fn summarize(
    now: DateTime<Utc>,
    window_days: u32,
    prospects: &[Prospect],
    follow_ups: &[FollowUp],
    follow_up_streak: u32,
) -> Result<AccountabilitySummary> {
    let window_start = now
        .checked_sub_signed(Duration::days(i64::from(window_days)))
        .ok_or_else(|| {
            TrackerError::Validation(format!("Window of {} days is out of range", window_days))
        })?;
    let in_window = |t: DateTime<Utc>| t >= window_start && t <= now;

    let prospects_added = prospects.iter().filter(|p| in_window(p.created_at)).count();

    let resolved_in_window = |status: FollowUpStatus| {
        follow_ups
            .iter()
            .filter(|f| f.status == status && in_window(f.updated_at))
            .count()
    };
    let follow_ups_completed = resolved_in_window(FollowUpStatus::Completed);
    let follow_ups_missed = resolved_in_window(FollowUpStatus::Missed);

    let interactions_logged = prospects
        .iter()
        .flat_map(|p| p.interaction_history.iter())
        .filter(|i| in_window(i.date))
        .count();

    Ok(AccountabilitySummary {
        window_days,
        window_start,
        window_end: now,
        prospects_added,
        follow_ups_completed,
        follow_ups_missed,
        follow_ups_resolved: follow_ups_completed + follow_ups_missed,
        interactions_logged,
        follow_up_streak,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime, TimeZone};
    use prospect_core::{
        ColorCode, CreateFollowUpRequest, CreateInteractionRequest, CreateProspectRequest,
        FollowUpMethod, FunnelStage, Interaction, InteractionType,
    };

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 30, 12, 0, 0).unwrap()
    }

    fn prospect_created(days_ago: i64) -> Prospect {
        let mut p = Prospect::new(
            CreateProspectRequest {
                name: format!("Prospect {days_ago}"),
                email: None,
                phone: None,
                initial_data: "Cold call list".to_string(),
                current_funnel_stage: FunnelStage::Prospect,
                follow_up_stage_number: 1,
            },
            ColorCode::neutral(),
        );
        p.created_at = now() - Duration::days(days_ago);
        p.updated_at = p.created_at;
        p
    }

    fn interaction(days_ago: i64) -> Interaction {
        Interaction::new(CreateInteractionRequest {
            date: Some(now() - Duration::days(days_ago)),
            interaction_type: InteractionType::Email,
            summary: "Sent brochure".to_string(),
            outcome: None,
        })
    }

    fn follow_up(status: FollowUpStatus, updated_days_ago: i64) -> FollowUp {
        let mut fu = FollowUp::new(CreateFollowUpRequest {
            prospect_id: uuid::Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 4, 20).unwrap(),
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            method: FollowUpMethod::Call,
            notes: String::new(),
            ai_suggested_tone: None,
            ai_suggested_content: None,
            ai_suggested_tool: None,
        });
        fu.status = status;
        fu.updated_at = now() - Duration::days(updated_days_ago);
        fu
    }

    #[test]
    fn test_summary_counts_window_only() {
        let mut recent = prospect_created(3);
        recent.interaction_history.push(interaction(1));
        recent.interaction_history.push(interaction(20));
        let old = prospect_created(30);

        let follow_ups = vec![
            follow_up(FollowUpStatus::Completed, 2),
            follow_up(FollowUpStatus::Completed, 40),
            follow_up(FollowUpStatus::Missed, 5),
            follow_up(FollowUpStatus::Pending, 1),
        ];

        let summary = summarize(now(), 14, &[recent, old], &follow_ups, 6).unwrap();

        assert_eq!(summary.window_days, 14);
        assert_eq!(summary.window_start, now() - Duration::days(14));
        assert_eq!(summary.prospects_added, 1);
        assert_eq!(summary.follow_ups_completed, 1);
        assert_eq!(summary.follow_ups_missed, 1);
        assert_eq!(summary.follow_ups_resolved, 2);
        assert_eq!(summary.interactions_logged, 1);
        assert_eq!(summary.follow_up_streak, 6);
    }

    #[test]
    fn test_window_bounds_are_inclusive() {
        let edge = prospect_created(7);
        let summary = summarize(now(), 7, &[edge], &[], 0).unwrap();
        assert_eq!(summary.prospects_added, 1);
    }

    #[test]
    fn test_empty_history() {
        let summary = summarize(now(), 14, &[], &[], 0).unwrap();
        assert_eq!(summary.prospects_added, 0);
        assert_eq!(summary.follow_ups_resolved, 0);
        assert_eq!(summary.interactions_logged, 0);
    }

    #[test]
    fn test_window_past_calendar_range_is_rejected() {
        let err = summarize(now(), u32::MAX, &[], &[], 0).unwrap_err();
        assert!(matches!(err, TrackerError::Validation(_)));
    }
}
