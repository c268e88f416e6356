//! Derived state that follows from entity mutations.

use ai::{AiResult, Assistant};
use chrono::NaiveDate;
use prospect_core::{ColorCode, FollowUp};
use uuid::Uuid;

/// Earliest date among the prospect's Pending follow-ups.
///
/// Only dates are compared; two Pending follow-ups on the same day are
/// interchangeable because the derived value is itself a date.
pub fn compute_next_follow_up_date(prospect_id: Uuid, follow_ups: &[FollowUp]) -> Option<NaiveDate> {
    follow_ups
        .iter()
        .filter(|f| f.prospect_id == prospect_id && f.is_pending())
        .map(|f| f.date)
        .min()
}

/// Color for `stage`, or the neutral fallback when generation fails.
pub async fn regenerate_color_code(assistant: &Assistant, stage: u8, prospect_name: &str) -> ColorCode {
    assistant.color_code(stage, prospect_name).await
}

/// Like [`regenerate_color_code`] but lets the caller keep the color it has.
pub async fn try_regenerate_color_code(
    assistant: &Assistant,
    stage: u8,
    prospect_name: &str,
) -> AiResult<ColorCode> {
    assistant.try_color_code(stage, prospect_name).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use prospect_core::{CreateFollowUpRequest, FollowUpMethod, FollowUpStatus};

    fn follow_up(prospect_id: Uuid, day: u32, status: FollowUpStatus) -> FollowUp {
        let mut fu = FollowUp::new(CreateFollowUpRequest {
            prospect_id,
            date: NaiveDate::from_ymd_opt(2024, 2, day).unwrap(),
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            method: FollowUpMethod::Call,
            notes: String::new(),
            ai_suggested_tone: None,
            ai_suggested_content: None,
            ai_suggested_tool: None,
        });
        fu.status = status;
        fu
    }

    #[test]
    fn test_next_date_is_min_pending_for_prospect() {
        let id = Uuid::new_v4();
        let other = Uuid::new_v4();
        let follow_ups = vec![
            follow_up(id, 20, FollowUpStatus::Pending),
            follow_up(id, 5, FollowUpStatus::Completed),
            follow_up(other, 1, FollowUpStatus::Pending),
            follow_up(id, 12, FollowUpStatus::Pending),
            follow_up(id, 8, FollowUpStatus::Missed),
        ];

        assert_eq!(
            compute_next_follow_up_date(id, &follow_ups),
            NaiveDate::from_ymd_opt(2024, 2, 12)
        );
    }

    #[test]
    fn test_no_pending_means_none() {
        let id = Uuid::new_v4();
        let follow_ups = vec![follow_up(id, 3, FollowUpStatus::Completed)];
        assert_eq!(compute_next_follow_up_date(id, &follow_ups), None);
        assert_eq!(compute_next_follow_up_date(id, &[]), None);
    }

    #[tokio::test]
    async fn test_regenerate_falls_back_without_generator() {
        let assistant = Assistant::new(std::sync::Arc::new(ai::UnconfiguredGenerator));
        let color = regenerate_color_code(&assistant, 6, "Casey").await;
        assert_eq!(color, ColorCode::neutral());
        assert!(try_regenerate_color_code(&assistant, 6, "Casey").await.is_err());
    }
}
