//! Event types for the prospect tracker event system

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Envelope wrapping all events with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// The actual event
    pub event: Event,
}

impl EventEnvelope {
    /// Create a new event envelope with auto-generated ID and timestamp
    pub fn new(event: Event) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// All possible events in the system
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    // Prospect events
    #[serde(rename = "prospect.created")]
    ProspectCreated { prospect_id: Uuid, name: String },

    #[serde(rename = "prospect.updated")]
    ProspectUpdated { prospect_id: Uuid },

    #[serde(rename = "prospect.deleted")]
    ProspectDeleted { prospect_id: Uuid },

    /// Color code regenerated after a stage number change or backfill
    #[serde(rename = "prospect.color_changed")]
    ColorCodeChanged {
        prospect_id: Uuid,
        color_code: String,
        fallback: bool,
    },

    #[serde(rename = "interaction.logged")]
    InteractionLogged {
        prospect_id: Uuid,
        interaction_id: Uuid,
    },

    // Follow-up events
    #[serde(rename = "follow_up.scheduled")]
    FollowUpScheduled {
        prospect_id: Uuid,
        follow_up_id: Uuid,
        date: NaiveDate,
    },

    #[serde(rename = "follow_up.updated")]
    FollowUpUpdated {
        prospect_id: Uuid,
        follow_up_id: Uuid,
        status: String,
    },

    #[serde(rename = "follow_up.deleted")]
    FollowUpDeleted {
        prospect_id: Uuid,
        follow_up_id: Uuid,
    },

    /// Derived next follow-up date was recomputed
    #[serde(rename = "prospect.next_follow_up_changed")]
    NextFollowUpChanged {
        prospect_id: Uuid,
        next_follow_up_date: Option<NaiveDate>,
    },

    // Gamification events
    #[serde(rename = "gamification.updated")]
    GamificationUpdated {
        daily_prospects_added: u32,
        follow_up_streak: u32,
    },

    /// Error occurred
    #[serde(rename = "error")]
    Error {
        message: String,
        context: Option<String>,
    },
}

impl Event {
    /// Get the prospect ID associated with this event, if any
    pub fn prospect_id(&self) -> Option<Uuid> {
        match self {
            Event::ProspectCreated { prospect_id, .. } => Some(*prospect_id),
            Event::ProspectUpdated { prospect_id } => Some(*prospect_id),
            Event::ProspectDeleted { prospect_id } => Some(*prospect_id),
            Event::ColorCodeChanged { prospect_id, .. } => Some(*prospect_id),
            Event::InteractionLogged { prospect_id, .. } => Some(*prospect_id),
            Event::FollowUpScheduled { prospect_id, .. } => Some(*prospect_id),
            Event::FollowUpUpdated { prospect_id, .. } => Some(*prospect_id),
            Event::FollowUpDeleted { prospect_id, .. } => Some(*prospect_id),
            Event::NextFollowUpChanged { prospect_id, .. } => Some(*prospect_id),
            Event::GamificationUpdated { .. } => None,
            Event::Error { .. } => None,
        }
    }

    /// SSE event name, identical to the serde tag
    pub fn event_type(&self) -> &'static str {
        match self {
            Event::ProspectCreated { .. } => "prospect.created",
            Event::ProspectUpdated { .. } => "prospect.updated",
            Event::ProspectDeleted { .. } => "prospect.deleted",
            Event::ColorCodeChanged { .. } => "prospect.color_changed",
            Event::InteractionLogged { .. } => "interaction.logged",
            Event::FollowUpScheduled { .. } => "follow_up.scheduled",
            Event::FollowUpUpdated { .. } => "follow_up.updated",
            Event::FollowUpDeleted { .. } => "follow_up.deleted",
            Event::NextFollowUpChanged { .. } => "prospect.next_follow_up_changed",
            Event::GamificationUpdated { .. } => "gamification.updated",
            Event::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_envelope_creation() {
        let event = Event::ProspectCreated {
            prospect_id: Uuid::new_v4(),
            name: "Casey".to_string(),
        };
        let envelope = EventEnvelope::new(event);

        assert!(!envelope.id.is_nil());
        assert!(envelope.timestamp <= Utc::now());
    }

    #[test]
    fn test_event_serialization() {
        let event = Event::FollowUpUpdated {
            prospect_id: Uuid::new_v4(),
            follow_up_id: Uuid::new_v4(),
            status: "completed".to_string(),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("follow_up.updated"));
        assert!(json.contains("follow_up_id"));
        assert!(json.contains("completed"));
    }

    #[test]
    fn test_event_deserialization() {
        let json = r#"{"type":"prospect.created","prospect_id":"550e8400-e29b-41d4-a716-446655440000","name":"Casey"}"#;
        let event: Event = serde_json::from_str(json).unwrap();

        match event {
            Event::ProspectCreated { prospect_id, name } => {
                assert_eq!(name, "Casey");
                assert!(!prospect_id.is_nil());
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn test_event_type_matches_tag() {
        let event = Event::NextFollowUpChanged {
            prospect_id: Uuid::new_v4(),
            next_follow_up_date: None,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], event.event_type());
    }

    #[test]
    fn test_event_prospect_id() {
        let prospect_id = Uuid::new_v4();

        let event = Event::ProspectUpdated { prospect_id };
        assert_eq!(event.prospect_id(), Some(prospect_id));

        let stats_event = Event::GamificationUpdated {
            daily_prospects_added: 1,
            follow_up_streak: 0,
        };
        assert_eq!(stats_event.prospect_id(), None);
    }
}
