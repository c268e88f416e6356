use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum InteractionType {
    #[serde(alias = "Email")]
    Email,
    #[serde(alias = "Call")]
    Call,
    #[serde(alias = "Meeting")]
    Meeting,
    #[serde(alias = "Note")]
    Note,
    #[serde(alias = "Text Message")]
    TextMessage,
}

impl InteractionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Call => "call",
            Self::Meeting => "meeting",
            Self::Note => "note",
            Self::TextMessage => "text_message",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "email" => Some(Self::Email),
            "call" => Some(Self::Call),
            "meeting" => Some(Self::Meeting),
            "note" => Some(Self::Note),
            "text_message" => Some(Self::TextMessage),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Call => "Call",
            Self::Meeting => "Meeting",
            Self::Note => "Note",
            Self::TextMessage => "Text Message",
        }
    }
}

/// A logged contact with a prospect. Immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub interaction_type: InteractionType,
    pub summary: String,
    pub outcome: Option<String>,
}

impl Interaction {
    pub fn new(request: CreateInteractionRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: request.date.unwrap_or_else(Utc::now),
            interaction_type: request.interaction_type,
            summary: request.summary,
            outcome: request.outcome.filter(|o| !o.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct CreateInteractionRequest {
    /// Defaults to the time the interaction is logged.
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub interaction_type: InteractionType,
    pub summary: String,
    #[serde(default)]
    pub outcome: Option<String>,
}

impl CreateInteractionRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.summary.trim().is_empty() {
            return Err(CoreError::validation("Interaction summary cannot be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interaction_defaults_date() {
        let before = Utc::now();
        let interaction = Interaction::new(CreateInteractionRequest {
            date: None,
            interaction_type: InteractionType::Call,
            summary: "Discussed pricing".to_string(),
            outcome: Some("  ".to_string()),
        });

        assert!(interaction.date >= before);
        assert!(interaction.outcome.is_none());
    }

    #[test]
    fn test_interaction_type_accepts_labels() {
        let parsed: InteractionType = serde_json::from_str("\"Text Message\"").unwrap();
        assert_eq!(parsed, InteractionType::TextMessage);
        let parsed: InteractionType = serde_json::from_str("\"meeting\"").unwrap();
        assert_eq!(parsed, InteractionType::Meeting);
    }

    #[test]
    fn test_interaction_serializes_type_field() {
        let interaction = Interaction::new(CreateInteractionRequest {
            date: None,
            interaction_type: InteractionType::Email,
            summary: "Sent brochure".to_string(),
            outcome: None,
        });
        let json = serde_json::to_value(&interaction).unwrap();
        assert_eq!(json["type"], "email");
        assert_eq!(json["summary"], "Sent brochure");
    }
}
