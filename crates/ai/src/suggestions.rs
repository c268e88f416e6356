//! Output schemas of the generation flows, their validation rules and the
//! fallback values served when generation fails.

use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use prospect_core::{hhmm, ColorCode, FollowUpMethod};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::error::{AiError, AiResult};

pub const REQUIRED_TOOL_SUGGESTIONS: usize = 3;

pub const FALLBACK_SCHEDULE_REASONING: &str =
    "Schedule suggestions are unavailable right now; plan the next follow-up manually.";

static COLOR_PATTERN: OnceLock<Regex> = OnceLock::new();

fn color_pattern() -> &'static Regex {
    COLOR_PATTERN.get_or_init(|| Regex::new(r"^#?([0-9A-Fa-f]{6})$").expect("valid regex"))
}

/// Checks a generated color code and normalizes it to upper-case `#RRGGBB`.
pub fn validate_color_code(color: ColorCode) -> AiResult<ColorCode> {
    let hex = color_pattern()
        .captures(color.color_code.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_ascii_uppercase())
        .ok_or_else(|| AiError::invalid(format!("'{}' is not a #RRGGBB color", color.color_code)))?;

    if color.reasoning.trim().is_empty() {
        return Err(AiError::invalid("Color code reasoning is empty"));
    }

    Ok(ColorCode {
        color_code: format!("#{}", hex),
        reasoning: color.reasoning.trim().to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    #[serde(alias = "Friendly")]
    Friendly,
    #[serde(alias = "Professional")]
    Professional,
    #[serde(alias = "Urgent")]
    Urgent,
}

impl Tone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Friendly => "friendly",
            Self::Professional => "professional",
            Self::Urgent => "urgent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageSuggestion {
    pub tone: Tone,
    pub content: String,
    #[serde(default)]
    pub suggested_tool: Option<String>,
}

impl MessageSuggestion {
    pub fn fallback(prospect_name: &str) -> Self {
        Self {
            tone: Tone::Professional,
            content: format!(
                "Hi {}, I wanted to follow up on our last conversation. \
                 Do you have a few minutes this week to continue?",
                prospect_name
            ),
            suggested_tool: None,
        }
    }

    pub fn validate(mut self) -> AiResult<Self> {
        self.content = self.content.trim().to_string();
        if self.content.is_empty() {
            return Err(AiError::invalid("Message content is empty"));
        }
        self.suggested_tool = self
            .suggested_tool
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledFollowUp {
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    #[schema(value_type = String, example = "10:00")]
    pub time: NaiveTime,
    pub method: FollowUpMethod,
    #[serde(default)]
    pub notes: String,
}

impl ScheduledFollowUp {
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSuggestion {
    pub follow_up_schedule: Vec<ScheduledFollowUp>,
    #[serde(default)]
    pub reasoning: String,
}

impl ScheduleSuggestion {
    pub fn fallback() -> Self {
        Self {
            follow_up_schedule: Vec::new(),
            reasoning: FALLBACK_SCHEDULE_REASONING.to_string(),
        }
    }

    /// Drops entries that are not strictly after `now` and orders the rest.
    pub fn validate(mut self, now: NaiveDateTime) -> Self {
        let before = self.follow_up_schedule.len();
        self.follow_up_schedule.retain(|item| item.starts_at() > now);

        let dropped = before - self.follow_up_schedule.len();
        if dropped > 0 {
            warn!(dropped, now = %now, "Dropped schedule entries not in the future");
        }

        self.follow_up_schedule.sort_by_key(ScheduledFollowUp::starts_at);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ToolType {
    #[serde(alias = "Media")]
    Media,
    #[serde(alias = "Presentation")]
    Presentation,
    #[serde(alias = "third-party", alias = "Third-Party", alias = "thirdParty")]
    ThirdParty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToolSuggestion {
    pub tool_name: String,
    pub tool_type: ToolType,
    pub reasoning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ToolSuggestions {
    pub tool_suggestions: Vec<ToolSuggestion>,
}

impl ToolSuggestions {
    pub fn fallback() -> Self {
        let tool = |name: &str, tool_type, reasoning: &str| ToolSuggestion {
            tool_name: name.to_string(),
            tool_type,
            reasoning: reasoning.to_string(),
            details: None,
        };

        Self {
            tool_suggestions: vec![
                tool(
                    "Product overview video",
                    ToolType::Media,
                    "A short video lets the prospect see the offer on their own time.",
                ),
                tool(
                    "Opportunity presentation",
                    ToolType::Presentation,
                    "A structured walkthrough answers the common questions in one sitting.",
                ),
                tool(
                    "Three-way call with a colleague",
                    ToolType::ThirdParty,
                    "An experienced third party adds credibility and handles objections.",
                ),
            ],
        }
    }

    pub fn validate(self) -> AiResult<Self> {
        if self.tool_suggestions.len() != REQUIRED_TOOL_SUGGESTIONS {
            return Err(AiError::invalid(format!(
                "Expected {} tool suggestions, got {}",
                REQUIRED_TOOL_SUGGESTIONS,
                self.tool_suggestions.len()
            )));
        }
        if let Some(blank) = self
            .tool_suggestions
            .iter()
            .find(|t| t.tool_name.trim().is_empty())
        {
            return Err(AiError::invalid(format!(
                "Tool suggestion without a name ({:?})",
                blank.tool_type
            )));
        }
        Ok(self)
    }
}

/// Optional body of a message suggestion request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageSuggestionRequest {
    /// Which follow-up this message is for; defaults to the prospect's stage number.
    #[serde(default)]
    pub follow_up_number: Option<u32>,
}

/// Optional body of a schedule suggestion request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSuggestionRequest {
    #[serde(default)]
    pub user_preferences: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_color_code_normalized() {
        let color = validate_color_code(ColorCode {
            color_code: "ff8800".to_string(),
            reasoning: " Warming up ".to_string(),
        })
        .unwrap();
        assert_eq!(color.color_code, "#FF8800");
        assert_eq!(color.reasoning, "Warming up");
    }

    #[test]
    fn test_color_pattern_compiled_once() {
        assert!(std::ptr::eq(color_pattern(), color_pattern()));
    }

    #[test]
    fn test_color_code_rejects_bad_hex() {
        for bad in ["#FFF", "red", "#GG0000", ""] {
            let result = validate_color_code(ColorCode {
                color_code: bad.to_string(),
                reasoning: "x".to_string(),
            });
            assert!(result.is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_message_rejects_unknown_tone() {
        let parsed: Result<MessageSuggestion, _> =
            serde_json::from_value(json!({"tone": "sarcastic", "content": "hey"}));
        assert!(parsed.is_err());
    }

    #[test]
    fn test_message_requires_content() {
        let parsed: MessageSuggestion =
            serde_json::from_value(json!({"tone": "Friendly", "content": "   ", "suggestedTool": ""}))
                .unwrap();
        assert!(parsed.validate().is_err());
    }

    #[test]
    fn test_schedule_drops_past_entries() {
        let suggestion: ScheduleSuggestion = serde_json::from_value(json!({
            "followUpSchedule": [
                {"date": "2024-03-12", "time": "09:00", "method": "call", "notes": "check in"},
                {"date": "2024-03-10", "time": "12:00", "method": "email"},
                {"date": "2024-03-09", "time": "10:00", "method": "In-Person"}
            ],
            "reasoning": "spread out"
        }))
        .unwrap();

        let validated = suggestion.validate(at(2024, 3, 10, 12));
        let dates: Vec<String> = validated
            .follow_up_schedule
            .iter()
            .map(|f| f.date.to_string())
            .collect();
        assert_eq!(dates, vec!["2024-03-12"]);
    }

    #[test]
    fn test_tools_require_exactly_three() {
        let mut tools = ToolSuggestions::fallback();
        assert!(tools.clone().validate().is_ok());

        tools.tool_suggestions.pop();
        assert!(tools.validate().is_err());
    }

    #[test]
    fn test_tool_type_aliases() {
        let tool: ToolSuggestion = serde_json::from_value(json!({
            "toolName": "Webinar",
            "toolType": "third-party",
            "reasoning": "Social proof"
        }))
        .unwrap();
        assert_eq!(tool.tool_type, ToolType::ThirdParty);
        assert_eq!(serde_json::to_value(tool.tool_type).unwrap(), "third_party");
    }

    #[test]
    fn test_fallbacks_are_valid() {
        assert!(MessageSuggestion::fallback("Sam").validate().is_ok());
        assert!(ScheduleSuggestion::fallback().follow_up_schedule.is_empty());
        assert!(validate_color_code(ColorCode::neutral()).is_ok());
    }
}
