use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum FollowUpMethod {
    #[serde(alias = "Email")]
    Email,
    #[serde(alias = "Call")]
    Call,
    #[serde(alias = "In-Person", alias = "in-person")]
    InPerson,
}

impl FollowUpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Call => "call",
            Self::InPerson => "in_person",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "email" => Some(Self::Email),
            "call" => Some(Self::Call),
            "in_person" => Some(Self::InPerson),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Call => "Call",
            Self::InPerson => "In-Person",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum FollowUpStatus {
    #[default]
    Pending,
    Completed,
    Missed,
}

impl FollowUpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Missed => "missed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "missed" => Some(Self::Missed),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Parses a time of day written as `HH:MM` (seconds are tolerated and dropped).
pub fn parse_time_of_day(raw: &str) -> Result<NaiveTime, CoreError> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| CoreError::validation(format!("Invalid time '{}', expected HH:MM", raw)))
}

/// Serde adapter writing `NaiveTime` as `HH:MM`.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time_of_day(&raw).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::NaiveTime;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            time: &Option<NaiveTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match time {
                Some(t) => super::serialize(t, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveTime>, D::Error> {
            let raw = Option::<String>::deserialize(deserializer)?;
            raw.map(|s| crate::parse_time_of_day(&s).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct FollowUp {
    pub id: Uuid,
    pub prospect_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    #[schema(value_type = String, example = "14:30")]
    #[cfg_attr(feature = "typescript", ts(type = "string"))]
    pub time: NaiveTime,
    pub method: FollowUpMethod,
    pub notes: String,
    pub status: FollowUpStatus,
    pub ai_suggested_tone: Option<String>,
    pub ai_suggested_content: Option<String>,
    pub ai_suggested_tool: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What a merged update touched, as far as derived state is concerned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FollowUpChange {
    pub status_changed: bool,
    pub date_changed: bool,
}

impl FollowUpChange {
    pub fn affects_schedule(&self) -> bool {
        self.status_changed || self.date_changed
    }
}

impl FollowUp {
    pub fn new(request: CreateFollowUpRequest) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            prospect_id: request.prospect_id,
            date: request.date,
            time: request.time,
            method: request.method,
            notes: request.notes,
            status: FollowUpStatus::Pending,
            ai_suggested_tone: request.ai_suggested_tone,
            ai_suggested_content: request.ai_suggested_content,
            ai_suggested_tool: request.ai_suggested_tool,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets both timestamps, for callers that keep their own clock.
    pub fn stamped(mut self, now: DateTime<Utc>) -> Self {
        self.created_at = now;
        self.updated_at = now;
        self
    }

    pub fn is_pending(&self) -> bool {
        self.status == FollowUpStatus::Pending
    }

    /// Moves to `to`. Terminal statuses cannot change, re-asserting one is a no-op.
    pub fn transition_status(&mut self, to: FollowUpStatus) -> Result<bool, CoreError> {
        if self.status == to {
            return Ok(false);
        }
        if self.status.is_terminal() {
            return Err(CoreError::InvalidStatusTransition {
                from: self.status.as_str().to_string(),
                to: to.as_str().to_string(),
            });
        }
        self.status = to;
        Ok(true)
    }

    pub fn apply_update(&mut self, update: &UpdateFollowUpRequest) -> Result<FollowUpChange, CoreError> {
        let mut change = FollowUpChange::default();

        if let Some(status) = update.status {
            change.status_changed = self.transition_status(status)?;
        }
        if let Some(date) = update.date {
            change.date_changed = date != self.date;
            self.date = date;
        }
        if let Some(time) = update.time {
            self.time = time;
        }
        if let Some(method) = update.method {
            self.method = method;
        }
        if let Some(notes) = &update.notes {
            self.notes = notes.clone();
        }
        if let Some(tone) = &update.ai_suggested_tone {
            self.ai_suggested_tone = Some(tone.clone());
        }
        if let Some(content) = &update.ai_suggested_content {
            self.ai_suggested_content = Some(content.clone());
        }
        if let Some(tool) = &update.ai_suggested_tool {
            self.ai_suggested_tool = Some(tool.clone());
        }

        self.updated_at = Utc::now();
        Ok(change)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct CreateFollowUpRequest {
    pub prospect_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    #[schema(value_type = String, example = "09:30")]
    #[cfg_attr(feature = "typescript", ts(type = "string"))]
    pub time: NaiveTime,
    pub method: FollowUpMethod,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub ai_suggested_tone: Option<String>,
    #[serde(default)]
    pub ai_suggested_content: Option<String>,
    #[serde(default)]
    pub ai_suggested_tool: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct UpdateFollowUpRequest {
    pub date: Option<NaiveDate>,
    #[serde(default, with = "hhmm::option")]
    #[schema(value_type = Option<String>, example = "16:00")]
    #[cfg_attr(feature = "typescript", ts(type = "string | null"))]
    pub time: Option<NaiveTime>,
    pub method: Option<FollowUpMethod>,
    pub notes: Option<String>,
    pub status: Option<FollowUpStatus>,
    pub ai_suggested_tone: Option<String>,
    pub ai_suggested_content: Option<String>,
    pub ai_suggested_tool: Option<String>,
}
