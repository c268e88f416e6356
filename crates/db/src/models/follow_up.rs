use chrono::{NaiveDate, NaiveTime};
use prospect_core::{FollowUp, FollowUpMethod, FollowUpStatus};
use uuid::Uuid;

use super::{datetime_to_timestamp, timestamp_to_datetime, DATE_FORMAT, TIME_FORMAT};
use crate::error::DbError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FollowUpRow {
    pub id: String,
    pub prospect_id: String,
    pub date: String,
    pub time: String,
    pub method: String,
    pub notes: String,
    pub status: String,
    pub ai_suggested_tone: Option<String>,
    pub ai_suggested_content: Option<String>,
    pub ai_suggested_tool: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl FollowUpRow {
    pub fn into_domain(self) -> Result<FollowUp, DbError> {
        let invalid = |reason: String| DbError::invalid_row("follow_ups", &self.id, reason);

        let id = Uuid::parse_str(&self.id).map_err(|e| invalid(e.to_string()))?;
        let prospect_id = Uuid::parse_str(&self.prospect_id).map_err(|e| invalid(e.to_string()))?;
        let date = NaiveDate::parse_from_str(&self.date, DATE_FORMAT).map_err(|e| invalid(e.to_string()))?;
        let time = NaiveTime::parse_from_str(&self.time, TIME_FORMAT).map_err(|e| invalid(e.to_string()))?;
        let method = FollowUpMethod::parse(&self.method)
            .ok_or_else(|| invalid(format!("unknown method '{}'", self.method)))?;
        let status = FollowUpStatus::parse(&self.status)
            .ok_or_else(|| invalid(format!("unknown status '{}'", self.status)))?;

        Ok(FollowUp {
            id,
            prospect_id,
            date,
            time,
            method,
            notes: self.notes,
            status,
            ai_suggested_tone: self.ai_suggested_tone,
            ai_suggested_content: self.ai_suggested_content,
            ai_suggested_tool: self.ai_suggested_tool,
            created_at: timestamp_to_datetime(self.created_at),
            updated_at: timestamp_to_datetime(self.updated_at),
        })
    }
}

impl From<&FollowUp> for FollowUpRow {
    fn from(follow_up: &FollowUp) -> Self {
        Self {
            id: follow_up.id.to_string(),
            prospect_id: follow_up.prospect_id.to_string(),
            date: follow_up.date.format(DATE_FORMAT).to_string(),
            time: follow_up.time.format(TIME_FORMAT).to_string(),
            method: follow_up.method.as_str().to_string(),
            notes: follow_up.notes.clone(),
            status: follow_up.status.as_str().to_string(),
            ai_suggested_tone: follow_up.ai_suggested_tone.clone(),
            ai_suggested_content: follow_up.ai_suggested_content.clone(),
            ai_suggested_tool: follow_up.ai_suggested_tool.clone(),
            created_at: datetime_to_timestamp(follow_up.created_at),
            updated_at: datetime_to_timestamp(follow_up.updated_at),
        }
    }
}
