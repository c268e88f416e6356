use chrono::NaiveDate;
use prospect_core::{FunnelStage, Interaction, InteractionType, Prospect};
use uuid::Uuid;

use super::{datetime_to_timestamp, timestamp_to_datetime, DATE_FORMAT};
use crate::error::DbError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProspectRow {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub initial_data: String,
    pub current_funnel_stage: String,
    pub follow_up_stage_number: i64,
    pub color_code: String,
    pub color_code_reasoning: String,
    pub last_contacted_date: Option<i64>,
    pub next_follow_up_date: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl ProspectRow {
    /// Builds the domain entity; `interactions` must already be in insertion order.
    pub fn into_domain(self, interactions: Vec<Interaction>) -> Result<Prospect, DbError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| DbError::invalid_row("prospects", &self.id, e.to_string()))?;
        let current_funnel_stage = FunnelStage::parse(&self.current_funnel_stage).ok_or_else(|| {
            DbError::invalid_row(
                "prospects",
                &self.id,
                format!("unknown funnel stage '{}'", self.current_funnel_stage),
            )
        })?;
        let follow_up_stage_number = u8::try_from(self.follow_up_stage_number)
            .map_err(|e| DbError::invalid_row("prospects", &self.id, e.to_string()))?;
        let next_follow_up_date = self
            .next_follow_up_date
            .as_deref()
            .map(|raw| NaiveDate::parse_from_str(raw, DATE_FORMAT))
            .transpose()
            .map_err(|e| DbError::invalid_row("prospects", &self.id, e.to_string()))?;

        Ok(Prospect {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            initial_data: self.initial_data,
            current_funnel_stage,
            follow_up_stage_number,
            color_code: self.color_code,
            color_code_reasoning: self.color_code_reasoning,
            last_contacted_date: self.last_contacted_date.map(timestamp_to_datetime),
            next_follow_up_date,
            interaction_history: interactions,
            created_at: timestamp_to_datetime(self.created_at),
            updated_at: timestamp_to_datetime(self.updated_at),
        })
    }
}

impl From<&Prospect> for ProspectRow {
    fn from(prospect: &Prospect) -> Self {
        Self {
            id: prospect.id.to_string(),
            name: prospect.name.clone(),
            email: prospect.email.clone(),
            phone: prospect.phone.clone(),
            initial_data: prospect.initial_data.clone(),
            current_funnel_stage: prospect.current_funnel_stage.as_str().to_string(),
            follow_up_stage_number: i64::from(prospect.follow_up_stage_number),
            color_code: prospect.color_code.clone(),
            color_code_reasoning: prospect.color_code_reasoning.clone(),
            last_contacted_date: prospect.last_contacted_date.map(datetime_to_timestamp),
            next_follow_up_date: prospect
                .next_follow_up_date
                .map(|d| d.format(DATE_FORMAT).to_string()),
            created_at: datetime_to_timestamp(prospect.created_at),
            updated_at: datetime_to_timestamp(prospect.updated_at),
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InteractionRow {
    pub id: String,
    pub prospect_id: String,
    pub position: i64,
    pub date: i64,
    pub interaction_type: String,
    pub summary: String,
    pub outcome: Option<String>,
}

impl InteractionRow {
    pub fn new(prospect_id: Uuid, position: i64, interaction: &Interaction) -> Self {
        Self {
            id: interaction.id.to_string(),
            prospect_id: prospect_id.to_string(),
            position,
            date: datetime_to_timestamp(interaction.date),
            interaction_type: interaction.interaction_type.as_str().to_string(),
            summary: interaction.summary.clone(),
            outcome: interaction.outcome.clone(),
        }
    }

    pub fn into_domain(self) -> Result<Interaction, DbError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| DbError::invalid_row("interactions", &self.id, e.to_string()))?;
        let interaction_type = InteractionType::parse(&self.interaction_type).ok_or_else(|| {
            DbError::invalid_row(
                "interactions",
                &self.id,
                format!("unknown interaction type '{}'", self.interaction_type),
            )
        })?;

        Ok(Interaction {
            id,
            date: timestamp_to_datetime(self.date),
            interaction_type,
            summary: self.summary,
            outcome: self.outcome,
        })
    }
}
