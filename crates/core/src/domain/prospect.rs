use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::interaction::Interaction;
use crate::error::CoreError;

pub const MIN_STAGE_NUMBER: u8 = 1;
pub const MAX_STAGE_NUMBER: u8 = 12;

/// Color assigned when text generation is unavailable.
pub const NEUTRAL_COLOR_CODE: &str = "#CCCCCC";
pub const FALLBACK_COLOR_REASONING: &str =
    "Color code could not be generated; a neutral color was assigned.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "snake_case")]
pub enum FunnelStage {
    #[default]
    Prospect,
    ViewedMedia,
    SpokeWithThirdParty,
    Close,
}

impl FunnelStage {
    pub const ALL: [FunnelStage; 4] = [
        Self::Prospect,
        Self::ViewedMedia,
        Self::SpokeWithThirdParty,
        Self::Close,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prospect => "prospect",
            Self::ViewedMedia => "viewed_media",
            Self::SpokeWithThirdParty => "spoke_with_third_party",
            Self::Close => "close",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "prospect" => Some(Self::Prospect),
            "viewed_media" => Some(Self::ViewedMedia),
            "spoke_with_third_party" => Some(Self::SpokeWithThirdParty),
            "close" => Some(Self::Close),
            _ => None,
        }
    }

    /// Human-readable label, as shown to users and in prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Prospect => "Prospect",
            Self::ViewedMedia => "Viewed Media/Presentation",
            Self::SpokeWithThirdParty => "Spoke with Third-Party",
            Self::Close => "Close",
        }
    }

    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Prospect => Some(Self::ViewedMedia),
            Self::ViewedMedia => Some(Self::SpokeWithThirdParty),
            Self::SpokeWithThirdParty => Some(Self::Close),
            Self::Close => None,
        }
    }

    /// 1-based position in the funnel and the total number of stages.
    pub fn progress(&self) -> (usize, usize) {
        let position = Self::ALL
            .iter()
            .position(|stage| stage == self)
            .map(|i| i + 1)
            .unwrap_or(1);
        (position, Self::ALL.len())
    }
}

/// A generated color indicator together with its justification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ColorCode {
    pub color_code: String,
    pub reasoning: String,
}

impl ColorCode {
    pub fn neutral() -> Self {
        Self {
            color_code: NEUTRAL_COLOR_CODE.to_string(),
            reasoning: FALLBACK_COLOR_REASONING.to_string(),
        }
    }

    pub fn is_neutral(&self) -> bool {
        self.color_code.eq_ignore_ascii_case(NEUTRAL_COLOR_CODE)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Prospect {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub initial_data: String,
    pub current_funnel_stage: FunnelStage,
    pub follow_up_stage_number: u8,
    pub color_code: String,
    pub color_code_reasoning: String,
    pub last_contacted_date: Option<DateTime<Utc>>,
    pub next_follow_up_date: Option<NaiveDate>,
    pub interaction_history: Vec<Interaction>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Prospect {
    pub fn new(request: CreateProspectRequest, color: ColorCode) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: request.name.trim().to_string(),
            email: request.email,
            phone: request.phone,
            initial_data: request.initial_data,
            current_funnel_stage: request.current_funnel_stage,
            follow_up_stage_number: request.follow_up_stage_number,
            color_code: color.color_code,
            color_code_reasoning: color.reasoning,
            last_contacted_date: None,
            next_follow_up_date: None,
            interaction_history: Vec::new(),
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

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn apply_color(&mut self, color: ColorCode) {
        self.color_code = color.color_code;
        self.color_code_reasoning = color.reasoning;
    }

    pub fn has_neutral_color(&self) -> bool {
        self.color_code.is_empty() || self.color_code.eq_ignore_ascii_case(NEUTRAL_COLOR_CODE)
    }

    /// Appends an interaction and marks the prospect as contacted on its date.
    pub fn record_interaction(&mut self, interaction: Interaction) {
        self.last_contacted_date = Some(interaction.date);
        self.interaction_history.push(interaction);
        self.touch();
    }

    /// Merges a partial update. Returns whether the stage number changed value.
    pub fn apply_update(&mut self, update: &UpdateProspectRequest) -> Result<bool, CoreError> {
        update.validate()?;

        if let Some(name) = &update.name {
            self.name = name.trim().to_string();
        }
        if let Some(email) = &update.email {
            self.email = Some(email.clone());
        }
        if let Some(phone) = &update.phone {
            self.phone = Some(phone.clone());
        }
        if let Some(initial_data) = &update.initial_data {
            self.initial_data = initial_data.clone();
        }
        if let Some(stage) = update.current_funnel_stage {
            self.current_funnel_stage = stage;
        }

        let mut stage_number_changed = false;
        if let Some(stage_number) = update.follow_up_stage_number {
            stage_number_changed = stage_number != self.follow_up_stage_number;
            self.follow_up_stage_number = stage_number;
        }

        self.touch();
        Ok(stage_number_changed)
    }
}

pub fn validate_stage_number(stage_number: u8) -> Result<(), CoreError> {
    if !(MIN_STAGE_NUMBER..=MAX_STAGE_NUMBER).contains(&stage_number) {
        return Err(CoreError::validation(format!(
            "Follow-up stage number must be between {} and {}, got {}",
            MIN_STAGE_NUMBER, MAX_STAGE_NUMBER, stage_number
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct CreateProspectRequest {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub initial_data: String,
    pub current_funnel_stage: FunnelStage,
    pub follow_up_stage_number: u8,
}

impl CreateProspectRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.name.trim().is_empty() {
            return Err(CoreError::validation("Name cannot be empty"));
        }
        if self.initial_data.trim().is_empty() {
            return Err(CoreError::validation("Initial data cannot be empty"));
        }
        validate_stage_number(self.follow_up_stage_number)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, ToSchema)]
#[cfg_attr(feature = "typescript", derive(ts_rs::TS))]
#[cfg_attr(feature = "typescript", ts(export))]
#[serde(rename_all = "camelCase")]
pub struct UpdateProspectRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub initial_data: Option<String>,
    pub current_funnel_stage: Option<FunnelStage>,
    pub follow_up_stage_number: Option<u8>,
}

impl UpdateProspectRequest {
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(CoreError::validation("Name cannot be empty"));
            }
        }
        if let Some(initial_data) = &self.initial_data {
            if initial_data.trim().is_empty() {
                return Err(CoreError::validation("Initial data cannot be empty"));
            }
        }
        if let Some(stage_number) = self.follow_up_stage_number {
            validate_stage_number(stage_number)?;
        }
        Ok(())
    }
}
