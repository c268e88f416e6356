use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use prospect_core::{ColorCode, Prospect};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::{AiError, AiResult};
use crate::generator::TextGenerator;
use crate::json::extract_json;
use crate::prompts;
use crate::suggestions::{
    validate_color_code, MessageSuggestion, ScheduleSuggestion, ToolSuggestions,
};

pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs the generation flows against a [`TextGenerator`].
///
/// The `try_*` methods surface [`AiError`]; the plain methods log the failure
/// and return the flow's fallback instead.
#[derive(Clone)]
pub struct Assistant {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl Assistant {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            timeout: DEFAULT_GENERATION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    async fn generate<T: DeserializeOwned>(
        &self,
        flow: &'static str,
        system: &str,
        prompt: &str,
    ) -> AiResult<T> {
        debug!(flow, generator = self.generator.name(), "Requesting generation");

        let reply = tokio::time::timeout(self.timeout, self.generator.complete(system, prompt))
            .await
            .map_err(|_| AiError::Timeout(self.timeout.as_secs()))??;

        let value = extract_json(&reply)?;
        serde_json::from_value(value)
            .map_err(|e| AiError::invalid(format!("{} reply does not match schema: {}", flow, e)))
    }

    pub async fn try_color_code(&self, stage: u8, prospect_name: &str) -> AiResult<ColorCode> {
        let prompt = prompts::color_code_prompt(stage, prospect_name);
        let color: ColorCode = self
            .generate("color_code", prompts::COLOR_CODE_SYSTEM, &prompt)
            .await?;
        validate_color_code(color)
    }

    /// Color for a stage number, or the neutral fallback.
    pub async fn color_code(&self, stage: u8, prospect_name: &str) -> ColorCode {
        match self.try_color_code(stage, prospect_name).await {
            Ok(color) => color,
            Err(e) => {
                warn!(stage, error = %e, "Color code generation failed, using neutral color");
                ColorCode::neutral()
            }
        }
    }

    pub async fn try_suggest_message(
        &self,
        prospect: &Prospect,
        follow_up_number: u32,
    ) -> AiResult<MessageSuggestion> {
        let prompt = prompts::message_prompt(prospect, follow_up_number);
        let suggestion: MessageSuggestion = self
            .generate("message", prompts::MESSAGE_SYSTEM, &prompt)
            .await?;
        suggestion.validate()
    }

    pub async fn suggest_message(
        &self,
        prospect: &Prospect,
        follow_up_number: u32,
    ) -> MessageSuggestion {
        match self.try_suggest_message(prospect, follow_up_number).await {
            Ok(suggestion) => suggestion,
            Err(e) => {
                warn!(prospect_id = %prospect.id, error = %e, "Message suggestion failed, using fallback");
                MessageSuggestion::fallback(&prospect.name)
            }
        }
    }

    /// `now` is the local wall-clock time the schedule must lie after.
    pub async fn try_suggest_schedule(
        &self,
        prospect: &Prospect,
        user_preferences: Option<&str>,
        now: NaiveDateTime,
    ) -> AiResult<ScheduleSuggestion> {
        let prompt = prompts::schedule_prompt(prospect, user_preferences, now);
        let suggestion: ScheduleSuggestion = self
            .generate("schedule", prompts::SCHEDULE_SYSTEM, &prompt)
            .await?;
        Ok(suggestion.validate(now))
    }

    pub async fn suggest_schedule(
        &self,
        prospect: &Prospect,
        user_preferences: Option<&str>,
        now: NaiveDateTime,
    ) -> ScheduleSuggestion {
        match self
            .try_suggest_schedule(prospect, user_preferences, now)
            .await
        {
            Ok(suggestion) => suggestion,
            Err(e) => {
                warn!(prospect_id = %prospect.id, error = %e, "Schedule suggestion failed, using fallback");
                ScheduleSuggestion::fallback()
            }
        }
    }

    pub async fn try_suggest_tools(&self, prospect: &Prospect) -> AiResult<ToolSuggestions> {
        let prompt = prompts::tools_prompt(prospect);
        let tools: ToolSuggestions = self
            .generate("tools", prompts::TOOLS_SYSTEM, &prompt)
            .await?;
        tools.validate()
    }

    pub async fn suggest_tools(&self, prospect: &Prospect) -> ToolSuggestions {
        match self.try_suggest_tools(prospect).await {
            Ok(tools) => tools,
            Err(e) => {
                warn!(prospect_id = %prospect.id, error = %e, "Tool suggestion failed, using fallback");
                ToolSuggestions::fallback()
            }
        }
    }
}

impl std::fmt::Debug for Assistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assistant")
            .field("generator", &self.generator.name())
            .field("timeout", &self.timeout)
            .finish()
    }
}
