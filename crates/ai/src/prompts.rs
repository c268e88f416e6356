//! Prompt templates for the generation flows. Each builder serializes the
//! flow's input as JSON and states the exact reply shape expected.

use chrono::NaiveDateTime;
use prospect_core::{Interaction, Prospect, MAX_STAGE_NUMBER, MIN_STAGE_NUMBER};
use serde_json::{json, Value};

/// Interactions older than this many entries are left out of prompts.
const MAX_PROMPT_INTERACTIONS: usize = 10;

pub const COLOR_CODE_SYSTEM: &str = "You assign a color to a sales prospect based on how far along \
their follow-up sequence is. Early stages are red, middle stages move through orange and yellow, \
late stages are green. Reply with JSON only.";

pub const MESSAGE_SYSTEM: &str = "You are a sales coach who drafts short, personal follow-up \
messages. Pick a tone that fits the relationship so far. Reply with JSON only.";

pub const SCHEDULE_SYSTEM: &str = "You plan follow-up schedules for sales prospects. Space \
follow-ups sensibly for the prospect's funnel stage and never schedule in the past. \
Reply with JSON only.";

pub const TOOLS_SYSTEM: &str = "You recommend third-party sales tools (videos, presentations, \
introductions to third parties) that move a prospect to the next funnel stage. \
Reply with JSON only.";

fn interactions_json(history: &[Interaction]) -> Value {
    let skip = history.len().saturating_sub(MAX_PROMPT_INTERACTIONS);
    Value::Array(
        history
            .iter()
            .skip(skip)
            .map(|i| {
                json!({
                    "date": i.date.to_rfc3339(),
                    "type": i.interaction_type.label(),
                    "summary": i.summary,
                    "outcome": i.outcome,
                })
            })
            .collect(),
    )
}

fn prospect_data_json(prospect: &Prospect) -> Value {
    json!({
        "name": prospect.name,
        "email": prospect.email,
        "phone": prospect.phone,
        "initialData": prospect.initial_data,
        "followUpStageNumber": prospect.follow_up_stage_number,
        "lastContactedDate": prospect.last_contacted_date.map(|d| d.to_rfc3339()),
    })
}

fn render(input: &Value) -> String {
    serde_json::to_string_pretty(input).unwrap_or_else(|_| input.to_string())
}

pub fn color_code_prompt(stage: u8, prospect_name: &str) -> String {
    let input = json!({ "stage": stage, "prospectName": prospect_name });
    format!(
        "Input:\n{}\n\n\
         The stage runs from {min} (just added, color it red) to {max} (ready to close, color it green).\n\
         Reply with: {{\"colorCode\": \"#RRGGBB\", \"reasoning\": \"one sentence\"}}",
        render(&input),
        min = MIN_STAGE_NUMBER,
        max = MAX_STAGE_NUMBER,
    )
}

pub fn message_prompt(prospect: &Prospect, follow_up_number: u32) -> String {
    let input = json!({
        "prospectData": prospect_data_json(prospect),
        "previousInteractions": interactions_json(&prospect.interaction_history),
        "followUpNumber": follow_up_number,
        "funnelStage": prospect.current_funnel_stage.label(),
    });
    format!(
        "Input:\n{}\n\n\
         Draft the next follow-up message.\n\
         Reply with: {{\"tone\": \"friendly\" | \"professional\" | \"urgent\", \
         \"content\": \"message text\", \"suggestedTool\": \"optional tool name\"}}",
        render(&input)
    )
}

pub fn schedule_prompt(
    prospect: &Prospect,
    user_preferences: Option<&str>,
    now: NaiveDateTime,
) -> String {
    let input = json!({
        "prospectData": prospect_data_json(prospect),
        "interactionHistory": interactions_json(&prospect.interaction_history),
        "currentFunnelStage": prospect.current_funnel_stage.label(),
        "userPreferences": user_preferences.unwrap_or("none"),
    });
    format!(
        "Current date and time: {}\n\nInput:\n{}\n\n\
         Propose upcoming follow-ups. Every entry must be after the current date and time.\n\
         Reply with: {{\"followUpSchedule\": [{{\"date\": \"YYYY-MM-DD\", \"time\": \"HH:MM\", \
         \"method\": \"Email\" | \"Call\" | \"In-Person\", \"notes\": \"...\"}}], \
         \"reasoning\": \"...\"}}",
        now.format("%Y-%m-%d %H:%M"),
        render(&input)
    )
}

pub fn tools_prompt(prospect: &Prospect) -> String {
    let input = json!({
        "prospectName": prospect.name,
        "funnelStage": prospect.current_funnel_stage.label(),
        "prospectInfo": prospect.initial_data,
        "previousInteractions": interactions_json(&prospect.interaction_history),
    });
    format!(
        "Input:\n{}\n\n\
         Suggest exactly 3 tools.\n\
         Reply with: {{\"toolSuggestions\": [{{\"toolName\": \"...\", \
         \"toolType\": \"media\" | \"presentation\" | \"third_party\", \
         \"reasoning\": \"...\", \"details\": \"optional\"}}]}}",
        render(&input)
    )
}
