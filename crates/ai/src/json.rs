use tracing::{debug, warn};

use crate::error::{AiError, AiResult};

/// Pulls a JSON value out of a model reply.
///
/// Tries a fenced code block first, then the outermost `{ ... }` span, then
/// the whole reply.
pub fn extract_json(response: &str) -> AiResult<serde_json::Value> {
    if let Some(json) = extract_from_codeblock(response) {
        return serde_json::from_str(json).map_err(|e| {
            debug!(error = %e, "Code block did not contain valid JSON");
            AiError::invalid(format!("Invalid JSON in code block: {}", e))
        });
    }

    if let Some(json) = extract_raw_object(response) {
        if let Ok(value) = serde_json::from_str(json) {
            return Ok(value);
        }
    }

    serde_json::from_str(response.trim()).map_err(|e| {
        warn!(error = %e, response_len = response.len(), "No valid JSON found in reply");
        AiError::invalid(format!("No valid JSON found in reply: {}", e))
    })
}

fn extract_from_codeblock(text: &str) -> Option<&str> {
    for pattern in ["```json", "```JSON", "```"] {
        if let Some(start_idx) = text.find(pattern) {
            let body_start = start_idx + pattern.len();
            if let Some(end_idx) = text[body_start..].find("```") {
                return Some(text[body_start..body_start + end_idx].trim());
            }
        }
    }
    None
}

fn extract_raw_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_fenced_block() {
        let reply = "Here you go:\n```json\n{\"colorCode\": \"#FF0000\"}\n```\nThanks";
        let value = extract_json(reply).unwrap();
        assert_eq!(value["colorCode"], "#FF0000");
    }

    #[test]
    fn test_extracts_raw_object_with_chatter() {
        let reply = "Sure! {\"tone\": \"friendly\", \"content\": \"Hi\"} Let me know.";
        let value = extract_json(reply).unwrap();
        assert_eq!(value["tone"], "friendly");
    }

    #[test]
    fn test_whole_reply_array() {
        let value = extract_json("  [1, 2, 3] ").unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(3));
    }

    #[test]
    fn test_garbage_is_invalid_output() {
        let err = extract_json("I cannot help with that").unwrap_err();
        assert!(matches!(err, AiError::InvalidOutput(_)));
    }
}
