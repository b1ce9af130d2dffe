use serde_json::json;

use crate::core::content::PromptMessage;
use crate::domain::{DomainError, Prompt};
use crate::tools::greeting::DEFAULT_GREETINGS;

/// Template asking a model to write a warm greeting. Shares the greeting
/// tool's language table so both surfaces advertise the same closed set.
#[derive(Clone, Default)]
pub struct FriendlyGreetingPrompt;

#[async_trait::async_trait]
impl Prompt for FriendlyGreetingPrompt {
    fn name(&self) -> &'static str {
        "friendly_greeting"
    }

    fn description(&self) -> &'static str {
        "Ask for a warm, personal greeting in a supported language"
    }

    fn input_schema(&self) -> serde_json::Value {
        let languages: Vec<&str> = DEFAULT_GREETINGS.iter().map(|(lang, _)| *lang).collect();
        json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "description": "Who the greeting is for" },
                "language": { "type": "string", "enum": languages }
            },
            "required": ["name"]
        })
    }

    async fn render(&self, arguments: &serde_json::Value) -> Result<Vec<PromptMessage>, DomainError> {
        let name = arguments
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| DomainError::msg("missing required field: name"))?;
        let language = arguments
            .get("language")
            .and_then(|v| v.as_str())
            .unwrap_or("english");

        Ok(vec![PromptMessage::user(format!(
            "Write a short, warm greeting for {name} in {language}. \
             Keep it under two sentences and make it feel personal."
        ))])
    }
}
