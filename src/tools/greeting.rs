use serde_json::json;

use crate::core::content::ToolOutput;
use crate::domain::{DomainError, Tool};

/// Per-language greeting templates; `{}` is replaced with the caller's name.
/// Domain configuration, not core contract: swap the table and the declared
/// enum follows.
pub type GreetingTable = &'static [(&'static str, &'static str)];

pub const DEFAULT_GREETINGS: GreetingTable = &[
    ("english", "Hello, {}! Nice to meet you!"),
    ("spanish", "¡Hola, {}! ¡Mucho gusto!"),
    ("french", "Bonjour, {} ! Enchanté !"),
    ("german", "Hallo, {}! Schön, dich kennenzulernen!"),
    ("japanese", "こんにちは、{}さん！はじめまして！"),
    ("korean", "안녕하세요, {}님! 만나서 반갑습니다!"),
];

const DEFAULT_LANGUAGE: &str = "english";

pub struct GreetingTool {
    table: GreetingTable,
}

impl Default for GreetingTool {
    fn default() -> Self {
        Self { table: DEFAULT_GREETINGS }
    }
}

impl GreetingTool {
    pub fn with_table(table: GreetingTable) -> Self {
        Self { table }
    }

    fn languages(&self) -> Vec<&'static str> {
        self.table.iter().map(|(lang, _)| *lang).collect()
    }
}

#[async_trait::async_trait]
impl Tool for GreetingTool {
    fn name(&self) -> &'static str {
        "greeting"
    }

    fn description(&self) -> &'static str {
        "Greet someone by name in a supported language"
    }

    fn input_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "description": "Who to greet" },
                "language": {
                    "type": "string",
                    "enum": self.languages(),
                    "description": "Greeting language (default english)"
                }
            },
            "required": ["name"]
        })
    }

    async fn call(&self, arguments: &serde_json::Value) -> Result<ToolOutput, DomainError> {
        let name = arguments
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| DomainError::msg("missing required field: name"))?;
        let language = arguments
            .get("language")
            .and_then(|v| v.as_str())
            .unwrap_or(DEFAULT_LANGUAGE);

        // The validator already pinned `language` to the declared enum; a
        // miss here means the table and schema drifted apart.
        let template = self
            .table
            .iter()
            .find(|(lang, _)| *lang == language)
            .map(|(_, template)| *template)
            .ok_or_else(|| DomainError::Message(format!("unsupported language: {language}")))?;

        Ok(ToolOutput::text(template.replacen("{}", name, 1)))
    }
}
