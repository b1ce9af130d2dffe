use thiserror::Error;

use crate::core::content::{PromptMessage, ResourceContents, ToolOutput};

/// A failure a handler expects and reports in its own words: division by
/// zero, an unknown timezone, a missing credential, an upstream outage.
/// These are ordinary responses on the wire, not faults.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    Message(String),
}

impl DomainError {
    pub fn msg(m: impl Into<String>) -> Self {
        DomainError::Message(m.into())
    }
}

impl From<String> for DomainError {
    fn from(m: String) -> Self {
        DomainError::Message(m)
    }
}

/// An invocable capability: validated arguments in, content out.
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    /// Declarative shape of the arguments object; checked by the schema
    /// validator before `call` runs.
    fn input_schema(&self) -> serde_json::Value;
    async fn call(&self, arguments: &serde_json::Value) -> Result<ToolOutput, DomainError>;
}

/// A readable capability addressed by a fixed URI. No arguments, no
/// validation step.
#[async_trait::async_trait]
pub trait Resource: Send + Sync {
    fn uri(&self) -> &'static str;
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn mime_type(&self) -> &'static str;
    async fn read(&self) -> Result<ResourceContents, DomainError>;
}

/// A parameterized text template rendered for downstream consumption.
#[async_trait::async_trait]
pub trait Prompt: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn input_schema(&self) -> serde_json::Value;
    async fn render(&self, arguments: &serde_json::Value) -> Result<Vec<PromptMessage>, DomainError>;
}
