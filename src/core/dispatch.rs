//! Per-request dispatch: resolve, validate, execute, normalize.
//!
//! Every state is terminal; nothing retries here. A client wanting a retry
//! issues a new request. Handler panics are absorbed at this boundary so a
//! single bad invocation never takes the server down with it.

use std::sync::Arc;

use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::core::content::{CallToolResult, GetPromptResult, ReadResourceResult};
use crate::core::registry::CapabilityRegistry;
use crate::core::schema::{self, SchemaError};

/// Protocol-level dispatch failures. Domain failures never appear here;
/// they are normalized into the result payload instead.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("unknown resource: {0}")]
    UnknownResource(String),
    #[error("unknown prompt: {0}")]
    UnknownPrompt(String),
    #[error(transparent)]
    InvalidArguments(#[from] SchemaError),
    /// A resource or prompt handler's own failure; tools never land here
    /// since their domain failures ride the `isError` content channel.
    #[error("{0}")]
    Domain(String),
    #[error("handler for {0} failed unexpectedly")]
    HandlerFault(String),
}

impl DispatchError {
    /// JSON-RPC error code for this failure.
    pub fn code(&self) -> i32 {
        match self {
            DispatchError::UnknownTool(_)
            | DispatchError::UnknownResource(_)
            | DispatchError::UnknownPrompt(_)
            | DispatchError::InvalidArguments(_) => -32602,
            DispatchError::Domain(_) | DispatchError::HandlerFault(_) => -32603,
        }
    }
}

/// Run one tool invocation to completion.
pub async fn call_tool(
    registry: &Arc<CapabilityRegistry>,
    name: &str,
    arguments: &JsonValue,
) -> Result<CallToolResult, DispatchError> {
    // Resolving
    let tool = registry
        .tool(name)
        .ok_or_else(|| DispatchError::UnknownTool(name.to_string()))?
        .clone();

    // Validating: the handler must not run on malformed input.
    schema::validate(&tool.input_schema(), arguments)?;

    // Executing: spawned so a panicking handler surfaces as a JoinError
    // here instead of unwinding through the transport.
    let args = arguments.clone();
    let tool_name = tool.name();
    let joined = tokio::spawn(async move { tool.call(&args).await }).await;

    // Responding
    match joined {
        Ok(Ok(output)) => Ok(CallToolResult::from_output(output)),
        Ok(Err(domain)) => {
            tracing::warn!(tool = tool_name, error = %domain, "tool reported a domain failure");
            metrics::counter!("tool_domain_errors_total", "tool" => tool_name).increment(1);
            Ok(CallToolResult::from_failure(&domain))
        }
        Err(join_err) => {
            tracing::error!(tool = tool_name, error = %join_err, "tool handler fault");
            metrics::counter!("tool_faults_total", "tool" => tool_name).increment(1);
            Err(DispatchError::HandlerFault(tool_name.to_string()))
        }
    }
}

/// Read a resource by its fixed URI. No argument validation on this path.
pub async fn read_resource(
    registry: &Arc<CapabilityRegistry>,
    uri: &str,
) -> Result<ReadResourceResult, DispatchError> {
    let resource = registry
        .resource(uri)
        .ok_or_else(|| DispatchError::UnknownResource(uri.to_string()))?
        .clone();

    let resource_uri = resource.uri();
    let joined = tokio::spawn(async move { resource.read().await }).await;

    match joined {
        Ok(Ok(contents)) => Ok(ReadResourceResult { contents: vec![contents] }),
        Ok(Err(domain)) => {
            tracing::warn!(resource = resource_uri, error = %domain, "resource read failed");
            Err(DispatchError::Domain(domain.to_string()))
        }
        Err(join_err) => {
            tracing::error!(resource = resource_uri, error = %join_err, "resource handler fault");
            Err(DispatchError::HandlerFault(resource_uri.to_string()))
        }
    }
}

/// Render a prompt template with validated arguments.
pub async fn get_prompt(
    registry: &Arc<CapabilityRegistry>,
    name: &str,
    arguments: &JsonValue,
) -> Result<GetPromptResult, DispatchError> {
    let prompt = registry
        .prompt(name)
        .ok_or_else(|| DispatchError::UnknownPrompt(name.to_string()))?
        .clone();

    schema::validate(&prompt.input_schema(), arguments)?;

    let args = arguments.clone();
    let prompt_name = prompt.name();
    let description = prompt.description();
    let joined = tokio::spawn(async move { prompt.render(&args).await }).await;

    match joined {
        Ok(Ok(messages)) => Ok(GetPromptResult {
            description: Some(description.to_string()),
            messages,
        }),
        Ok(Err(domain)) => {
            tracing::warn!(prompt = prompt_name, error = %domain, "prompt render failed");
            Err(DispatchError::Domain(domain.to_string()))
        }
        Err(join_err) => {
            tracing::error!(prompt = prompt_name, error = %join_err, "prompt handler fault");
            Err(DispatchError::HandlerFault(prompt_name.to_string()))
        }
    }
}
