//! Process-wide capability table: tools, resources, and prompts.
//!
//! Built once during startup, then frozen behind an `Arc` before any
//! transport accepts requests, so dispatch reads it without locking.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::domain::{Prompt, Resource, Tool};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityKind {
    Tool,
    Resource,
    Prompt,
}

impl std::fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CapabilityKind::Tool => write!(f, "tool"),
            CapabilityKind::Resource => write!(f, "resource"),
            CapabilityKind::Prompt => write!(f, "prompt"),
        }
    }
}

/// Registration-time failures abort startup.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicate {kind} registration: {name}")]
    Duplicate { kind: CapabilityKind, name: &'static str },
}

#[derive(Default)]
pub struct CapabilityRegistry {
    tools: HashMap<&'static str, Arc<dyn Tool>>,
    resources: HashMap<&'static str, Arc<dyn Resource>>,
    prompts: HashMap<&'static str, Arc<dyn Prompt>>,
}

/// Listing entry for `tools/list`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolMeta {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

/// Listing entry for `resources/list`.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceMeta {
    pub uri: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "mimeType")]
    pub mime_type: &'static str,
}

/// Listing entry for `prompts/list`.
#[derive(Debug, Clone, Serialize)]
pub struct PromptMeta {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: serde_json::Value,
}

impl CapabilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_tool(&mut self, tool: Arc<dyn Tool>) -> Result<(), RegistryError> {
        let name = tool.name();
        if self.tools.insert(name, tool).is_some() {
            return Err(RegistryError::Duplicate { kind: CapabilityKind::Tool, name });
        }
        Ok(())
    }

    pub fn register_resource(&mut self, resource: Arc<dyn Resource>) -> Result<(), RegistryError> {
        let uri = resource.uri();
        if self.resources.insert(uri, resource).is_some() {
            return Err(RegistryError::Duplicate { kind: CapabilityKind::Resource, name: uri });
        }
        Ok(())
    }

    pub fn register_prompt(&mut self, prompt: Arc<dyn Prompt>) -> Result<(), RegistryError> {
        let name = prompt.name();
        if self.prompts.insert(name, prompt).is_some() {
            return Err(RegistryError::Duplicate { kind: CapabilityKind::Prompt, name });
        }
        Ok(())
    }

    pub fn tool(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn resource(&self, uri: &str) -> Option<&Arc<dyn Resource>> {
        self.resources.get(uri)
    }

    pub fn prompt(&self, name: &str) -> Option<&Arc<dyn Prompt>> {
        self.prompts.get(name)
    }

    pub fn tool_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tools.keys().copied()
    }

    pub fn resource_uris(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.resources.keys().copied()
    }

    pub fn prompt_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.prompts.keys().copied()
    }

    pub fn list_tools(&self) -> Vec<ToolMeta> {
        let mut metas: Vec<ToolMeta> = self
            .tools
            .values()
            .map(|t| ToolMeta {
                name: t.name(),
                description: t.description(),
                input_schema: t.input_schema(),
            })
            .collect();
        metas.sort_by_key(|m| m.name);
        metas
    }

    pub fn list_resources(&self) -> Vec<ResourceMeta> {
        let mut metas: Vec<ResourceMeta> = self
            .resources
            .values()
            .map(|r| ResourceMeta {
                uri: r.uri(),
                name: r.name(),
                description: r.description(),
                mime_type: r.mime_type(),
            })
            .collect();
        metas.sort_by_key(|m| m.uri);
        metas
    }

    pub fn list_prompts(&self) -> Vec<PromptMeta> {
        let mut metas: Vec<PromptMeta> = self
            .prompts
            .values()
            .map(|p| PromptMeta {
                name: p.name(),
                description: p.description(),
                input_schema: p.input_schema(),
            })
            .collect();
        metas.sort_by_key(|m| m.name);
        metas
    }
}
