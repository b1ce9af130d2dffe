use std::sync::{OnceLock, Weak};

use serde_json::json;

use crate::core::content::ResourceContents;
use crate::core::registry::CapabilityRegistry;
use crate::core::rpc::ServerIdentity;
use crate::domain::{DomainError, Resource};

pub const SERVER_INFO_URI: &str = "info://server";

/// Self-description of the running server: a fresh snapshot of the registry
/// on every read, never cached.
///
/// The registry owns this resource and the resource reads the registry; the
/// cycle is broken with a `Weak` installed via [`attach`](Self::attach) once
/// the registry is frozen into its `Arc`.
pub struct ServerInfoResource {
    identity: ServerIdentity,
    registry: OnceLock<Weak<CapabilityRegistry>>,
}

impl ServerInfoResource {
    pub fn new(identity: ServerIdentity) -> Self {
        Self { identity, registry: OnceLock::new() }
    }

    /// Install the back-reference. Called exactly once, after registration.
    pub fn attach(&self, registry: Weak<CapabilityRegistry>) {
        let _ = self.registry.set(registry);
    }
}

#[async_trait::async_trait]
impl Resource for ServerInfoResource {
    fn uri(&self) -> &'static str {
        SERVER_INFO_URI
    }

    fn name(&self) -> &'static str {
        "Server info"
    }

    fn description(&self) -> &'static str {
        "Capabilities currently registered, grouped by kind"
    }

    fn mime_type(&self) -> &'static str {
        "application/json"
    }

    async fn read(&self) -> Result<ResourceContents, DomainError> {
        let registry = self
            .registry
            .get()
            .and_then(Weak::upgrade)
            .ok_or_else(|| DomainError::msg("server registry is not available"))?;

        let mut tools: Vec<&str> = registry.tool_names().collect();
        let mut resources: Vec<&str> = registry.resource_uris().collect();
        let mut prompts: Vec<&str> = registry.prompt_names().collect();
        tools.sort_unstable();
        resources.sort_unstable();
        prompts.sort_unstable();

        let snapshot = json!({
            "name": self.identity.name,
            "version": self.identity.version,
            "description": "A small MCP server with everyday tools",
            "capabilities": {
                "tools": tools,
                "resources": resources,
                "prompts": prompts,
            },
            "generatedAt": chrono::Utc::now().to_rfc3339(),
        });

        Ok(ResourceContents::json(SERVER_INFO_URI, &snapshot))
    }
}
