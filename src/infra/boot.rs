use std::net::SocketAddr;
use std::sync::Arc;

use crate::api::rpc::AppState;
use crate::clients::imagine::ImagineRemote;
use crate::core::registry::{CapabilityRegistry, RegistryError};
use crate::core::rpc::ServerIdentity;
use crate::infra::config::{AppConfig, Config};
use crate::prompts::greeting::FriendlyGreetingPrompt;
use crate::resources::server_info::ServerInfoResource;
use crate::tools::calculator::CalculatorTool;
use crate::tools::clock::ClockTool;
use crate::tools::greeting::GreetingTool;
use crate::tools::imagine::ImagineTool;

/// The startup registration phase: every capability is registered exactly
/// once, then the registry is frozen behind an `Arc`. A duplicate name here
/// aborts startup.
pub fn build_registry(cfg: &AppConfig) -> Result<Arc<CapabilityRegistry>, RegistryError> {
    let info = Arc::new(ServerInfoResource::new(ServerIdentity::default()));

    let mut registry = CapabilityRegistry::new();
    registry.register_tool(Arc::new(GreetingTool::default()))?;
    registry.register_tool(Arc::new(CalculatorTool))?;
    registry.register_tool(Arc::new(ClockTool))?;
    registry.register_tool(Arc::new(ImagineTool::new(ImagineRemote::from_config(&cfg.imagine))))?;
    registry.register_resource(info.clone())?;
    registry.register_prompt(Arc::new(FriendlyGreetingPrompt))?;

    let registry = Arc::new(registry);
    info.attach(Arc::downgrade(&registry));
    Ok(registry)
}

pub async fn run_server() -> anyhow::Result<()> {
    let cfg = Config::from_env();
    let app_cfg = AppConfig::from_env_and_toml();
    tracing::info!(mode = %cfg.mode, port = cfg.port, "BOOT sidekick-mcp");

    let registry = build_registry(&app_cfg)?;
    let state = AppState::new(registry);

    // Stdio mode: speak JSON-RPC over stdin/stdout ONLY (no HTTP).
    if cfg.mode == "stdio" {
        crate::infra::runtime::stdio::serve(state).await?;
        return Ok(());
    }

    let app = crate::infra::http_app::build_app(state);
    let addr: SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}
