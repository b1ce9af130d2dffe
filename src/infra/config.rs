use serde::Deserialize;

/// Process-level settings resolved from the environment.
pub struct Config {
    pub mode: String, // "server" or "stdio"
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        let mode = std::env::var("MODE").unwrap_or_else(|_| "server".into());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(8080);

        Self { mode, port }
    }
}

/// Per-collaborator settings for an outbound HTTP client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToolConfig {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub connect_timeout_ms: Option<u64>,
    pub timeout_ms: Option<u64>,
    pub retries: Option<u32>,
}

/// Capability-level configuration: optional TOML file, env overrides on top.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub imagine: ToolConfig,
}

impl AppConfig {
    /// Load `SIDEKICK_CONFIG` (if set and readable) and then apply env
    /// overrides. Credentials end up injected into handler construction at
    /// startup; handlers never read the process environment at call time.
    pub fn from_env_and_toml() -> Self {
        let mut cfg = std::env::var("SIDEKICK_CONFIG")
            .ok()
            .and_then(|path| std::fs::read_to_string(path).ok())
            .and_then(|raw| match toml::from_str::<AppConfig>(&raw) {
                Ok(cfg) => Some(cfg),
                Err(e) => {
                    tracing::warn!(error = %e, "ignoring malformed config file");
                    None
                }
            })
            .unwrap_or_default();

        if let Ok(base) = std::env::var("IMAGINE_BASE_URL") {
            if !base.trim().is_empty() {
                cfg.imagine.base_url = Some(base);
            }
        }
        if let Ok(key) = std::env::var("IMAGINE_API_KEY") {
            if !key.trim().is_empty() {
                cfg.imagine.api_key = Some(key);
            }
        }

        cfg
    }
}
