pub fn init() {
    // Initialize tracing subscriber once, honoring RUST_LOG if set.
    // Diagnostics go to stderr: in stdio mode stdout carries protocol
    // frames and must stay clean.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Record a per-capability measurement on the metrics facade and mirror it
/// as a log line for environments without an exporter attached.
pub fn log_metric(capability: &str, metric: &'static str, value: f64) {
    metrics::histogram!(metric, "capability" => capability.to_string()).record(value);
    tracing::info!(capability = capability, metric = metric, value = value, "metric");
}
