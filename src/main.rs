use std::process::ExitCode;

use sidekick_mcp::{cli, infra};

#[tokio::main]
async fn main() -> ExitCode {
    infra::logging::init();

    // With arguments we act as the admin CLI; bare invocation runs the server.
    if std::env::args().len() > 1 {
        return cli::run().await;
    }

    match infra::boot::run_server().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "fatal startup failure");
            ExitCode::from(2)
        }
    }
}
