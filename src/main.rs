use osint_gateway::logging::init_logger;
use osint_gateway::{run_server, AppConfig};
use std::env;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let json_logs = env::var("LOG_FORMAT").map(|v| v == "json").unwrap_or(false);
    init_logger(json_logs);

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = run_server(config).await {
        tracing::error!(error = %e, "Server error");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
