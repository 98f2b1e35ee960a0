use employee_api::{DataSourceLoader, DEFAULT_CONFIG_FILE};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match DataSourceLoader::new()
        .with_config_path(DEFAULT_CONFIG_FILE)
        .load()
    {
        Ok(options) => {
            tracing::info!(
                host = %options.host,
                port = options.port,
                database = %options.database,
                synchronize = options.synchronize,
                "employee-api ready to connect"
            );
            println!("{}", options.redacted_url());
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = %err, variables = ?err.variables(), "refusing to start");
            ExitCode::FAILURE
        }
    }
}
