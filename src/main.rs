use std::fs::File;
use std::sync::Mutex;

use nokeyfinance::NokeyError;
use nokeyfinance::config::fetch_config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), NokeyError> {
    let app_config = fetch_config()?;

    // The dashboard owns the terminal, so logs go to a file.
    let log_file = File::create(&app_config.log_file)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();

    nokeyfinance::tui::run(app_config).await
}
