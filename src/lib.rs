pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::cli::{Prompt, ui};
use crate::core::config::AppConfig;
use crate::core::record::ConversionRecord;
use crate::providers::FastForexProvider;
use crate::store::ConversionLog;
use anyhow::Result;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::{debug, info};

/// Runs an interactive session on the console at the rates of `date`.
pub async fn run(date: &str, config_path: Option<&str>, log_dir: Option<&Path>) -> Result<()> {
    ui::print_note("Enter an amount, then the currency to convert from and to. Type END to quit.");
    run_with_prompt(date, config_path, log_dir, Prompt::stdio())
        .await
        .map(|_| ())
}

/// Same as [`run`] but reads answers from and writes to `prompt`.
///
/// `log_dir` takes precedence over the configured `logDir`; without either the
/// log is kept next to the executable.
pub async fn run_with_prompt<R, W>(
    date: &str,
    config_path: Option<&str>,
    log_dir: Option<&Path>,
    prompt: Prompt<R, W>,
) -> Result<Vec<ConversionRecord>>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    info!("Currency converter starting for {}", date);

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!(base_url = %config.base_url, "Loaded config");

    let provider = FastForexProvider::new(&config.base_url, &config.api_key)?;
    let log = match log_dir.map(Path::to_path_buf).or(config.log_dir) {
        Some(dir) => ConversionLog::new(dir),
        None => ConversionLog::in_program_dir()?,
    };
    debug!("Writing conversions to {}", log.dir().display());

    cli::convert::run(date, &provider, &log, prompt).await
}
