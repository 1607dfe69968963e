use anyhow::Result;
use clap::Parser;
use clap::error::ErrorKind;
use fxconv::core::input::is_date_shape;
use fxconv::core::log::init_logging;
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "Date argument is required in format YYYY-MM-DD.";

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Date of the exchange rates to convert with, as YYYY-MM-DD
    #[arg(allow_hyphen_values = true)]
    date: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Path to the configuration file, defaults to ./config.json
    #[arg(short, long)]
    config_path: Option<String>,

    /// Directory for the conversion logs, defaults to the program's directory
    #[arg(short, long)]
    log_dir: Option<PathBuf>,

    /// Anything after the date is ignored
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    _ignored: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.print()?;
            return Ok(ExitCode::SUCCESS);
        }
        Err(_) => {
            println!("{USAGE}");
            return Ok(ExitCode::FAILURE);
        }
    };

    init_logging(cli.verbose);

    let Some(date) = cli.date.as_deref().filter(|date| is_date_shape(date)) else {
        println!("{USAGE}");
        return Ok(ExitCode::FAILURE);
    };

    let result = fxconv::run(date, cli.config_path.as_deref(), cli.log_dir.as_deref()).await;

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result.map(|_| ExitCode::SUCCESS)
}
