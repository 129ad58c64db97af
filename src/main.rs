mod chart;
mod cli;
mod export;
mod extract;
mod loader;
mod metrics;
mod model;
mod text_summary;

use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() {
    init_tracing();

    let args = match cli::Cli::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                tracing::debug!(error = %e, "invalid arguments");
                println!("{}", cli::USAGE);
                std::process::exit(1);
            }
        },
    };

    match cli::run(args) {
        Ok(()) => {}
        Err(cli::RunError::MissingInput(path)) => {
            println!("Error: File {} not found", path.display());
            std::process::exit(1);
        }
        Err(cli::RunError::Processing(e)) => {
            println!("Error processing data: {e:#}");
            std::process::exit(1);
        }
    }
}
