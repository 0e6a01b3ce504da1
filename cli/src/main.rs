#![allow(clippy::exit)]

use anyhow::Result;
use clap::Parser as _;
use pagecraft_cli::cli::{Cli, Commands};
use pagecraft_cli::commands::{generate_completions, run_upload};
use pagecraft_cli::timing;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with timing support
    timing::init_tracing(cli.verbose, cli.timing);

    match cli.command {
        Commands::Upload(args) => {
            let report = run_upload(args).await?;
            if !report.is_success() {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Completions { shell } => {
            generate_completions(shell);
            Ok(())
        }
    }
}
