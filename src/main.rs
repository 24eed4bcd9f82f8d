//! tabsentry - command-line entry point

use clap::Parser;
use tabsentry::cli::{cmd_detect, cmd_info, Cli, Commands};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tabsentry=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Detect {
            data,
            feature,
            contamination,
            trees,
            seed,
            output,
            anomalies_only,
            json,
        } => {
            cmd_detect(
                &data,
                &feature,
                contamination,
                trees,
                seed,
                output.as_deref(),
                anomalies_only,
                json,
            )?;
        }
        Commands::Info { data } => {
            cmd_info(&data)?;
        }
    }

    Ok(())
}
