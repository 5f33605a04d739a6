use clap::Parser;
use tracing_subscriber::EnvFilter;

mod catalog;
mod cli;
mod core;
mod matching;
mod utils;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("allele_matcher=debug,info")
    } else {
        EnvFilter::new("allele_matcher=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Call(args) => {
            cli::call::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Definitions(args) => {
            cli::definitions::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
