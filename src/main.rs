mod cli;

use anyhow::Result;
use clap::Parser;
use cli::GenerateArgs;
use tracing_subscriber::EnvFilter;

/// Print an SSH client config for the EC2 instances matching a tag
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    generate: GenerateArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    cli.generate.main().await
}

// stdout carries the generated config, so logs go to stderr.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
