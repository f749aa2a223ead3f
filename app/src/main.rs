#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

mod command;

use clap::{Parser, Subcommand};
use command::{
    CommandStrategy, InfoStrategy, InitStrategy, ShellStrategy, ToolInput, ToolStrategy,
    ToolsStrategy, VersionStrategy,
};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "shadow")]
#[command(about = "Learn and watch whale wallet behavior", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration
    Init,
    /// Show configuration
    Info,
    /// Show version
    Version,
    /// List available tools
    Tools,
    /// Learn behavioral patterns from a wallet's history
    Learn {
        /// Ethereum address (0x...)
        address: String,

        /// Number of transactions to analyze
        #[arg(short = 'l', long)]
        limit: Option<usize>,
    },
    /// Check recent activity against learned patterns
    Check {
        /// Ethereum address (0x...)
        address: String,
    },
    /// Show balance and recent activity
    Summary {
        /// Ethereum address (0x...)
        address: String,
    },
    /// Run tools interactively with a shared pattern store
    Shell,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is normal.
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => InitStrategy.execute(()).await,
        Commands::Info => InfoStrategy.execute(()).await,
        Commands::Version => VersionStrategy.execute(()).await,
        Commands::Tools => ToolsStrategy.execute(()).await,
        Commands::Learn { address, limit } => {
            ToolStrategy
                .execute(ToolInput::learn(address, limit))
                .await
        }
        Commands::Check { address } => ToolStrategy.execute(ToolInput::check(address)).await,
        Commands::Summary { address } => ToolStrategy.execute(ToolInput::summary(address)).await,
        Commands::Shell => ShellStrategy.execute(()).await,
    }
}
