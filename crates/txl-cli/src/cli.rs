use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "txl",
    about = "TXL — union-wrapped transaction intake and inspection",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the webhook server
    Serve(ServeArgs),
    /// Extract fields from a single payload
    Extract(ExtractArgs),
    /// Feed a file of payloads (one per line) through a ledger
    Replay(ReplayArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Overrides the configured bind address
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

#[derive(Args)]
pub struct ExtractArgs {
    /// Payload file; reads stdin when omitted
    pub file: Option<PathBuf>,
    /// Field names that must be present
    #[arg(short = 'e', long = "expect")]
    pub expect: Vec<String>,
}

#[derive(Args)]
pub struct ReplayArgs {
    pub file: PathBuf,
    #[arg(long, default_value_t = txl_ledger::DEFAULT_CAPACITY)]
    pub capacity: usize,
    #[arg(short = 'e', long = "expect")]
    pub expect: Vec<String>,
}
