//! Command line argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "procsync")]
#[command(about = "Configure remote video processors and keep a local record of accepted settings")]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Decrease logging verbosity (only errors)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Configuration file (default: <config dir>/procsync/procsync.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Storage file holding the last accepted processor settings
    #[arg(long, global = true)]
    pub storage: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Show the known processors (default)
    List,
    /// Edit a processor and push the new configuration to it
    Edit {
        /// Position of the processor in the list
        #[arg(short, long, default_value = "0")]
        index: usize,
        /// New host (keeps the current one if omitted)
        #[arg(long)]
        host: Option<String>,
        /// New port (keeps the current one if omitted)
        #[arg(long)]
        port: Option<String>,
        /// New video path on the processor (keeps the current one if omitted)
        #[arg(long)]
        video_path: Option<String>,
        /// Also store the accepted settings locally
        #[arg(long)]
        persist: bool,
    },
    /// Ask a processor for its version and device
    Info {
        /// Position of the processor in the list
        #[arg(short, long, default_value = "0")]
        index: usize,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
