use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "acensus",
    about = "Element-pair census of GNN attention over molecular structures",
    version,
    author,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Aggregate a batch stream (JSON Lines) into a snapshot
    #[command(visible_alias = "x")]
    Extract(ExtractArgs),

    /// Print the matrices and atom counts stored in a snapshot
    #[command(visible_alias = "s")]
    Show(ShowArgs),

    /// Smooth attention by distance for one element pair
    #[command(visible_alias = "c")]
    Curve(CurveArgs),
}

impl Command {
    pub fn quiet(&self) -> bool {
        match self {
            Command::Extract(args) => args.common.quiet,
            Command::Show(args) => args.common.quiet,
            Command::Curve(args) => args.common.quiet,
        }
    }
}

/// Options shared by all commands.
#[derive(Args)]
pub struct CommonOptions {
    /// Analysis settings file (TOML)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Suppress progress output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Args)]
pub struct ExtractArgs {
    /// Batch stream, one JSON batch per line (stdin if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Snapshot output file
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    #[command(flatten)]
    pub common: CommonOptions,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Snapshot written by `extract`
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Normalize attention rows to sum to one
    #[arg(long)]
    pub normalize_attention: bool,

    /// Also write both matrices as CSV into this directory
    #[arg(long, value_name = "DIR")]
    pub matrix_csv: Option<PathBuf>,

    #[command(flatten)]
    pub common: CommonOptions,
}

#[derive(Args)]
#[command(next_help_heading = "Curve Options")]
pub struct CurveArgs {
    /// Snapshot written by `extract`
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Curve output (CSV; stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Element pair, either orientation (e.g. H-C)
    #[arg(long, value_name = "PAIR")]
    pub pair: Option<String>,

    /// Moving-average window in samples
    #[arg(long, value_name = "N")]
    pub window: Option<usize>,

    /// Histogram bins for the distance summary
    #[arg(long, value_name = "N")]
    pub bins: Option<usize>,

    #[command(flatten)]
    pub common: CommonOptions,
}

pub fn parse() -> Cli {
    Cli::parse()
}
