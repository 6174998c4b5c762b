use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Score registry datasets against the FAIR principles
#[derive(Debug, Parser)]
#[command(name = "fair-score")]
#[command(version)]
#[command(about = "Compute and plot FAIR scores for registry datasets", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Also write a per-run log file into this directory
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch a dataset's metadata and compute its FAIR scores
    Score(ScoreArgs),

    /// Render a heatmap from four scores given in F A I R order
    Plot(PlotArgs),
}

#[derive(Debug, Args)]
pub struct ScoreArgs {
    /// Registry identifier, e.g. HBM666.NDQZ.365
    pub identifier: String,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Heatmap path (default: FAIR_<id>_<timestamp>.png)
    #[arg(long, conflicts_with = "no_plot")]
    pub plot: Option<PathBuf>,

    /// Skip rendering the heatmap
    #[arg(long)]
    pub no_plot: bool,

    /// Heatmap size in percent of the 500x400 base
    #[arg(long, default_value_t = 100)]
    pub scale: u32,

    /// Fixed number of reliability fetches instead of a random 3..=10
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub trials: Option<u16>,

    /// Registry endpoint (overrides FAIR_REGISTRY_URL)
    #[arg(long)]
    pub registry_url: Option<String>,

    /// Registry request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Link check timeout in seconds
    #[arg(long)]
    pub probe_timeout: Option<u64>,

    /// Directory for cached metadata records (overrides FAIR_CACHE_DIR)
    #[arg(long, conflicts_with = "no_cache")]
    pub cache_dir: Option<PathBuf>,

    /// Do not write fetched records to disk
    #[arg(long)]
    pub no_cache: bool,
}

#[derive(Debug, Args)]
pub struct PlotArgs {
    /// Findable, Accessible, Interoperable and Reproducible scores
    #[arg(num_args = 4, required = true, allow_negative_numbers = true)]
    pub values: Vec<f64>,

    /// Image path (default: output-<date>.png)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Heatmap size in percent of the 500x400 base
    #[arg(long, default_value_t = 100)]
    pub scale: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
