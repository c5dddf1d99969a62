use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "luminosity")]
#[command(about = "Extract stats, sidecars and previews from Lightroom catalogs", long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Gather and merge stats from one or more catalogs
    Stats(StatsArgs),
    /// Inspect or purge JPEG sidecar files
    #[command(subcommand)]
    Sidecars(SidecarCommands),
    /// Generate stats for rendering sunburst graphs
    Sunburst(SunburstArgs),
    /// Extract cached previews from a catalog
    Extract(ExtractArgs),
    /// Print configuration values
    PrintConfig,
}

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Path to output file
    #[arg(short, long = "outfile", default_value = "stats.json")]
    pub outfile: PathBuf,

    /// Also write stats for each individual catalog next to the output file
    #[arg(short = 'c', long)]
    pub per_catalog: bool,

    /// Format the JSON output indented for human readability
    #[arg(short, long)]
    pub pretty_print: bool,

    /// Catalog files or directories to search for catalogs
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum SidecarCommands {
    /// List sidecar stats
    Summary {
        #[arg(value_name = "CATALOG", required = true)]
        catalogs: Vec<PathBuf>,
    },
    /// List all sidecar file paths
    List {
        #[arg(value_name = "CATALOG", required = true)]
        catalogs: Vec<PathBuf>,
    },
    /// Delete all sidecar files
    Delete {
        /// Delete sidecar even if the original is missing
        #[arg(long)]
        delete_missing_originals: bool,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,

        #[arg(value_name = "CATALOG", required = true)]
        catalogs: Vec<PathBuf>,
    },
}

#[derive(Debug, Args)]
pub struct SunburstArgs {
    /// Path to output file
    #[arg(short, long = "outfile", default_value = "sunburst.json")]
    pub outfile: PathBuf,

    /// Format the JSON output indented for human readability
    #[arg(short, long)]
    pub pretty_print: bool,

    #[arg(value_name = "CATALOG")]
    pub catalog: PathBuf,
}

#[derive(Debug, Args)]
pub struct ExtractArgs {
    /// Directory to write extracted previews to [default: from configuration]
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    #[arg(value_name = "CATALOG")]
    pub catalog: PathBuf,
}
