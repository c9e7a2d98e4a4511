use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "The espsurf developers",
    version,
    about = "espsurf - Builds smoothed van der Waals iso-surfaces around molecules for electrostatic potential sampling.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads for parallel computation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a triangulated surface from an XYZR atom file and write it as JSON.
    Build(BuildArgs),
    /// Print the lattice a build would use, without rasterizing it.
    Grid(GridArgs),
}

/// Input and surface parameters shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct SurfaceArgs {
    /// Path to the input atom file (one `x y z radius` record per line).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Grid Overrides ---
    /// Override the lattice spacing.
    #[arg(long, value_name = "FLOAT")]
    pub spacing: Option<f64>,

    /// Override the radius multiplier used to size the lattice (default: 2 x radius-scale).
    #[arg(long, value_name = "FLOAT")]
    pub margin_scale: Option<f64>,

    // --- Shell Overrides ---
    /// Override the radius multiplier of the occupied shell around each atom.
    #[arg(short = 'r', long, value_name = "FLOAT")]
    pub radius_scale: Option<f64>,

    // --- Smoothing Overrides ---
    /// Override the number of Laplacian smoothing iterations.
    #[arg(long, value_name = "INT", conflicts_with = "no_smoothing")]
    pub smoothing_iterations: Option<usize>,

    /// Override the Laplacian smoothing factor, between 0 and 1.
    #[arg(long, value_name = "FLOAT")]
    pub smoothing_factor: Option<f64>,

    /// Disable smoothing, overriding the config file.
    #[arg(long)]
    pub no_smoothing: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S smoothing.iterations=5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `build` subcommand.
#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub surface: SurfaceArgs,

    /// Path for the output surface file (JSON).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    /// Abort before rasterizing if the lattice would exceed this many points.
    #[arg(long, value_name = "INT")]
    pub max_grid_points: Option<usize>,

    /// Pretty-print the output JSON.
    #[arg(long)]
    pub pretty: bool,
}

/// Arguments for the `grid` subcommand.
#[derive(Args, Debug)]
pub struct GridArgs {
    #[command(flatten)]
    pub surface: SurfaceArgs,
}
