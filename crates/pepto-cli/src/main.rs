//! CLI for pepto — tabulate pappy observations by material and anneal state.

mod commands;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "pepto")]
#[command(about = "pepto — aggregate pappy results by material and anneal state")]
#[command(version = pepto_core::VERSION)]
struct Cli {
    #[command(flatten)]
    run: RunArgs,

    /// Debug logging (RUST_LOG still takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand.
#[derive(Args)]
struct RunArgs {
    /// Directory searched recursively for *_pappy.csv files
    #[arg(long, global = true)]
    root: Option<String>,

    /// Comma-separated materials in scope, in column order
    #[arg(long, global = true)]
    materials: Option<String>,

    /// JSON run config (materials, root, follow_links)
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List discovered pappy files and how each one decodes
    Scan,

    /// Ingest and print the material × anneal grid for one quantity
    Summary {
        /// Quantity to tabulate, e.g. "S Parameter" or "N Samples"
        #[arg(long, default_value = "S Parameter")]
        quantity: String,
    },

    /// Write the grouped CSV (and optionally the per-sample CSV)
    Export {
        /// Date stamp for file names, MM_DD_YYYY (default: today, UTC)
        #[arg(long)]
        date: Option<String>,

        /// Output directory
        #[arg(long, default_value = ".")]
        out: String,

        /// Also write one row per sample with its composite W width
        #[arg(long)]
        samples: bool,
    },

    /// Fit S against composite W for every material
    Trend {
        /// Write the full JSON report to this path
        #[arg(long)]
        output: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    let run = commands::RunOptions {
        root: cli.run.root.as_deref(),
        materials: cli.run.materials.as_deref(),
        config: cli.run.config.as_deref(),
    };

    match cli.command {
        Commands::Scan => commands::scan::run(&run),
        Commands::Summary { quantity } => commands::summary::run(&run, &quantity),
        Commands::Export { date, out, samples } => {
            commands::export::run(&run, date.as_deref(), &out, samples)
        }
        Commands::Trend { output } => commands::trend::run(&run, output.as_deref()),
    }
}
