//! demcut - trim Source engine demos to a tick range
//!
//! Writes a standalone demo that plays only the selected ticks, or prints a
//! summary of a demo's contents.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use demcut::CutOptions;
use tracing::info;

mod naming;

#[derive(Parser)]
#[command(name = "demcut")]
#[command(about = "Cut Source engine demos down to a tick range")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cut a demo to a tick range
    Cut {
        /// Source demo
        path: PathBuf,

        /// First tick to keep (default: read from a `_<start>-<end>` file name)
        #[arg(allow_negative_numbers = true)]
        start: Option<i64>,

        /// Last tick to keep (default: end of the recording)
        #[arg(allow_negative_numbers = true)]
        end: Option<i64>,

        /// Output file (default: next to the source)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Renumber ticks so the cut starts at tick 0
        #[arg(long)]
        rebase: bool,

        /// Drop console commands from the cut
        #[arg(long)]
        strip_console: bool,
    },

    /// Print header and frame statistics
    Info {
        /// Demo to inspect
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Cut {
            path,
            start,
            end,
            output,
            rebase,
            strip_console,
        } => {
            let options = CutOptions {
                rebase_ticks: rebase,
                strip_console_commands: strip_console,
            };
            run_cut(&path, start, end, output, &options)
        }
        Commands::Info { path } => run_info(&path),
    }
}

fn read_demo(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read demo: {}", path.display()))
}

fn run_cut(
    path: &Path,
    start: Option<i64>,
    end: Option<i64>,
    output: Option<PathBuf>,
    options: &CutOptions,
) -> Result<()> {
    let (start, end, output) = naming::resolve(path, start, end, output)?;
    let input = read_demo(path)?;

    let cut = demcut::cut_with(&input, start, end, options)
        .with_context(|| format!("Failed to cut {}", path.display()))?;
    fs::write(&output, &cut)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(
        input = %path.display(),
        output = %output.display(),
        start,
        end,
        bytes = cut.len(),
        "wrote cut"
    );
    Ok(())
}

fn run_info(path: &Path) -> Result<()> {
    let input = read_demo(path)?;
    let summary = demcut::inspect(&input)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    println!("{}", path.display());
    print!("{summary}");
    Ok(())
}
