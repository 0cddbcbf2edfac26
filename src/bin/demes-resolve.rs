//! Resolve a demes document and print its canonical form.
//!
//! Usage: `demes-resolve <FILE> [--compare OTHER] [--json]`
//!
//! With `--compare`, both files are resolved and checked for
//! equivalence instead. Set `RUST_LOG=debug` to follow resolution.

use clap::Parser;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use demes_resolver::{DemesError, Graph, Tolerance};

#[derive(Parser, Debug)]
#[command(name = "demes-resolve")]
#[command(about = "Resolve a demes model into its canonical, fully specified form")]
struct Args {
    /// Path to a demes YAML document
    file: PathBuf,

    /// Check that FILE and OTHER resolve to equivalent graphs
    #[arg(long = "compare", value_name = "OTHER")]
    compare: Option<PathBuf>,

    /// Relative tolerance used by --compare
    #[arg(long = "relative-tolerance", default_value_t = Tolerance::default().relative)]
    relative_tolerance: f64,

    /// Absolute tolerance used by --compare
    #[arg(long = "absolute-tolerance", default_value_t = Tolerance::default().absolute)]
    absolute_tolerance: f64,

    /// Write JSON instead of YAML
    #[cfg(feature = "json")]
    #[arg(long = "json")]
    json: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load(path: &Path) -> Result<Graph, DemesError> {
    debug!(path = %path.display(), "loading");
    let file = File::open(path)?;
    demes_resolver::load(BufReader::new(file))
}

fn run(args: &Args) -> Result<(), DemesError> {
    let graph = load(&args.file)?;
    match &args.compare {
        Some(other) => {
            let other_graph = load(other)?;
            let tolerance = Tolerance {
                relative: args.relative_tolerance,
                absolute: args.absolute_tolerance,
            };
            demes_resolver::equivalent(&graph, &other_graph, &tolerance)?;
            info!(
                left = %args.file.display(),
                right = %other.display(),
                "graphs are equivalent"
            );
        }
        None => {
            #[cfg(feature = "json")]
            let rendered = if args.json {
                graph.as_json_string()? + "\n"
            } else {
                graph.as_string()?
            };
            #[cfg(not(feature = "json"))]
            let rendered = graph.as_string()?;
            print!("{rendered}");
        }
    }
    Ok(())
}

fn main() {
    init_logging();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("{}: {}", args.file.display(), e);
        process::exit(1);
    }
}
