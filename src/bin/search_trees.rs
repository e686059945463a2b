//! search-trees - Run a command script against a balanced search tree
//!
//! Usage:
//!   search-trees <rb|23> <input> [output]
//!
//! Results go to `output` when given, otherwise to stdout. Rejected lines are
//! reported on stderr; set `RUST_LOG=search_trees=debug` to also watch the
//! tree grow and shrink.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use search_trees::{TreeKind, command};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "search-trees")]
#[command(about = "Run a command script against a red-black or 2-3 tree")]
struct Cli {
    /// Tree variant: `rb` (red-black) or `23` (2-3)
    kind: TreeKind,

    /// Script with one command per line
    input: PathBuf,

    /// Where to write results (defaults to stdout)
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "search_trees=warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let script = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read script '{}'", cli.input.display()))?;

    let mut tree = cli.kind.build::<i32, i32>();
    let mut results = String::new();
    let diagnostics = command::run_script(&mut *tree, &script, &mut results).context("failed to format results")?;

    tracing::info!(
        kind = %cli.kind,
        entries = tree.len(),
        rejected = diagnostics.len(),
        "script finished"
    );

    match &cli.output {
        Some(path) => fs::write(path, results).with_context(|| format!("failed to write '{}'", path.display()))?,
        None => io::stdout().lock().write_all(results.as_bytes()).context("failed to write to stdout")?,
    }

    Ok(())
}
