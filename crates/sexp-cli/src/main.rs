//! `sexp-tool` CLI — migrate and reformat SuperTux data files.
//!
//! ## Usage
//!
//! ```sh
//! # Migrate sprites and levels, printing each result to stdout
//! sexp-tool refactor images/creatures/tux/tux.sprite levels/world1/intro.stl
//!
//! # Migrate in place (each file is rewritten only after a full render)
//! sexp-tool refactor --in-place levels/world1/*.stl
//!
//! # Canonical re-layout without migrating, 4-space indent
//! sexp-tool format --indent 4 levels/test/tiles.stl
//!
//! # Inspect the parsed tree as JSON
//! sexp-tool dump images/objects/bell/bell.sprite
//! ```
//!
//! Files are processed in the order given. A file that fails is reported on
//! stderr and the rest of the batch still runs; the exit status is non-zero
//! if any file failed. Files that already carry the target schema version
//! are skipped with a warning.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use sexp_core::{DocumentKind, SexpError};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "sexp-tool",
    version,
    about = "SuperTux data tool: schema migration and canonical formatting"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log debug output to stderr (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Migrate .sprite files to schema v2 and .stl/.stlv files to schema v4
    Refactor(BatchArgs),
    /// Re-print files in canonical layout without migrating
    Format(BatchArgs),
    /// Print the parsed tree of a file as JSON
    Dump {
        /// File to read
        file: PathBuf,
    },
}

#[derive(Args)]
struct BatchArgs {
    /// Files to process, in order
    #[arg(required = true)]
    files: Vec<PathBuf>,
    /// Modify files in place instead of printing to stdout
    #[arg(long)]
    in_place: bool,
    /// Spaces per nesting level
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u16).range(1..))]
    indent: u16,
}

#[derive(Debug, Clone, Copy)]
enum Mode {
    Refactor,
    Format,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Refactor(args) => run_batch(&args, Mode::Refactor),
        Commands::Format(args) => run_batch(&args, Mode::Format),
        Commands::Dump { file } => {
            let text = read_input(&file)?;
            let doc = sexp_core::parse_document(&text)
                .with_context(|| format!("Failed to parse {}", file.display()))?;
            let json = serde_json::to_string_pretty(&doc)?;
            println!("{}", json);
            Ok(())
        }
    }
}

/// Logs go to stderr so stdout only ever carries document text.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run_batch(args: &BatchArgs, mode: Mode) -> Result<()> {
    let mut failed = 0usize;

    for path in &args.files {
        match process_file(path, args, mode) {
            Ok(()) => debug!(path = %path.display(), ?mode, "done"),
            Err(err) if is_already_migrated(&err) => {
                warn!("{}: skipped, {:#}", path.display(), err);
            }
            Err(err) => {
                error!("{}: {:#}", path.display(), err);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} file(s) failed", failed, args.files.len());
    }
    Ok(())
}

fn is_already_migrated(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<SexpError>(),
        Some(SexpError::AlreadyMigrated { .. })
    )
}

/// Render one file completely, then emit it. Nothing touches the file system
/// until rendering has succeeded.
fn process_file(path: &Path, args: &BatchArgs, mode: Mode) -> Result<()> {
    let indent = usize::from(args.indent);
    let rendered = match mode {
        Mode::Refactor => {
            let kind = DocumentKind::from_path(path)?;
            let text = read_input(path)?;
            sexp_core::refactor_text(kind, &text, indent).context("Failed to migrate")?
        }
        Mode::Format => {
            let text = read_input(path)?;
            sexp_core::format_text(&text, indent).context("Failed to format")?
        }
    };
    write_output(path, &rendered, args.in_place)
}

fn read_input(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))
}

fn write_output(path: &Path, content: &str, in_place: bool) -> Result<()> {
    if in_place {
        println!("{}: modifying in place", path.display());
        replace_file(path, content)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        info!(path = %path.display(), bytes = content.len(), "rewrote file");
    } else {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, ";; {}", path.display())?;
        stdout.write_all(content.as_bytes())?;
    }
    Ok(())
}

/// Write `content` to a temporary file beside `path`, then rename it over
/// `path`, so the original is never left truncated.
fn replace_file(path: &Path, content: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;
    Ok(())
}
