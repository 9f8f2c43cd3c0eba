//! astdump — dump documented declarations from C headers and cursor dumps.
//!
//! Supports two modes:
//!
//! - **stdout mode**: `astdump Foo.h` prints one `<jazz>` document
//! - **file mode**: `astdump -o out include/*.h dumps/*.json` writes one document per input

use anyhow::{bail, Context, Result};
use astdump::render::{self, Renderer};
use astdump::{document_files, document_path, list_usrs};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(
    name = "astdump",
    about = "Dump documented declarations as XML for documentation generators"
)]
struct Cli {
    /// Input files: C headers/sources or JSON cursor dumps (glob patterns supported)
    #[arg(required = true)]
    files: Vec<String>,

    /// Arguments for the compiler front end, after `--`
    #[arg(last = true)]
    compiler_args: Vec<String>,

    /// Output directory (required when several files are given)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: xml (default), json
    #[arg(short = 'f', long, default_value = "xml")]
    format: String,

    /// Print each cursor's USR, one per line, instead of documents
    #[arg(long)]
    usrs: bool,

    /// Log debug detail to stderr
    #[arg(short = 'v', long, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short = 'q', long)]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let files = expand_globs(&cli.files)?;
    if files.is_empty() {
        bail!("no input files");
    }

    if cli.usrs {
        return usrs_mode(&files, &cli.compiler_args);
    }

    let renderer = render::create_renderer(&cli.format)?;
    match (cli.output.as_deref(), files.as_slice()) {
        (Some(dir), _) => file_mode(&files, dir, renderer.as_ref(), &cli.compiler_args),
        (None, [single]) => stdout_mode(single, renderer.as_ref(), &cli.compiler_args),
        (None, _) => bail!("--output is required when several files are given"),
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("ASTDUMP_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

/// stdout mode: document a single file and print it.
fn stdout_mode(path: &Path, renderer: &dyn Renderer, args: &[String]) -> Result<()> {
    let docs = document_path(path, args)
        .with_context(|| format!("failed to document {}", path.display()))?;
    print!("{}", renderer.render(&docs.tree));
    Ok(())
}

/// file mode: document every file in parallel, write `<stem>.<ext>` per input.
fn file_mode(files: &[PathBuf], output_dir: &Path, renderer: &dyn Renderer, args: &[String]) -> Result<()> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let ext = renderer.file_extension();
    let mut failed = 0;
    for (path, result) in files.iter().zip(document_files(files, args)) {
        let docs = match result {
            Ok(docs) => docs,
            Err(e) => {
                error!("{}", e);
                failed += 1;
                continue;
            }
        };

        let out_path = output_dir.join(format!("{}.{}", derive_output_name(path), ext));
        fs::write(&out_path, renderer.render(&docs.tree))
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        info!(source = %path.display(), output = %out_path.display(), "wrote");
    }

    if failed > 0 {
        bail!("{} of {} files failed to parse", failed, files.len());
    }
    Ok(())
}

/// usrs mode: print every cursor's USR, one per line.
fn usrs_mode(files: &[PathBuf], args: &[String]) -> Result<()> {
    let mut failed = 0;
    for path in files {
        match list_usrs(path, args) {
            Ok(usrs) => {
                for usr in usrs {
                    println!("{}", usr);
                }
            }
            Err(e) => {
                error!("{}", e);
                failed += 1;
            }
        }
    }
    if failed > 0 {
        bail!("{} of {} files failed to parse", failed, files.len());
    }
    Ok(())
}

/// File extensions recognized as inputs.
const SUPPORTED_EXTENSIONS: &[&str] = &["h", "c", "json"];

/// Expand glob patterns into a list of real file paths.
/// Also handles bare directory paths by scanning for supported file types.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        // Directories are scanned non-recursively
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() {
                    if let Some(ext) = p.extension().and_then(|e| e.to_str()) {
                        if SUPPORTED_EXTENSIONS.contains(&ext) {
                            files.push(p);
                        }
                    }
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            warn!("no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    // Sort for deterministic output
    files.sort();
    files.dedup();
    Ok(files)
}

/// Derive the output file name (without extension) from a source path.
/// "include/shapes.h" → "shapes", "dumps/Foo.json" → "Foo"
fn derive_output_name(source: &Path) -> String {
    source
        .file_stem()
        .or_else(|| source.file_name())
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string())
}
