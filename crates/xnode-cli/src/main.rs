/// xnode command-line tool: load, replay, and stream markup node
/// manifests through the xnode buffers.
///
/// # Command overview
///
/// ```text
/// xnode <COMMAND> [OPTIONS]
///
/// Commands:
///   inspect    Print every node of a manifest, read back through a buffer
///   stats      Print node-kind counts and nesting statistics
///   pump       Stream synthetic nodes through a background reader
///   help       Print help information
///
/// Global options:
///   -v, --verbose    Log at debug level (RUST_LOG overrides when unset)
///   -h, --help       Print help
///   -V, --version    Print version
/// ```
///
/// # Exit codes
///
/// | Code | Meaning                                      |
/// |------|----------------------------------------------|
/// | 0    | Success                                      |
/// | 1    | Error (I/O failure, invalid manifest, etc.)  |
///
/// All error details and log output are written to stderr so stdout can
/// be piped cleanly.
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod cmd_inspect;
mod cmd_pump;
mod cmd_stats;
mod manifest;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// The xnode command-line tool.
#[derive(Parser)]
#[command(name = "xnode", version, about = "Markup node stream CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Print every node of a manifest, read back through a buffer.
    Inspect(InspectArgs),
    /// Print node-kind counts and nesting statistics.
    Stats(StatsArgs),
    /// Stream synthetic nodes through a background reader and time it.
    Pump(PumpArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Which buffer `inspect` routes the manifest through.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Via {
    /// Record into a `NodeList` and replay it with an indexed reader.
    List,
    /// Enqueue into a `NodeQueue` and drain it.
    Queue,
    /// Stream through a `BackgroundReader` worker thread.
    Background,
}

/// Arguments for `xnode inspect`.
///
/// ```text
/// ┌──────────────┬───────────────────────────────────────────────────────┐
/// │ Flag         │ Effect                                                │
/// ├──────────────┼───────────────────────────────────────────────────────┤
/// │ --via        │ list (default) | queue | background                   │
/// │ --capacity N │ buffer size for --via background (default 64)         │
/// │ --line-info  │ keep line_info entries and print positions            │
/// └──────────────┴───────────────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct InspectArgs {
    /// Path to the JSON node manifest.
    pub file: PathBuf,

    /// Buffer to read the nodes back through.
    #[arg(long, value_enum, default_value = "list")]
    pub via: Via,

    /// Nodes per buffer when reading through the background reader.
    #[arg(long, default_value_t = xnode_buffer::config::DEFAULT_CAPACITY)]
    pub capacity: usize,

    /// Keep line info entries and print the position of every node.
    #[arg(long)]
    pub line_info: bool,
}

/// Arguments for `xnode stats`.
#[derive(clap::Args)]
pub struct StatsArgs {
    /// Path to the JSON node manifest.
    pub file: PathBuf,
}

/// Arguments for `xnode pump`.
///
/// Generates `count` value nodes on a worker thread and drains them on the
/// main thread, reporting throughput. Useful for comparing capacities.
#[derive(clap::Args)]
pub struct PumpArgs {
    /// Number of nodes to generate.
    #[arg(long, default_value_t = 1_000_000)]
    pub count: u64,

    /// Nodes per buffer.
    #[arg(long, default_value_t = xnode_buffer::config::DEFAULT_CAPACITY)]
    pub capacity: usize,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_thread_names(true)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Inspect(args) => cmd_inspect::run(&args),
        Commands::Stats(args) => cmd_stats::run(&args),
        Commands::Pump(args) => cmd_pump::run(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
