//! myz CLI - single-file archiver
//!
//! Compresses one file into a `.myz` container and restores it again.

mod commands;

use clap::{Parser, Subcommand};
use commands::{cmd_compress, cmd_decompress, cmd_info, cmd_roundtrip, cmd_test};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "myz")]
#[command(author, version, about = "Single-file archiver with zlib compression")]
#[command(long_about = "
myz stores one file, its name and its size in a small .myz container
with a zlib-compressed payload.

Examples:
  myz compress report.pdf
  myz decompress report.pdf.myz -o restored.pdf
  myz info report.pdf.myz --json
  myz test report.pdf.myz
  myz roundtrip example.txt
")]
struct Cli {
    /// Log each step to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file into a container
    #[command(alias = "c")]
    Compress {
        /// File to compress
        file: PathBuf,

        /// Container to write (default: <FILE>.myz)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Restore the file held in a container
    #[command(alias = "x")]
    Decompress {
        /// Container to read
        archive: PathBuf,

        /// File to write (default: the stored name, next to the container)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite the output file if it exists
        #[arg(short, long)]
        force: bool,
    },

    /// Show the header of a container
    #[command(alias = "i")]
    Info {
        /// Container to inspect
        archive: PathBuf,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },

    /// Decode a container fully without writing anything
    #[command(alias = "t")]
    Test {
        /// Container to test
        archive: PathBuf,
    },

    /// Compress a file, then decompress it next to the original
    Roundtrip {
        /// File to round-trip
        file: PathBuf,

        /// Decompressed file (default: <stem>_decompressed.<ext>)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Compress { file, output } => cmd_compress(&file, output.as_deref()),
        Commands::Decompress {
            archive,
            output,
            force,
        } => cmd_decompress(&archive, output.as_deref(), force),
        Commands::Info { archive, json } => cmd_info(&archive, json),
        Commands::Test { archive } => cmd_test(&archive),
        Commands::Roundtrip { file, output } => cmd_roundtrip(&file, output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
