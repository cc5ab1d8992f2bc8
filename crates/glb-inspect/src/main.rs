//! glb-inspect - inspect binary glTF (GLB) files
//!
//! Prints container layout, accessor summaries, decoded accessor data and
//! texture coordinate coverage.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use glb_inspect::{commands, load};
use glb_io::DecodeOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "glb-inspect")]
#[command(about = "Inspect binary glTF (GLB) files")]
#[command(version)]
struct Cli {
    /// Verbose logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show header, chunk sizes and document counts
    Info {
        /// Input .glb file
        input: PathBuf,
    },

    /// List accessors with their value ranges
    Accessors {
        /// Input .glb file
        input: PathBuf,

        #[command(flatten)]
        decode: DecodeArgs,
    },

    /// Print the decoded elements of one accessor
    Dump {
        /// Input .glb file
        input: PathBuf,

        /// Accessor index
        accessor: usize,

        /// Print at most this many elements
        #[arg(short, long)]
        limit: Option<usize>,

        #[command(flatten)]
        decode: DecodeArgs,
    },

    /// Report geometry and TEXCOORD_0 coverage per mesh primitive
    Uv {
        /// Input .glb file
        input: PathBuf,

        #[command(flatten)]
        decode: DecodeArgs,
    },
}

#[derive(Args)]
struct DecodeArgs {
    /// Decode unknown component types as zeros instead of failing
    #[arg(long)]
    lenient: bool,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

impl DecodeArgs {
    fn options(&self) -> DecodeOptions {
        let options = DecodeOptions::new();
        if self.lenient {
            options.lenient()
        } else {
            options
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Info { input } => {
            let container = load(&input)?;
            let file_length = std::fs::metadata(&input)?.len() as usize;
            commands::info(&container, file_length, &mut out)?;
        }
        Commands::Accessors { input, decode } => {
            let container = load(&input)?;
            commands::accessors(&container, &decode.options(), decode.json, &mut out)?;
        }
        Commands::Dump {
            input,
            accessor,
            limit,
            decode,
        } => {
            let container = load(&input)?;
            commands::dump(&container, accessor, &decode.options(), decode.json, limit, &mut out)?;
        }
        Commands::Uv { input, decode } => {
            let container = load(&input)?;
            commands::uv(&container, &decode.options(), decode.json, &mut out)?;
        }
    }

    out.flush()?;
    Ok(())
}
