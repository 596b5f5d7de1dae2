//! `tabpack`: convert JSON to tabpack binary and back.
//!
//! Usage:
//!   tabpack pack   [--capacity N] [--grow] [--max-depth N]  < in.json > out.bin
//!   tabpack unpack [--max-depth N] [--compact]              < in.bin  > out.json

use std::io::{self, Read, Write};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use clap_verbosity_flag::WarnLevel;
use tabpack::host::{self, PackOptions};
use tabpack::{DecoderOptions, EncoderOptions, DEFAULT_CAPACITY};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    verbosity: clap_verbosity_flag::Verbosity<WarnLevel>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a JSON document from stdin to binary on stdout
    Pack {
        /// Size of the output region in bytes
        #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_CAPACITY)]
        capacity: usize,
        /// Retry once at the exact size when the output region is too small
        #[arg(long, action = ArgAction::SetTrue)]
        grow: bool,
        /// Reject tables nested deeper than this
        #[arg(long, value_name = "N")]
        max_depth: Option<usize>,
    },
    /// Decode binary from stdin to JSON on stdout
    Unpack {
        /// Reject tables nested deeper than this
        #[arg(long, value_name = "N")]
        max_depth: Option<usize>,
        /// Print JSON on a single line
        #[arg(long, action = ArgAction::SetTrue)]
        compact: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity)
        .with_writer(io::stderr)
        .init();

    match cli.cmd {
        Commands::Pack {
            capacity,
            grow,
            max_depth,
        } => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("reading JSON from stdin")?;
            let options = PackOptions {
                capacity,
                grow,
                encoder: EncoderOptions { max_depth },
            };
            let bytes = host::pack(input.trim(), &options)?;
            tracing::info!(bytes = bytes.len(), "encoded");
            io::stdout().write_all(&bytes).context("writing to stdout")?;
        }
        Commands::Unpack { max_depth, compact } => {
            let mut input = Vec::new();
            io::stdin()
                .read_to_end(&mut input)
                .context("reading binary from stdin")?;
            let options = DecoderOptions { max_depth };
            let json = if compact {
                host::unpack_json(&input, &options)?.to_string()
            } else {
                host::unpack(&input, &options)?
            };
            let mut out = io::stdout();
            out.write_all(json.as_bytes()).context("writing to stdout")?;
            out.write_all(b"\n").context("writing to stdout")?;
        }
    }
    Ok(())
}
