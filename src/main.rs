use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use huffman_text::{decode_file, encode_file, BitLayout, HuffmanCodec, OutputPaths};

#[derive(Parser)]
#[command(name = "huffman-text", about = "Huffman text compressor", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging (RUST_LOG overrides the level)
    #[arg(long, short = 'v', global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all logging
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the '0'/'1' text encoding and the packed encoding of a file
    Encode {
        input: PathBuf,

        /// Text encoding output; the packed file goes next to it as <stem>_compressed.txt
        #[arg(short, long, default_value = "out.txt")]
        output: PathBuf,

        /// Packed output path, overriding the derived name
        #[arg(long)]
        compressed: Option<PathBuf>,
    },

    /// Restore the original text from an encoded file
    Decode {
        input: PathBuf,

        #[arg(short, long, default_value = "out.txt")]
        output: PathBuf,

        /// Input is the '0'/'1' text encoding rather than the packed one
        #[arg(long)]
        ascii: bool,
    },

    /// Print each symbol's frequency and code
    Codes { input: PathBuf },

    /// Print the Huffman tree built for a file
    Tree { input: PathBuf },
}

fn init_tracing(cli: &Cli) {
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into())
    } else {
        tracing_subscriber::EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> huffman_text::Result<()> {
    match cli.command {
        Commands::Encode {
            input,
            output,
            compressed,
        } => {
            let mut paths = OutputPaths::for_output(output);
            if let Some(compressed) = compressed {
                paths = paths.with_compressed(compressed);
            }
            let encoded = encode_file(&input, &paths)?;
            println!(
                "{} -> {} ({} bits), {}",
                input.display(),
                paths.compressed.display(),
                encoded.bit_count,
                paths.uncompressed.display()
            );
        }

        Commands::Decode {
            input,
            output,
            ascii,
        } => {
            let layout = if ascii {
                BitLayout::Ascii
            } else {
                BitLayout::Packed
            };
            let bytes = decode_file(&input, &output, layout)?;
            println!("{} -> {} ({} bytes)", input.display(), output.display(), bytes);
        }

        Commands::Codes { input } => {
            let codec = HuffmanCodec::from_file(&input)?;
            for (symbol, count) in codec.frequencies().present() {
                println!(
                    "{:>3} {:>8?} {:>8} {}",
                    symbol,
                    symbol as char,
                    count,
                    codec.code_table().get(symbol)
                );
            }
        }

        Commands::Tree { input } => {
            print!("{}", HuffmanCodec::from_file(&input)?.tree());
        }
    }
    Ok(())
}
