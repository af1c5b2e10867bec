use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::debug;
use rhuff::{compress, decompress, verify, Config, HuffmanCodec};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file with codec settings
    #[arg(short, long, env = "RHUFF_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compress a file into an artifact plus a `.freq` sidecar
    Compress {
        /// Path of the input file
        #[arg(short, long)]
        input: PathBuf,

        /// Path of the output file
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Restore a file from an artifact and its sidecar
    Decompress {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(short, long)]
        output: PathBuf,
    },
    /// Round-trip a file in memory and compare
    Verify {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Print the code table built for a file
    Codes {
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::new(path)?,
        None => Config::default(),
    };
    debug!("using {:?}", config);

    match args.command {
        Commands::Compress { input, output } => {
            let report = compress(&input, &output, &config)
                .with_context(|| format!("compressing {}", input.display()))?;
            println!("{}", report);
        }
        Commands::Decompress { input, output } => {
            let written = decompress(&input, &output)
                .with_context(|| format!("decompressing {}", input.display()))?;
            println!("{} bytes written to {}", written, output.display());
        }
        Commands::Verify { input } => {
            let report = verify(&input, &config)
                .with_context(|| format!("verifying {}", input.display()))?;
            println!("The files are identical.");
            println!("{}", report);
        }
        Commands::Codes { input } => {
            let data =
                fs::read(&input).with_context(|| format!("reading {}", input.display()))?;
            let table = HuffmanCodec::new(config).build_code(&data)?;
            print!("{}", table);
        }
    }

    Ok(())
}
