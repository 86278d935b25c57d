use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use palettize::error::BatchError;
use palettize::models::{AppConfig, BatchReport};
use palettize::services::{BatchEvent, BatchRunner, Compressor};

#[derive(Parser)]
#[command(name = "palettize")]
#[command(about = "Shrink images by re-encoding them as k-means palette PNGs")]
struct Cli {
    /// Config file (falls back to the CONFIG_FILE environment variable)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress every image in SOURCE_DIR into DEST_DIR
    Compress {
        source_dir: PathBuf,

        dest_dir: PathBuf,

        /// Number of palette colors (2-256)
        #[arg(short, long)]
        quant: Option<u32>,

        /// Clustering seed
        #[arg(long)]
        seed: Option<u64>,

        /// Skip the oxipng pass
        #[arg(long)]
        no_optimize: bool,

        /// Print results as JSON instead of report lines
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration as YAML
    InspectConfig,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "palettize=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    let config_path = cli
        .config
        .or_else(|| std::env::var("CONFIG_FILE").ok().map(PathBuf::from));
    let mut config = AppConfig::load_optional(config_path.as_deref())?;

    match cli.command {
        Commands::Compress {
            source_dir,
            dest_dir,
            quant,
            seed,
            no_optimize,
            json,
        } => {
            if let Some(quant) = quant {
                config.quantization_level = quant;
            }
            if let Some(seed) = seed {
                config.seed = seed;
            }
            if no_optimize {
                config.optimize = false;
            }
            run_compress(&config, &source_dir, &dest_dir, json)
        }
        Commands::InspectConfig => {
            print!("{}", config.to_yaml()?);
            Ok(())
        }
    }
}

fn run_compress(
    config: &AppConfig,
    source_dir: &Path,
    dest_dir: &Path,
    json: bool,
) -> anyhow::Result<()> {
    let runner = BatchRunner::new(Compressor::new(config));

    let outcome = runner.run_with(source_dir, dest_dir, |event| {
        if json {
            return;
        }
        match event {
            BatchEvent::Compressed(result) => println!("{result}"),
            BatchEvent::Skipped(skipped) => println!("{skipped}"),
        }
    });

    match outcome {
        Ok(report) => print_summary(&report, json),
        Err(BatchError::Aborted { source, report }) => {
            print_summary(&report, json)?;
            Err(source).context("Batch aborted")
        }
        Err(e) => Err(e.into()),
    }
}

fn print_summary(report: &BatchReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        if report.cancelled {
            println!("Cancelled");
        }
        println!("{}", report.totals);
    }
    Ok(())
}
