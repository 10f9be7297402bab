//! Uploader CLI — upload files and reprocess stored originals.
//!
//! Configuration comes from the environment (UPLOADER_* variables, see
//! uploader-core). Paths are resolved relative to `--root`.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::str::FromStr;

use uploader_cli::init_tracing;
use uploader_core::{FileCategory, UploaderConfig};
use uploader_processing::{LocalUpload, ReprocessSweep, SweepOutcome, UploadPipeline};

#[derive(Parser)]
#[command(name = "uploader", about = "Validate uploads and regenerate image variants")]
struct Cli {
    /// Filesystem root the configured directories live under
    #[arg(long, global = true, default_value = ".")]
    root: std::path::PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create optimized and thumbnail images from originals
    Reprocess {
        /// Directories to process (comma separated)
        types: String,
        /// Reprocess existing images
        #[arg(long)]
        overwrite: bool,
    },
    /// Upload a local file (image, document, video, or audio)
    Upload {
        /// Path to the file to upload
        file: std::path::PathBuf,
        /// Destination path under the configured base directory
        #[arg(long)]
        path: String,
        /// Upload kind: image, document, video, or audio
        #[arg(long, default_value = "image")]
        kind: String,
        /// Stored base name; defaults to the sanitized original filename
        #[arg(long)]
        name: Option<String>,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize result")?;
    println!("{}", out);
    Ok(())
}

fn print_results_table(results: &[(String, SweepOutcome)]) {
    let type_width = results
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0)
        .max("Type".len());

    println!(
        "{:<width$}  {:>9}  {:>10}",
        "Type",
        "Optimized",
        "Thumbnails",
        width = type_width
    );
    for (name, outcome) in results {
        println!(
            "{:<width$}  {:>9}  {:>10}",
            name,
            outcome.optimized,
            outcome.thumbnails,
            width = type_width
        );
    }

    for (name, outcome) in results {
        for failure in &outcome.failures {
            eprintln!("{}: failed to process {}: {}", name, failure.file, failure.error);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = UploaderConfig::from_env().context("Failed to load uploader configuration")?;

    match cli.command {
        Commands::Reprocess { types, overwrite } => {
            let types: Vec<&str> = types
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect();

            if types.is_empty() {
                println!("Nothing processed.");
                return Ok(());
            }

            let sweep = ReprocessSweep::new(&cli.root, &config);
            let mut results = Vec::new();
            for name in types {
                let outcome = sweep
                    .run(name, overwrite)
                    .await
                    .with_context(|| format!("Reprocessing '{}' failed", name))?;
                results.push((name.to_string(), outcome));
            }
            print_results_table(&results);
        }
        Commands::Upload {
            file,
            path,
            kind,
            name,
        } => {
            let category = FileCategory::from_str(&kind).map_err(anyhow::Error::msg)?;
            let upload = LocalUpload::from_path(&file)
                .await
                .with_context(|| format!("Cannot read {}", file.display()))?;

            let pipeline = UploadPipeline::new(&cli.root, &config);
            let result = pipeline
                .upload(&upload, &path, name.as_deref(), category)
                .await?;
            print_json(&result)?;
        }
    }

    Ok(())
}
