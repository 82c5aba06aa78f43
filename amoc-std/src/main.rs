//! amoc-std - Metadata standardisation driver
//!
//! Reads a dataset's metadata (JSON, as produced by a reader), applies the
//! array's YAML metadata and prints the standardised global attributes as
//! YAML.

use std::path::PathBuf;

use amoc_common::config::{default_config_path, MetadataDirResolver, TomlConfig};
use amoc_common::logging::init_logging;
use amoc_common::metadata::YamlMetadataStore;
use amoc_std::export::{export_attributes_to_yaml, DEFAULT_EXPORT_FILE};
use amoc_std::{Dataset, MetadataStandardizer, WritePolicy};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

/// Command-line arguments for amoc-std
#[derive(Parser, Debug)]
#[command(name = "amoc-std")]
#[command(about = "Standardise AMOC array dataset metadata")]
#[command(version)]
struct Args {
    /// Observing array name (e.g. rapid, move, osnap, samba)
    #[arg(short, long)]
    array: String,

    /// Dataset metadata as JSON (attrs, dims, variables)
    #[arg(short, long)]
    input: PathBuf,

    /// Source file name; defaults to the dataset's `source_file` attribute
    #[arg(short, long)]
    file_name: Option<String>,

    /// Directory holding <array>_array.yml files
    #[arg(short, long)]
    metadata_dir: Option<PathBuf>,

    /// Replace dataset attributes instead of only adding new ones
    #[arg(long)]
    replace: bool,

    /// Also write attributes.yaml into this directory
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Write a log file into this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Log level when RUST_LOG is unset
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = TomlConfig::load_or_default(default_config_path().as_deref());
    let mut logging = config.logging.clone();
    if let Some(dir) = &args.log_dir {
        logging.log_dir = Some(dir.clone());
    }
    if let Some(level) = &args.log_level {
        logging.level = level.clone();
    }
    init_logging(&args.array, &logging).context("Failed to initialise logging")?;

    info!("Starting amoc-std v{}", env!("CARGO_PKG_VERSION"));

    let metadata_dir = MetadataDirResolver::new()
        .with_cli_arg(args.metadata_dir.clone())
        .resolve();
    info!("Metadata directory: {}", metadata_dir.display());

    let content = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let mut dataset = Dataset::from_json_str(&content)
        .with_context(|| format!("Failed to parse dataset {}", args.input.display()))?;

    let file_name = match args.file_name.clone().or_else(|| dataset.source_file()) {
        Some(name) => name,
        None => anyhow::bail!("No --file-name given and dataset has no source_file attribute"),
    };

    let policy = if args.replace {
        WritePolicy::Replace
    } else {
        WritePolicy::PreserveExisting
    };
    let standardizer =
        MetadataStandardizer::new(YamlMetadataStore::new(metadata_dir)).with_write_policy(policy);
    standardizer
        .standardise(&mut dataset, &file_name, &args.array)
        .with_context(|| format!("Failed to standardise {} ({})", file_name, args.array))?;

    let export = export_attributes_to_yaml(&dataset, args.export_dir.as_deref(), DEFAULT_EXPORT_FILE)
        .context("Failed to export attributes")?;
    print!("{}", serde_yaml::to_string(&export.global_attributes)?);

    Ok(())
}
