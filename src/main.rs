use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use btopcall::io::{read_manifest, read_variant_table, write_report};
use btopcall::{tokenize, CallerConfig, MagicBlastSource, ReferenceAlignment, VariantCaller};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "btopcall",
    version,
    about = "Genotype candidate variants from Magic-BLAST BTOP alignments"
)]
struct Cli {
    /// Log per-dataset details.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Call homozygous and heterozygous variants for every dataset in a manifest.
    Call {
        /// Manifest file (`<dataset accession> <alignment path>` per line).
        #[arg(short = 'm', long)]
        manifest: PathBuf,
        /// Variant boundary table (`<variant accession> <start> <stop>` per line).
        #[arg(short = 'v', long)]
        variants: PathBuf,
        /// Output TSV report.
        #[arg(short = 'o', long)]
        output: PathBuf,
        /// Number of dataset partitions processed in parallel.
        #[arg(short = 'p', long, default_value_t = 1)]
        threads: usize,
    },
    /// Print the tokens and reference pseudo-alignment of BTOP strings.
    Decode {
        /// BTOP strings to decode.
        #[arg(required = true)]
        btops: Vec<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Call {
            manifest,
            variants,
            output,
            threads,
        } => run_call(manifest, variants, output, threads)?,
        Commands::Decode { btops } => run_decode(&btops)?,
    }

    Ok(())
}

fn run_call(
    manifest_path: PathBuf,
    variants_path: PathBuf,
    output_path: PathBuf,
    threads: usize,
) -> Result<()> {
    let datasets = read_manifest(&manifest_path).with_context(|| {
        format!("failed to load manifest from {}", manifest_path.display())
    })?;
    let table = read_variant_table(&variants_path).with_context(|| {
        format!(
            "failed to load variant boundaries from {}",
            variants_path.display()
        )
    })?;

    let config = CallerConfig::new().with_threads(threads);
    config.validate().context("invalid --threads")?;
    let caller = VariantCaller::new(Arc::new(table), config);

    let (results, stats) = caller
        .call_with_stats(&datasets, &MagicBlastSource)
        .context("variant calling failed")?;

    let file = File::create(&output_path)
        .with_context(|| format!("failed to create report {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);
    write_report(&mut writer, &results)
        .with_context(|| format!("failed to write report {}", output_path.display()))?;

    let homozygous: usize = results.iter().map(|result| result.homozygous.len()).sum();
    let heterozygous: usize = results.iter().map(|result| result.heterozygous.len()).sum();
    info!(
        datasets = results.len(),
        records = stats.records,
        spanning = stats.spanning,
        malformed = stats.malformed,
        unknown_variant = stats.unknown_variant,
        homozygous,
        heterozygous,
        output = %output_path.display(),
        "variant calling complete"
    );

    Ok(())
}

fn run_decode(btops: &[String]) -> Result<()> {
    for btop in btops {
        let tokens = tokenize(btop).with_context(|| format!("failed to decode '{btop}'"))?;
        let alignment = ReferenceAlignment::from_tokens(&tokens);
        let rendered: Vec<String> = tokens.iter().map(ToString::to_string).collect();
        println!(
            "{btop}\ttokens={}\tcolumns={}\treference_bases={}\t{alignment}",
            rendered.join(" "),
            alignment.len(),
            alignment.reference_len()
        );
    }
    Ok(())
}
