//! `spdx-dataset` — fetch the SPDX license list, derive metadata, and write a dataset.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and set up logging.
//! 2. Load config ([`config::load_config`]) and build the usage table.
//! 3. Fetch the license or exception list ([`registry`]).
//! 4. Fetch details and FSF tags in batches and assemble rows ([`builder`]),
//!    deriving family, version and usage with [`license`].
//! 5. Write the dataset encodings ([`dataset`]).
//! 6. Render the summary ([`report`]).
//!
//! With `--from`, steps 3 and 4 are replaced by reading an existing license
//! dataset and re-deriving its columns.

mod builder;
mod cli;
mod config;
mod dataset;
mod license;
mod models;
mod registry;
mod report;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::Level;

use builder::Sources;
use cli::{Cli, DatasetKind, ReportFormat};
use config::{load_config, Config};
use dataset::{DatasetFormat, EXCEPTIONS_STEM, LICENSES_STEM};
use license::classifier::UsageTable;
use models::LicenseRow;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let cwd = std::env::current_dir()?;
    let config = load_config(&cwd, cli.config.as_deref())?;

    let usage = UsageTable::with_overrides(&config.usage);
    tracing::debug!(entries = usage.len(), "usage table ready");

    let out_dir = cli.output.clone().unwrap_or_else(|| config.output.dir.clone());
    let formats = if cli.formats.is_empty() {
        config.output.formats.clone()
    } else {
        cli.formats.clone()
    };

    if let Some(path) = &cli.from {
        return rederive_dataset(&cli, path, &usage, &out_dir, &formats);
    }

    let failed = match cli.kind {
        DatasetKind::Licenses => build_licenses(&cli, &config, &usage, &out_dir, &formats).await?,
        DatasetKind::Exceptions => build_exceptions(&cli, &config, &out_dir, &formats).await?,
    };

    if cli.strict && failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

/// Fetch, derive and write the license dataset. Returns the number of failed lookups.
async fn build_licenses(
    cli: &Cli,
    config: &Config,
    usage: &UsageTable,
    out_dir: &Path,
    formats: &[DatasetFormat],
) -> Result<usize> {
    let sources = Sources::new(&config.source, !cli.no_fsf)?;

    if !cli.quiet {
        eprintln!("  {} Fetching SPDX license list...", "→".cyan());
    }
    let mut entries =
        registry::spdx::fetch_license_list(&sources.spdx, &config.source.licenses_url).await?;
    if !cli.quiet {
        eprintln!("  {} Found {} licenses", "→".cyan(), entries.len());
    }
    if let Some(n) = cli.sample {
        entries.truncate(n);
    }

    let pb = progress_bar(entries.len(), cli.quiet)?;
    let built = builder::build_license_rows(&sources, &entries, usage, pb.as_ref()).await;
    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    let written = dataset::write_dataset(&built.rows, out_dir, LICENSES_STEM, formats)?;

    match cli.report {
        ReportFormat::Terminal => report::terminal::render_licenses(
            &built.rows,
            &written,
            &built.failed,
            cli.verbose,
            cli.quiet,
        ),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&built.rows)?),
    }

    Ok(built.failed.len())
}

/// Fetch and write the exception dataset. Returns the number of failed lookups.
async fn build_exceptions(
    cli: &Cli,
    config: &Config,
    out_dir: &Path,
    formats: &[DatasetFormat],
) -> Result<usize> {
    let sources = Sources::new(&config.source, false)?;

    if !cli.quiet {
        eprintln!("  {} Fetching SPDX exceptions list...", "→".cyan());
    }
    let mut entries =
        registry::spdx::fetch_exception_list(&sources.spdx, &config.source.exceptions_url).await?;
    if !cli.quiet {
        eprintln!("  {} Found {} exceptions", "→".cyan(), entries.len());
    }
    if let Some(n) = cli.sample {
        entries.truncate(n);
    }

    let pb = progress_bar(entries.len(), cli.quiet)?;
    let built = builder::build_exception_rows(&sources, &entries, pb.as_ref()).await;
    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    let written = dataset::write_dataset(&built.rows, out_dir, EXCEPTIONS_STEM, formats)?;

    match cli.report {
        ReportFormat::Terminal => report::terminal::render_exceptions(
            &built.rows,
            &written,
            &built.failed,
            cli.verbose,
            cli.quiet,
        ),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&built.rows)?),
    }

    Ok(built.failed.len())
}

/// Recompute derived columns of an existing license dataset and write it back out.
fn rederive_dataset(
    cli: &Cli,
    path: &Path,
    usage: &UsageTable,
    out_dir: &Path,
    formats: &[DatasetFormat],
) -> Result<()> {
    let mut rows: Vec<LicenseRow> = dataset::read_dataset(path)?;
    if !cli.quiet {
        eprintln!(
            "  {} Loaded {} licenses from {}",
            "→".cyan(),
            rows.len(),
            path.display()
        );
    }

    for row in &mut rows {
        builder::rederive(row, usage);
    }

    let written: Vec<PathBuf> = dataset::write_dataset(&rows, out_dir, LICENSES_STEM, formats)?;

    match cli.report {
        ReportFormat::Terminal => {
            report::terminal::render_licenses(&rows, &written, &[], cli.verbose, cli.quiet)
        }
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
    }

    Ok(())
}

fn progress_bar(len: usize, quiet: bool) -> Result<Option<ProgressBar>> {
    if quiet {
        return Ok(None);
    }

    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    Ok(Some(pb))
}
