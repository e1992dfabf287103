use std::path::PathBuf;

use clap::Parser;

use crate::dataset::DatasetFormat;

#[derive(Parser, Debug)]
#[command(
    name = "spdx-dataset",
    about = "Build a dataset of SPDX licenses and exceptions with derived metadata",
    version
)]
pub struct Cli {
    /// Which SPDX list to build
    #[arg(long, default_value = "licenses", value_name = "KIND")]
    pub kind: DatasetKind,

    /// Only process the first N entries of the list
    #[arg(long, value_name = "N")]
    pub sample: Option<usize>,

    /// Output directory [default: from config, else "."]
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Encoding to write (repeatable) [default: from config, else csv and jsonl]
    #[arg(long = "format", value_name = "FORMAT")]
    pub formats: Vec<DatasetFormat>,

    /// Config file [default: ./.spdx-dataset/config.toml, fallback ~/.config/spdx-dataset/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Skip FSF classification lookups
    #[arg(long)]
    pub no_fsf: bool,

    /// Re-derive family, version and usage columns of an existing license dataset (no network)
    #[arg(long, value_name = "FILE", conflicts_with_all = ["kind", "sample", "no_fsf"])]
    pub from: Option<PathBuf>,

    /// Summary format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Exit with code 1 if any detail document could not be fetched
    #[arg(long)]
    pub strict: bool,

    /// Show every record in the summary and enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print a one-line summary
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, clap::ValueEnum)]
pub enum DatasetKind {
    Licenses,
    Exceptions,
}

#[derive(Debug, Clone, Copy, PartialEq, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["spdx-dataset"]).unwrap();
        assert_eq!(cli.kind, DatasetKind::Licenses);
        assert_eq!(cli.report, ReportFormat::Terminal);
        assert!(cli.formats.is_empty());
        assert!(cli.from.is_none());
    }

    #[test]
    fn test_repeatable_format() {
        let cli = Cli::try_parse_from([
            "spdx-dataset",
            "--kind",
            "exceptions",
            "--format",
            "csv",
            "--format",
            "json",
            "--sample",
            "5",
        ])
        .unwrap();
        assert_eq!(cli.kind, DatasetKind::Exceptions);
        assert_eq!(cli.formats, vec![DatasetFormat::Csv, DatasetFormat::Json]);
        assert_eq!(cli.sample, Some(5));
    }

    #[test]
    fn test_from_conflicts_with_sample() {
        let result = Cli::try_parse_from(["spdx-dataset", "--from", "rows.jsonl", "--sample", "3"]);
        assert!(result.is_err());
    }
}
