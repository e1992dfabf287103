use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const LICENSES_STEM: &str = "spdx_licenses_dataset";
pub const EXCEPTIONS_STEM: &str = "spdx_exceptions_dataset";

/// On-disk encoding of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DatasetFormat {
    /// Comma-separated values with a header row.
    Csv,
    /// A single pretty-printed JSON array.
    Json,
    /// One JSON object per line.
    Jsonl,
}

impl DatasetFormat {
    pub fn extension(self) -> &'static str {
        match self {
            DatasetFormat::Csv => "csv",
            DatasetFormat::Json => "json",
            DatasetFormat::Jsonl => "jsonl",
        }
    }

    fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "csv" => Some(DatasetFormat::Csv),
            "json" => Some(DatasetFormat::Json),
            "jsonl" | "ndjson" => Some(DatasetFormat::Jsonl),
            _ => None,
        }
    }
}

/// Write `rows` to `<dir>/<stem>.<ext>` once per requested format.
///
/// Columns follow the field order of `T`. Returns the written paths.
pub fn write_dataset<T: Serialize>(
    rows: &[T],
    dir: &Path,
    stem: &str,
    formats: &[DatasetFormat],
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;

    let mut written = Vec::new();
    for &format in formats {
        let path = dir.join(format!("{}.{}", stem, format.extension()));
        match format {
            DatasetFormat::Csv => write_csv(rows, &path),
            DatasetFormat::Json => write_json(rows, &path),
            DatasetFormat::Jsonl => write_jsonl(rows, &path),
        }
        .with_context(|| format!("writing {}", path.display()))?;
        tracing::debug!(path = %path.display(), rows = rows.len(), "dataset written");
        written.push(path);
    }

    Ok(written)
}

/// Read rows back from a dataset file; the encoding is taken from the extension.
pub fn read_dataset<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let Some(format) = DatasetFormat::from_path(path) else {
        bail!(
            "cannot tell dataset format of {} (expected .csv, .json or .jsonl)",
            path.display()
        );
    };

    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);

    let rows = match format {
        DatasetFormat::Csv => csv::Reader::from_reader(reader)
            .deserialize()
            .collect::<Result<Vec<T>, _>>()?,
        DatasetFormat::Json => serde_json::from_reader(reader)?,
        DatasetFormat::Jsonl => {
            let mut rows: Vec<T> = Vec::new();
            for (i, line) in reader.lines().enumerate() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let row = serde_json::from_str(&line)
                    .with_context(|| format!("{}: line {}", path.display(), i + 1))?;
                rows.push(row);
            }
            rows
        }
    };

    Ok(rows)
}

fn write_csv<T: Serialize>(rows: &[T], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json<T: Serialize>(rows: &[T], path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, rows)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

fn write_jsonl<T: Serialize>(rows: &[T], path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for row in rows {
        serde_json::to_writer(&mut writer, row)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExceptionRow, LicenseRow, UsageCategory, VersionModifier};

    fn rows() -> Vec<LicenseRow> {
        vec![
            LicenseRow {
                license_name: "GNU General Public License v2.0 only".to_string(),
                spdx_id: "GPL-2.0-only".to_string(),
                license_family: Some("GPL".to_string()),
                version: Some("2.0".to_string()),
                version_modifier: Some(VersionModifier::Only),
                usage_category: UsageCategory::Both,
                full_text: "GNU GENERAL PUBLIC LICENSE\nVersion 2, \"June\" 1991".to_string(),
                source_url: "https://spdx.org/licenses/GPL-2.0-only.html".to_string(),
                page_markdown: "# GPL\n".to_string(),
                fsf_tags: Some(r#"["libre"]"#.to_string()),
                fsf_gpl_compatibility: Some("GPL-2 compatible only".to_string()),
            },
            LicenseRow {
                license_name: "MIT License".to_string(),
                spdx_id: "MIT".to_string(),
                license_family: Some("MIT".to_string()),
                version: None,
                version_modifier: None,
                usage_category: UsageCategory::Both,
                full_text: String::new(),
                source_url: "https://spdx.org/licenses/MIT.html".to_string(),
                page_markdown: String::new(),
                fsf_tags: None,
                fsf_gpl_compatibility: None,
            },
        ]
    }

    #[test]
    fn test_csv_header_in_column_order() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_dataset(&rows(), dir.path(), LICENSES_STEM, &[DatasetFormat::Csv]).unwrap();
        assert_eq!(paths, vec![dir.path().join("spdx_licenses_dataset.csv")]);

        let content = std::fs::read_to_string(&paths[0]).unwrap();
        let header = content.lines().next().unwrap();
        assert_eq!(
            header,
            "license_name,spdx_id,license_family,version,version_modifier,usage_category,\
             full_text,source_url,page_markdown,fsf_tags,fsf_gpl_compatibility"
        );
        assert!(content.contains(",only,both,"));
    }

    #[test]
    fn test_csv_reads_back_absent_values() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_dataset(&rows(), dir.path(), LICENSES_STEM, &[DatasetFormat::Csv]).unwrap();
        let back: Vec<LicenseRow> = read_dataset(&paths[0]).unwrap();
        assert_eq!(back, rows());
    }

    #[test]
    fn test_all_formats_written() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested");
        let formats = [DatasetFormat::Csv, DatasetFormat::Json, DatasetFormat::Jsonl];
        let paths = write_dataset(&rows(), &out, LICENSES_STEM, &formats).unwrap();
        assert_eq!(paths.len(), 3);
        assert!(paths.iter().all(|p| p.exists()));

        let jsonl = std::fs::read_to_string(out.join("spdx_licenses_dataset.jsonl")).unwrap();
        assert_eq!(jsonl.lines().count(), 2);
        assert!(jsonl.contains(r#""version_modifier":"only""#));
        assert!(jsonl.contains(r#""version":null"#));

        let from_json: Vec<LicenseRow> =
            read_dataset(&out.join("spdx_licenses_dataset.json")).unwrap();
        assert_eq!(from_json.len(), 2);
        assert_eq!(from_json[1].spdx_id, "MIT");
    }

    #[test]
    fn test_exception_rows() {
        let dir = tempfile::tempdir().unwrap();
        let rows = vec![ExceptionRow {
            exception_id: "Classpath-exception-2.0".to_string(),
            exception_name: "Classpath exception 2.0".to_string(),
            full_text: "Linking this library...".to_string(),
            source_url: "https://spdx.org/licenses/Classpath-exception-2.0.html".to_string(),
            page_markdown: String::new(),
            is_deprecated: false,
        }];
        let paths =
            write_dataset(&rows, dir.path(), EXCEPTIONS_STEM, &[DatasetFormat::Csv]).unwrap();
        let content = std::fs::read_to_string(&paths[0]).unwrap();
        assert!(content.starts_with(
            "exception_id,exception_name,full_text,source_url,page_markdown,is_deprecated\n"
        ));
        assert!(content.trim_end().ends_with(",false"));
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let result: Result<Vec<LicenseRow>> = read_dataset(Path::new("rows.parquet"));
        assert!(result.is_err());
    }
}
