use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::dataset::DatasetFormat;
use crate::models::UsageCategory;

const SPDX_DATA_BASE: &str = "https://raw.githubusercontent.com/spdx/license-list-data/main/json/";

/// Root configuration structure, deserialized from `.spdx-dataset/config.toml`.
///
/// Every section may be omitted; missing fields take the built-in defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the SPDX and FSF documents are fetched from.
    pub source: SourceConfig,
    /// Where and how the dataset is written.
    pub output: OutputConfig,
    /// Extra exact-match usage entries, keyed by SPDX identifier.
    /// These override the built-in table.
    pub usage: HashMap<String, UsageCategory>,
}

/// Upstream endpoints and request tuning.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// URL of `licenses.json`.
    pub licenses_url: String,
    /// Prefix for per-license detail documents (`<base><id>.json`).
    pub license_detail_base: String,
    /// URL of `exceptions.json`.
    pub exceptions_url: String,
    /// Prefix for per-exception detail documents.
    pub exception_detail_base: String,
    /// Prefix for FSF API records.
    pub fsf_base: String,
    /// Timeout for SPDX requests, in seconds.
    pub timeout_secs: u64,
    /// Timeout for FSF requests, in seconds.
    pub fsf_timeout_secs: u64,
    /// Number of entries fetched concurrently.
    pub batch_size: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            licenses_url: format!("{SPDX_DATA_BASE}licenses.json"),
            license_detail_base: format!("{SPDX_DATA_BASE}details/"),
            exceptions_url: format!("{SPDX_DATA_BASE}exceptions.json"),
            exception_detail_base: format!("{SPDX_DATA_BASE}exceptions/"),
            fsf_base: "https://spdx.github.io/fsf-api/spdx/".to_string(),
            timeout_secs: 10,
            fsf_timeout_secs: 5,
            batch_size: 25,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the dataset files are written to.
    pub dir: PathBuf,
    /// Encodings written when `--format` is not given.
    pub formats: Vec<DatasetFormat>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            dir: PathBuf::from("."),
            formats: vec![DatasetFormat::Csv, DatasetFormat::Jsonl],
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<base_dir>/.spdx-dataset/config.toml`
/// 3. `~/.config/spdx-dataset/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(base_dir: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let local_config = base_dir.join(".spdx-dataset").join("config.toml");
    if local_config.exists() {
        return read_config(&local_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("spdx-dataset").join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config = toml::from_str(&content)
        .with_context(|| format!("parsing config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}
