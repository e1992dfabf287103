//! Assemble dataset rows from upstream documents.
//!
//! Detail lookups run in bounded batches. A failed lookup never aborts the
//! build: the entry is kept with empty text and page, and its id is reported
//! back in [`Built::failed`].

use std::time::Duration;

use anyhow::Result;
use futures::future::join_all;
use indicatif::ProgressBar;
use reqwest::Client;

use crate::config::SourceConfig;
use crate::license::classifier::UsageTable;
use crate::license::{fsf, spdx};
use crate::models::{ExceptionRow, LicenseRow};
use crate::registry;
use crate::registry::spdx::{ExceptionDetail, ExceptionEntry, LicenseDetail, LicenseEntry};
use crate::report::markdown;

/// HTTP clients plus the endpoints they talk to.
pub struct Sources<'a> {
    pub spdx: Client,
    /// `None` skips FSF lookups entirely.
    pub fsf: Option<Client>,
    pub config: &'a SourceConfig,
}

impl<'a> Sources<'a> {
    pub fn new(config: &'a SourceConfig, with_fsf: bool) -> Result<Self> {
        let spdx = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let fsf = if with_fsf {
            Some(
                Client::builder()
                    .timeout(Duration::from_secs(config.fsf_timeout_secs))
                    .build()?,
            )
        } else {
            None
        };
        Ok(Sources { spdx, fsf, config })
    }

    fn batch_size(&self) -> usize {
        self.config.batch_size.max(1)
    }
}

/// Rows in upstream list order, plus the ids whose details could not be fetched.
#[derive(Debug)]
pub struct Built<T> {
    pub rows: Vec<T>,
    pub failed: Vec<String>,
}

/// Fetch details (and FSF tags) for every license entry and build its row.
pub async fn build_license_rows(
    sources: &Sources<'_>,
    entries: &[LicenseEntry],
    usage: &UsageTable,
    progress: Option<&ProgressBar>,
) -> Built<LicenseRow> {
    let mut built = Built {
        rows: Vec::with_capacity(entries.len()),
        failed: Vec::new(),
    };

    for batch in entries.chunks(sources.batch_size()) {
        let lookups = batch.iter().map(|entry| async move {
            let id = entry.license_id.as_str();
            let (detail, tags) = tokio::join!(
                registry::spdx::fetch_license_detail(
                    &sources.spdx,
                    &sources.config.license_detail_base,
                    id,
                ),
                fetch_fsf_tags(sources, id),
            );
            (detail, tags)
        });

        let results = join_all(lookups).await;

        for (entry, (detail, tags)) in batch.iter().zip(results) {
            let detail = settle(&entry.license_id, detail, &mut built.failed);
            built.rows.push(license_row(
                entry,
                detail.as_ref(),
                tags.as_deref(),
                usage,
            ));
            if let Some(pb) = progress {
                pb.inc(1);
            }
        }
    }

    built
}

/// Fetch details for every exception entry and build its row.
pub async fn build_exception_rows(
    sources: &Sources<'_>,
    entries: &[ExceptionEntry],
    progress: Option<&ProgressBar>,
) -> Built<ExceptionRow> {
    let mut built = Built {
        rows: Vec::with_capacity(entries.len()),
        failed: Vec::new(),
    };

    for batch in entries.chunks(sources.batch_size()) {
        let lookups = batch.iter().map(|entry| {
            registry::spdx::fetch_exception_detail(
                &sources.spdx,
                &sources.config.exception_detail_base,
                &entry.license_exception_id,
            )
        });

        let results = join_all(lookups).await;

        for (entry, detail) in batch.iter().zip(results) {
            let detail = settle(&entry.license_exception_id, detail, &mut built.failed);
            built.rows.push(exception_row(entry, detail.as_ref()));
            if let Some(pb) = progress {
                pb.inc(1);
            }
        }
    }

    built
}

/// Build one license row from its list entry, detail document and FSF tags.
///
/// `fsf_tags` is `None` when the FSF has no record for the license.
pub fn license_row(
    entry: &LicenseEntry,
    detail: Option<&LicenseDetail>,
    fsf_tags: Option<&[String]>,
    usage: &UsageTable,
) -> LicenseRow {
    let source_url = source_url(entry.reference.as_deref(), &entry.license_id);
    let fsf_gpl_compatibility = fsf_tags.map(fsf::gpl_compatibility);

    let page_markdown = detail
        .map(|d| markdown::license_page(d, &source_url, fsf_tags, fsf_gpl_compatibility))
        .unwrap_or_default();

    let parsed = spdx::parse(&entry.license_id);

    LicenseRow {
        license_name: entry.name.clone(),
        spdx_id: entry.license_id.clone(),
        license_family: parsed.license_family,
        version: parsed.version,
        version_modifier: parsed.version_modifier,
        usage_category: usage.classify(&entry.license_id),
        full_text: detail.map(|d| d.license_text.clone()).unwrap_or_default(),
        source_url,
        page_markdown,
        fsf_tags: fsf_tags
            .filter(|tags| !tags.is_empty())
            .and_then(|tags| serde_json::to_string(tags).ok()),
        fsf_gpl_compatibility: fsf_gpl_compatibility.map(str::to_string),
    }
}

/// Build one exception row from its list entry and detail document.
pub fn exception_row(entry: &ExceptionEntry, detail: Option<&ExceptionDetail>) -> ExceptionRow {
    let source_url = source_url(entry.reference.as_deref(), &entry.license_exception_id);

    ExceptionRow {
        exception_id: entry.license_exception_id.clone(),
        exception_name: entry.name.clone(),
        full_text: detail
            .map(|d| d.license_exception_text.clone())
            .unwrap_or_default(),
        page_markdown: detail
            .map(|d| markdown::exception_page(d, &source_url))
            .unwrap_or_default(),
        source_url,
        is_deprecated: entry.is_deprecated_license_id,
    }
}

/// Recompute the identifier-derived columns of a row from its `spdx_id`.
pub fn rederive(row: &mut LicenseRow, usage: &UsageTable) {
    let parsed = spdx::parse(&row.spdx_id);
    row.license_family = parsed.license_family;
    row.version = parsed.version;
    row.version_modifier = parsed.version_modifier;
    row.usage_category = usage.classify(&row.spdx_id);
}

fn source_url(reference: Option<&str>, id: &str) -> String {
    match reference {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => format!("https://spdx.org/licenses/{}.html", id),
    }
}

async fn fetch_fsf_tags(sources: &Sources<'_>, id: &str) -> Option<Vec<String>> {
    let client = sources.fsf.as_ref()?;
    match registry::fsf::fetch_tags(client, &sources.config.fsf_base, id).await {
        Ok(tags) => tags,
        Err(err) => {
            tracing::debug!(id, error = %err, "FSF lookup failed");
            None
        }
    }
}

/// Turn a detail lookup into an optional document, recording failures.
fn settle<T>(id: &str, result: Result<Option<T>>, failed: &mut Vec<String>) -> Option<T> {
    match result {
        Ok(Some(detail)) => Some(detail),
        Ok(None) => {
            tracing::warn!(id, "detail document not found");
            failed.push(id.to_string());
            None
        }
        Err(err) => {
            tracing::warn!(id, error = %err, "could not fetch detail document");
            failed.push(id.to_string());
            None
        }
    }
}
