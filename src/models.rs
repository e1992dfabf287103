use serde::{Deserialize, Serialize};

/// Coarse classification of where a license is typically applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UsageCategory {
    Dataset,
    Model,
    Both,
    Code,
    Other,
}

impl std::fmt::Display for UsageCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UsageCategory::Dataset => write!(f, "dataset"),
            UsageCategory::Model => write!(f, "model"),
            UsageCategory::Both => write!(f, "both"),
            UsageCategory::Code => write!(f, "code"),
            UsageCategory::Other => write!(f, "other"),
        }
    }
}

/// Whether a license grants only the stated version or any later one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersionModifier {
    #[serde(rename = "only")]
    Only,
    #[serde(rename = "or-later")]
    OrLater,
}

impl std::fmt::Display for VersionModifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VersionModifier::Only => write!(f, "only"),
            VersionModifier::OrLater => write!(f, "or-later"),
        }
    }
}

/// An SPDX identifier split into family, version and modifier.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedIdentifier {
    pub license_family: Option<String>,
    pub version: Option<String>,
    pub version_modifier: Option<VersionModifier>,
}

/// One row of the license dataset. Field order is the column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseRow {
    pub license_name: String,
    pub spdx_id: String,
    pub license_family: Option<String>,
    pub version: Option<String>,
    pub version_modifier: Option<VersionModifier>,
    pub usage_category: UsageCategory,
    pub full_text: String,
    pub source_url: String,
    #[serde(default)]
    pub page_markdown: String,
    /// FSF tags as a JSON array string.
    #[serde(default)]
    pub fsf_tags: Option<String>,
    #[serde(default)]
    pub fsf_gpl_compatibility: Option<String>,
}

/// One row of the license-exception dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExceptionRow {
    pub exception_id: String,
    pub exception_name: String,
    pub full_text: String,
    pub source_url: String,
    pub page_markdown: String,
    pub is_deprecated: bool,
}
