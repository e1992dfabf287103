use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;

use super::USER_AGENT;

/// `licenses.json` from license-list-data.
#[derive(Debug, Deserialize)]
struct LicenseList {
    #[serde(default)]
    licenses: Vec<LicenseEntry>,
}

/// One entry of the license list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LicenseEntry {
    pub license_id: String,
    #[serde(default)]
    pub name: String,
    pub reference: Option<String>,
}

/// `details/<id>.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LicenseDetail {
    pub license_id: String,
    pub name: Option<String>,
    pub license_text: String,
    pub comment: Option<String>,
    pub license_comments: Option<String>,
    pub standard_license_header: Option<String>,
    pub see_also: Vec<String>,
    pub cross_ref: Vec<CrossRef>,
}

/// `crossRef` items are objects in current data, plain URLs in older dumps.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CrossRef {
    Url(String),
    Entry {
        #[serde(default)]
        url: Option<String>,
    },
}

impl CrossRef {
    pub fn url(&self) -> Option<&str> {
        match self {
            CrossRef::Url(url) => Some(url.as_str()),
            CrossRef::Entry { url } => url.as_deref(),
        }
        .filter(|u| !u.is_empty())
    }
}

/// `exceptions.json`.
#[derive(Debug, Deserialize)]
struct ExceptionList {
    #[serde(default)]
    exceptions: Vec<ExceptionEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExceptionEntry {
    pub license_exception_id: String,
    #[serde(default)]
    pub name: String,
    pub reference: Option<String>,
    #[serde(default)]
    pub is_deprecated_license_id: bool,
}

/// `exceptions/<id>.json`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExceptionDetail {
    pub license_exception_id: String,
    pub name: String,
    pub license_exception_text: String,
    pub license_comments: Option<String>,
    pub see_also: Vec<String>,
}

/// Fetch the full SPDX license list. Any failure here is fatal to a build.
pub async fn fetch_license_list(client: &Client, url: &str) -> Result<Vec<LicenseEntry>> {
    let list: LicenseList = get_json(client, url)
        .await
        .with_context(|| format!("fetching license list from {url}"))?;
    Ok(list.licenses)
}

/// Fetch the detail document for one license.
///
/// Returns `Ok(None)` when the server answers with a non-success status.
pub async fn fetch_license_detail(
    client: &Client,
    base: &str,
    id: &str,
) -> Result<Option<LicenseDetail>> {
    get_optional_json(client, &format!("{}{}.json", base, id)).await
}

/// Fetch the full SPDX exception list.
pub async fn fetch_exception_list(client: &Client, url: &str) -> Result<Vec<ExceptionEntry>> {
    let list: ExceptionList = get_json(client, url)
        .await
        .with_context(|| format!("fetching exception list from {url}"))?;
    Ok(list.exceptions)
}

/// Fetch the detail document for one exception.
pub async fn fetch_exception_detail(
    client: &Client,
    base: &str,
    id: &str,
) -> Result<Option<ExceptionDetail>> {
    get_optional_json(client, &format!("{}{}.json", base, id)).await
}

async fn get_json<T: serde::de::DeserializeOwned>(client: &Client, url: &str) -> Result<T> {
    tracing::debug!(url, "GET");
    let response = client
        .get(url)
        .header("User-Agent", USER_AGENT)
        .send()
        .await?
        .error_for_status()?;
    Ok(response.json().await?)
}

async fn get_optional_json<T: serde::de::DeserializeOwned>(
    client: &Client,
    url: &str,
) -> Result<Option<T>> {
    tracing::debug!(url, "GET");
    let response = client
        .get(url)
        .header("User-Agent", USER_AGENT)
        .send()
        .await?;

    if !response.status().is_success() {
        return Ok(None);
    }

    Ok(Some(response.json().await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_license_list() {
        let json = r#"{
            "licenseListVersion": "3.25",
            "licenses": [
                {
                    "reference": "https://spdx.org/licenses/0BSD.html",
                    "isDeprecatedLicenseId": false,
                    "detailsUrl": "https://spdx.org/licenses/0BSD.json",
                    "name": "BSD Zero Clause License",
                    "licenseId": "0BSD",
                    "isOsiApproved": true
                },
                { "licenseId": "GPL-2.0+", "name": "GNU General Public License v2.0 or later",
                  "isDeprecatedLicenseId": true }
            ]
        }"#;
        let list: LicenseList = serde_json::from_str(json).unwrap();
        assert_eq!(list.licenses.len(), 2);
        assert_eq!(list.licenses[0].license_id, "0BSD");
        assert_eq!(
            list.licenses[0].reference.as_deref(),
            Some("https://spdx.org/licenses/0BSD.html")
        );
        assert_eq!(list.licenses[1].reference, None);
    }

    #[test]
    fn test_parse_detail_with_mixed_cross_refs() {
        let json = r#"{
            "licenseId": "MIT",
            "name": "MIT License",
            "licenseText": "Permission is hereby granted...",
            "licenseComments": "Popular.",
            "seeAlso": ["https://opensource.org/license/mit/"],
            "crossRef": [
                { "url": "https://opensource.org/license/mit/", "isValid": true, "order": 0 },
                "https://example.org/mit",
                { "isValid": false }
            ]
        }"#;
        let detail: LicenseDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.license_id, "MIT");
        assert_eq!(detail.comment, None);
        assert_eq!(detail.license_comments.as_deref(), Some("Popular."));
        let urls: Vec<_> = detail.cross_ref.iter().filter_map(CrossRef::url).collect();
        assert_eq!(
            urls,
            vec!["https://opensource.org/license/mit/", "https://example.org/mit"]
        );
    }

    #[test]
    fn test_parse_exception_detail() {
        let json = r#"{
            "licenseExceptionId": "Classpath-exception-2.0",
            "name": "Classpath exception 2.0",
            "licenseExceptionText": "Linking this library statically...",
            "seeAlso": ["https://www.gnu.org/software/classpath/license.html"]
        }"#;
        let detail: ExceptionDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.license_exception_id, "Classpath-exception-2.0");
        assert_eq!(detail.see_also.len(), 1);
        assert_eq!(detail.license_comments, None);
    }

    #[tokio::test]
    async fn test_fetch_license_list() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/licenses.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"licenses":[{"licenseId":"MIT","name":"MIT License"}]}"#)
            .create_async()
            .await;

        let client = Client::new();
        let entries = fetch_license_list(&client, &format!("{}/licenses.json", server.url()))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "MIT License");
    }

    #[tokio::test]
    async fn test_fetch_license_list_error_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/licenses.json")
            .with_status(500)
            .create_async()
            .await;

        let client = Client::new();
        let result = fetch_license_list(&client, &format!("{}/licenses.json", server.url())).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_fetch_detail_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/details/Nope.json")
            .with_status(404)
            .create_async()
            .await;

        let client = Client::new();
        let base = format!("{}/details/", server.url());
        let detail = fetch_license_detail(&client, &base, "Nope").await.unwrap();
        assert!(detail.is_none());
    }

    #[tokio::test]
    async fn test_fetch_exception_detail() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/exceptions/LLVM-exception.json")
            .with_status(200)
            .with_body(r#"{"licenseExceptionId":"LLVM-exception","name":"LLVM Exception","licenseExceptionText":"As an exception..."}"#)
            .create_async()
            .await;

        let client = Client::new();
        let base = format!("{}/exceptions/", server.url());
        let detail = fetch_exception_detail(&client, &base, "LLVM-exception")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(detail.name, "LLVM Exception");
    }
}
