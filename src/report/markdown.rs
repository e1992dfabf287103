use std::fmt::Write;

use crate::registry::spdx::{CrossRef, ExceptionDetail, LicenseDetail};

/// Reference lists are capped so a page stays readable.
const MAX_REFERENCES: usize = 10;

const FSF_API_LINK: &str = "(Source: [FSF License List API](https://github.com/spdx/fsf-api))";

/// Render a self-contained markdown page for one license.
///
/// The FSF section appears when there are tags or a compatibility summary.
pub fn license_page(
    detail: &LicenseDetail,
    source_url: &str,
    fsf_tags: Option<&[String]>,
    fsf_gpl_compat: Option<&str>,
) -> String {
    let name = non_empty(detail.name.as_deref()).unwrap_or(&detail.license_id);
    let comment = non_empty(detail.comment.as_deref())
        .or_else(|| non_empty(detail.license_comments.as_deref()));
    let fsf_tags = fsf_tags.filter(|t| !t.is_empty());

    let mut page = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(page, "# {}", name);
    let _ = writeln!(page, "**SPDX Identifier:** `{}`", detail.license_id);
    let _ = writeln!(page, "**Source:** {}", source_url);

    if let Some(comment) = comment {
        let _ = writeln!(page, "## Notes\n\n{}", comment);
    }

    if fsf_tags.is_some() || fsf_gpl_compat.is_some() {
        page.push_str("## FSF Classification\n\n");
        if let Some(compat) = fsf_gpl_compat {
            let _ = writeln!(page, "**GPL compatibility:** {}\n", compat);
        }
        if let Some(tags) = fsf_tags {
            let _ = writeln!(page, "**Tags:** {}\n", tags.join(", "));
        }
        let _ = writeln!(page, "{}\n", FSF_API_LINK);
    }

    push_code_section(&mut page, "License Text", &detail.license_text);

    if let Some(header) = non_empty(detail.standard_license_header.as_deref()) {
        push_code_section(&mut page, "Standard License Header", header);
    }

    let references: Vec<&str> = detail
        .see_also
        .iter()
        .map(String::as_str)
        .chain(detail.cross_ref.iter().filter_map(CrossRef::url))
        .collect();
    push_reference_list(&mut page, "Other References", &references);

    page
}

/// Render a self-contained markdown page for one license exception.
pub fn exception_page(detail: &ExceptionDetail, source_url: &str) -> String {
    let id = &detail.license_exception_id;

    let mut page = String::new();
    let _ = writeln!(page, "# {}", detail.name);
    let _ = writeln!(page, "**SPDX Exception ID:** `{}`", id);
    let _ = writeln!(page, "**Source:** {}", source_url);
    let _ = writeln!(page, "\n**Used in expressions:** `LICENSE WITH {}`", id);

    if let Some(comment) = non_empty(detail.license_comments.as_deref()) {
        let _ = writeln!(page, "## Notes\n\n{}", comment);
    }

    push_code_section(&mut page, "Exception Text", &detail.license_exception_text);

    let references: Vec<&str> = detail.see_also.iter().map(String::as_str).collect();
    push_reference_list(&mut page, "References", &references);

    page
}

fn push_code_section(page: &mut String, title: &str, body: &str) {
    let _ = writeln!(page, "## {}\n\n```\n{}\n```", title, body.trim());
}

fn push_reference_list(page: &mut String, title: &str, urls: &[&str]) {
    if urls.is_empty() {
        return;
    }
    let _ = writeln!(page, "## {}\n", title);
    for url in urls.iter().take(MAX_REFERENCES) {
        let _ = writeln!(page, "- {}", url);
    }
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}
