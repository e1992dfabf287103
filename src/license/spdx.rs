use std::sync::LazyLock;

use regex::Regex;

use crate::models::{ParsedIdentifier, VersionModifier};

/// A hyphen, one to three dot-joined digit groups, then a hyphen or the end.
static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-(\d+(?:\.\d+){0,2})(?:-|$)").expect("version pattern is valid")
});

/// Families that keep their short name as-is.
const GNU_FAMILIES: &[&str] = &["GPL", "LGPL", "AGPL", "GFDL"];

/// Split an SPDX identifier into family, version and version modifier.
///
/// Never fails: an identifier without a recognizable version comes back
/// whole as the family.
///
/// - `GPL-2.0-only` → `GPL`, `2.0`, `only`
/// - `CC-BY-4.0` → `Creative Commons`, `4.0`
/// - `OpenRAIL++` → `OpenRAIL`, no version, `or-later`
pub fn parse(id: &str) -> ParsedIdentifier {
    let (working, version_modifier) = strip_modifier(id);

    let split = VERSION_RE.captures(&working).and_then(|caps| {
        let start = caps.get(0)?.start();
        let version = caps.get(1)?.as_str().to_string();
        Some((start, version))
    });

    // The family is everything before the hyphen that opens the version.
    let (family, version) = match split {
        Some((start, version)) => (working[..start].to_string(), Some(version)),
        None => (working, None),
    };

    ParsedIdentifier {
        license_family: Some(normalize_family(family)),
        version,
        version_modifier,
    }
}

/// Remove the modifier suffix. `-only` beats `-or-later`, which beats a
/// trailing `+`.
fn strip_modifier(id: &str) -> (String, Option<VersionModifier>) {
    if id.contains("-only") {
        (id.replace("-only", ""), Some(VersionModifier::Only))
    } else if id.contains("-or-later") {
        (id.replace("-or-later", ""), Some(VersionModifier::OrLater))
    } else if id.ends_with('+') {
        (id.trim_end_matches('+').to_string(), Some(VersionModifier::OrLater))
    } else {
        (id.to_string(), None)
    }
}

fn normalize_family(family: String) -> String {
    if GNU_FAMILIES.contains(&family.as_str()) || family == "CC0" {
        return family;
    }
    if family.starts_with("CC-") {
        return "Creative Commons".to_string();
    }
    family
}
