/// Summarize FSF tags (from the SPDX FSF API) as a GPL compatibility note.
///
/// The first matching rule wins; a tag set that matches nothing is reported
/// as unclassified.
pub fn gpl_compatibility<S: AsRef<str>>(tags: &[S]) -> &'static str {
    let has = |tag: &str| tags.iter().any(|t| t.as_ref() == tag);

    if has("gpl-3-compatible") && has("gpl-2-compatible") {
        "GPL-2 and GPL-3 compatible"
    } else if has("gpl-3-compatible") {
        "GPL-3 compatible only"
    } else if has("gpl-2-compatible") {
        "GPL-2 compatible only"
    } else if has("non-free") {
        "Non-free (not GPL-compatible)"
    } else if has("libre") {
        "Free (libre) but not marked GPL-compatible"
    } else if has("viewpoint") {
        "Viewpoint-restricted"
    } else if has("fdl-compatible") {
        "FDL-compatible"
    } else {
        "Unknown / not classified by FSF"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpl_compatibility() {
        assert_eq!(
            gpl_compatibility(&["libre", "gpl-2-compatible", "gpl-3-compatible"]),
            "GPL-2 and GPL-3 compatible"
        );
        assert_eq!(
            gpl_compatibility(&["libre", "gpl-3-compatible"]),
            "GPL-3 compatible only"
        );
        assert_eq!(gpl_compatibility(&["gpl-2-compatible"]), "GPL-2 compatible only");
        assert_eq!(gpl_compatibility(&["non-free"]), "Non-free (not GPL-compatible)");
        assert_eq!(
            gpl_compatibility(&["libre"]),
            "Free (libre) but not marked GPL-compatible"
        );
        assert_eq!(gpl_compatibility(&["viewpoint"]), "Viewpoint-restricted");
        assert_eq!(gpl_compatibility(&["fdl-compatible"]), "FDL-compatible");
    }

    #[test]
    fn test_unclassified() {
        let none: [&str; 0] = [];
        assert_eq!(gpl_compatibility(&none), "Unknown / not classified by FSF");
        assert_eq!(
            gpl_compatibility(&["something-new"]),
            "Unknown / not classified by FSF"
        );
    }

    #[test]
    fn test_non_free_checked_after_gpl() {
        assert_eq!(
            gpl_compatibility(&["non-free".to_string(), "gpl-2-compatible".to_string()]),
            "GPL-2 compatible only"
        );
    }
}
