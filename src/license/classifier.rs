use std::collections::HashMap;

use crate::models::UsageCategory;

/// Known identifiers and where they are typically used.
const BUILTIN_USAGE: &[(&str, UsageCategory)] = &[
    // Used for both datasets and models
    ("MIT", UsageCategory::Both),
    ("Apache-2.0", UsageCategory::Both),
    ("BSD-2-Clause", UsageCategory::Both),
    ("BSD-3-Clause", UsageCategory::Both),
    ("GPL-3.0", UsageCategory::Both),
    ("GPL-2.0", UsageCategory::Both),
    ("LGPL-3.0", UsageCategory::Both),
    ("LGPL-2.1", UsageCategory::Both),
    ("ISC", UsageCategory::Both),
    ("MPL-2.0", UsageCategory::Both),
    ("CC0-1.0", UsageCategory::Both),
    ("Unlicense", UsageCategory::Both),
    // Creative Commons
    ("CC-BY-4.0", UsageCategory::Dataset),
    ("CC-BY-SA-4.0", UsageCategory::Dataset),
    ("CC-BY-NC-4.0", UsageCategory::Dataset),
    ("CC-BY-NC-SA-4.0", UsageCategory::Dataset),
    ("CC-BY-ND-4.0", UsageCategory::Dataset),
    ("CC-BY-NC-ND-4.0", UsageCategory::Dataset),
    // Data licenses
    ("CDLA-Permissive-1.0", UsageCategory::Dataset),
    ("CDLA-Permissive-2.0", UsageCategory::Dataset),
    ("CDLA-Sharing-1.0", UsageCategory::Dataset),
    ("C-UDA-1.0", UsageCategory::Dataset),
    ("ODbL-1.0", UsageCategory::Dataset),
    ("PDDL-1.0", UsageCategory::Dataset),
    // RAIL family
    ("OpenRAIL-M", UsageCategory::Model),
    ("OpenRAIL++", UsageCategory::Model),
    ("BigScience-OpenRAIL-M", UsageCategory::Model),
    ("CreativeML-OpenRAIL-M", UsageCategory::Model),
    ("BigScience-BLOOM-RAIL-1.0", UsageCategory::Model),
    // Software
    ("AGPL-3.0", UsageCategory::Code),
    ("WTFPL", UsageCategory::Code),
    ("Zlib", UsageCategory::Code),
    ("BSL-1.0", UsageCategory::Code),
    ("SSPL-1.0", UsageCategory::Code),
];

/// Substring rules tried in order when there is no exact match.
const FALLBACK_RULES: &[(&[&str], UsageCategory)] = &[
    (&["CC-BY", "CC-"], UsageCategory::Dataset),
    (&["GPL", "LGPL"], UsageCategory::Both),
    (&["BSD"], UsageCategory::Both),
    (&["Apache"], UsageCategory::Both),
    (&["RAIL", "OpenRAIL"], UsageCategory::Model),
    (&["CDLA", "ODbL"], UsageCategory::Dataset),
];

/// Exact-match usage lookup, built once and handed to whoever classifies.
#[derive(Debug, Clone)]
pub struct UsageTable {
    entries: HashMap<String, UsageCategory>,
}

impl UsageTable {
    /// The built-in table.
    pub fn builtin() -> Self {
        let entries = BUILTIN_USAGE
            .iter()
            .map(|(id, usage)| (id.to_string(), *usage))
            .collect();
        Self { entries }
    }

    /// The built-in table with `overrides` added on top (overrides win).
    pub fn with_overrides(overrides: &HashMap<String, UsageCategory>) -> Self {
        let mut table = Self::builtin();
        table
            .entries
            .extend(overrides.iter().map(|(id, usage)| (id.clone(), *usage)));
        table
    }

    pub fn get(&self, id: &str) -> Option<UsageCategory> {
        self.entries.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Classify an SPDX identifier by typical usage.
    ///
    /// Exact table entries win over the substring fallbacks; anything
    /// unmatched is [`UsageCategory::Other`].
    pub fn classify(&self, id: &str) -> UsageCategory {
        if let Some(usage) = self.get(id) {
            return usage;
        }

        FALLBACK_RULES
            .iter()
            .find(|(needles, _)| needles.iter().any(|n| id.contains(n)))
            .map(|(_, usage)| *usage)
            .unwrap_or(UsageCategory::Other)
    }
}

impl Default for UsageTable {
    fn default() -> Self {
        Self::builtin()
    }
}
