use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::{ExceptionRow, LicenseRow, UsageCategory};

/// Families shown in the summary table unless `--verbose` is set.
const TOP_FAMILIES: usize = 15;

const USAGE_ORDER: [UsageCategory; 5] = [
    UsageCategory::Dataset,
    UsageCategory::Model,
    UsageCategory::Both,
    UsageCategory::Code,
    UsageCategory::Other,
];

/// Render a colored summary of a freshly built license dataset.
pub fn render_licenses(
    rows: &[LicenseRow],
    written: &[PathBuf],
    failed: &[String],
    verbose: bool,
    quiet: bool,
) {
    let counts = usage_counts(rows);
    let count = |u: UsageCategory| counts.get(&u).copied().unwrap_or(0);

    if quiet {
        println!(
            "Licenses: {}  dataset: {}  model: {}  both: {}  code: {}  other: {}  failed: {}",
            rows.len(),
            count(UsageCategory::Dataset),
            count(UsageCategory::Model),
            count(UsageCategory::Both),
            count(UsageCategory::Code),
            count(UsageCategory::Other),
            failed.len().to_string().red(),
        );
        return;
    }

    print_header();

    let with_fsf = rows.iter().filter(|r| r.fsf_gpl_compatibility.is_some()).count();

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Total licenses     : {}", rows.len()));
    for usage in USAGE_ORDER {
        println!(
            " │  {:<48} │",
            format!(
                "{}  {:<15}: {:>4}",
                "•".color(usage_color(usage)),
                usage.to_string(),
                count(usage)
            )
        );
    }
    println!(" │  {:<48} │", format!("FSF classified     : {}", with_fsf));
    println!(" │  {:<48} │", format!("Fetch failures     : {}", failed.len()));
    println!(" └────────────────────────────────────────────────────┘\n");

    let families = family_summaries(rows);
    let shown = if verbose { families.len() } else { TOP_FAMILIES };
    println!(" {} License families:\n", "[FAMILIES]".cyan().bold());
    render_family_table(&families[..shown.min(families.len())]);
    println!();

    if verbose {
        println!(" {} All licenses:\n", "[LICENSES]".green().bold());
        render_license_table(rows);
        println!();
    }

    print_failures(failed);
    print_written(written);
}

/// Render a colored summary of a freshly built exception dataset.
pub fn render_exceptions(
    rows: &[ExceptionRow],
    written: &[PathBuf],
    failed: &[String],
    verbose: bool,
    quiet: bool,
) {
    let deprecated = rows.iter().filter(|r| r.is_deprecated).count();

    if quiet {
        println!(
            "Exceptions: {}  deprecated: {}  failed: {}",
            rows.len(),
            deprecated,
            failed.len().to_string().red(),
        );
        return;
    }

    print_header();

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Total exceptions   : {}", rows.len()));
    println!(" │  {:<48} │", format!("Deprecated         : {}", deprecated));
    println!(" │  {:<48} │", format!("Fetch failures     : {}", failed.len()));
    println!(" └────────────────────────────────────────────────────┘\n");

    if verbose {
        let mut table = new_table(&["Exception", "Name", "Deprecated"]);
        for row in rows {
            let deprecated = if row.is_deprecated {
                Cell::new("yes").fg(Color::Yellow)
            } else {
                Cell::new("no")
            };
            table.add_row(vec![
                Cell::new(&row.exception_id),
                Cell::new(&row.exception_name),
                deprecated.set_alignment(CellAlignment::Center),
            ]);
        }
        println!("{}\n", table);
    }

    print_failures(failed);
    print_written(written);
}

/// Aggregate view of one license family.
#[derive(Debug, PartialEq)]
pub struct FamilySummary {
    pub family: String,
    pub count: usize,
    pub versions: Vec<String>,
    pub usage: UsageCategory,
}

/// Group rows by license family, largest families first.
///
/// `usage` is the most common category in the family; ties go to the
/// category listed first in the summary box.
pub fn family_summaries(rows: &[LicenseRow]) -> Vec<FamilySummary> {
    let mut groups: HashMap<&str, Vec<&LicenseRow>> = HashMap::new();
    for row in rows {
        let family = row.license_family.as_deref().unwrap_or("(none)");
        groups.entry(family).or_default().push(row);
    }

    let mut summaries: Vec<FamilySummary> = groups
        .into_iter()
        .map(|(family, members)| {
            let versions: BTreeSet<&str> =
                members.iter().filter_map(|r| r.version.as_deref()).collect();

            let mut counts: HashMap<UsageCategory, usize> = HashMap::new();
            for r in &members {
                *counts.entry(r.usage_category).or_insert(0) += 1;
            }
            let usage = USAGE_ORDER
                .iter()
                .copied()
                .enumerate()
                // Negated position so earlier categories win ties.
                .max_by_key(|(i, u)| (counts.get(u).copied().unwrap_or(0), -(*i as isize)))
                .map(|(_, u)| u)
                .unwrap_or(UsageCategory::Other);

            FamilySummary {
                family: family.to_string(),
                count: members.len(),
                versions: versions.into_iter().map(str::to_string).collect(),
                usage,
            }
        })
        .collect();

    summaries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.family.cmp(&b.family)));
    summaries
}

fn usage_counts(rows: &[LicenseRow]) -> HashMap<UsageCategory, usize> {
    let mut counts = HashMap::new();
    for row in rows {
        *counts.entry(row.usage_category).or_insert(0) += 1;
    }
    counts
}

fn render_family_table(families: &[FamilySummary]) {
    let mut table = new_table(&["Family", "Licenses", "Versions", "Usage"]);
    for f in families {
        table.add_row(vec![
            Cell::new(&f.family),
            Cell::new(f.count).set_alignment(CellAlignment::Right),
            Cell::new(f.versions.join(", ")),
            Cell::new(f.usage.to_string()).fg(table_color(f.usage)),
        ]);
    }
    println!("{}", table);
}

fn render_license_table(rows: &[LicenseRow]) {
    let mut table = new_table(&["SPDX ID", "Family", "Version", "Modifier", "Usage", "FSF"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.spdx_id),
            Cell::new(row.license_family.as_deref().unwrap_or("")),
            Cell::new(row.version.as_deref().unwrap_or("")),
            Cell::new(row.version_modifier.map(|m| m.to_string()).unwrap_or_default()),
            Cell::new(row.usage_category.to_string()).fg(table_color(row.usage_category)),
            Cell::new(row.fsf_gpl_compatibility.as_deref().unwrap_or("")),
        ]);
    }
    println!("{}", table);
}

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
    table
}

fn print_header() {
    println!("\n {} v{}\n", "spdx-dataset".bold(), env!("CARGO_PKG_VERSION"));
}

fn print_failures(failed: &[String]) {
    if failed.is_empty() {
        return;
    }
    println!(
        " {} Details unavailable for {} entries: {}\n",
        "[WARN]".yellow().bold(),
        failed.len(),
        failed.join(", ")
    );
}

fn print_written(written: &[PathBuf]) {
    for path in written {
        println!(" {} {}", "saved".green(), path.display());
    }
}

fn usage_color(usage: UsageCategory) -> colored::Color {
    match usage {
        UsageCategory::Dataset => colored::Color::Blue,
        UsageCategory::Model => colored::Color::Magenta,
        UsageCategory::Both => colored::Color::Green,
        UsageCategory::Code => colored::Color::Yellow,
        UsageCategory::Other => colored::Color::BrightBlack,
    }
}

fn table_color(usage: UsageCategory) -> Color {
    match usage {
        UsageCategory::Dataset => Color::Blue,
        UsageCategory::Model => Color::Magenta,
        UsageCategory::Both => Color::Green,
        UsageCategory::Code => Color::Yellow,
        UsageCategory::Other => Color::DarkGrey,
    }
}
