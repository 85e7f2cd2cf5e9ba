//! Mantra CLI library
//!
//! Roster file handling and text rendering for the `mantra` binary.
//! Rosters live in JSON; CSV spreadsheet exports can be read directly or
//! converted with `mantra import`.

pub mod import;

use anyhow::{Context, Result};
use mantra_core::{Catalog, FormationReport, Roster, Severity};
use std::fmt::Write as _;
use std::path::Path;

pub use import::{parse_roster_csv, parse_roster_text, sniff_delimiter, ImportStats};

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Load a roster from `.json` or `.csv`
pub fn load_roster(path: &Path) -> Result<Roster> {
    if is_csv(path) {
        let (roster, stats) = parse_roster_csv(path, None)?;
        if stats.failed + stats.duplicates > 0 {
            tracing::warn!(
                failed = stats.failed,
                duplicates = stats.duplicates,
                "some roster rows were skipped"
            );
        }
        return Ok(roster);
    }

    Roster::load_json(path).with_context(|| format!("Failed to load roster: {}", path.display()))
}

/// Like [`load_roster`], but a missing file is an empty roster
pub fn load_roster_or_default(path: &Path) -> Result<Roster> {
    if path.exists() {
        load_roster(path)
    } else {
        Ok(Roster::new())
    }
}

pub fn save_roster(roster: &Roster, path: &Path) -> Result<()> {
    if is_csv(path) {
        anyhow::bail!("Rosters are saved as JSON; use a .json path instead of {}", path.display());
    }
    roster
        .save_json(path)
        .with_context(|| format!("Failed to save roster: {}", path.display()))
}

/// Split a `--players "A, B,C"` argument into names
pub fn split_names(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn render_catalog(catalog: &Catalog) -> String {
    let mut out = String::new();
    for (name, slots) in catalog.list_formations() {
        let slots: Vec<String> = slots.iter().map(|slot| format!("[{slot}]")).collect();
        let _ = writeln!(out, "{name:<9} {}", slots.join(" "));
    }
    out
}

pub fn render_roster(roster: &Roster) -> String {
    let mut out = String::new();
    for name in roster.sorted_names() {
        if let Some(player) = roster.get(name) {
            let _ = writeln!(out, "{player}");
        }
    }
    let _ = writeln!(out, "{} players", roster.len());
    out
}

pub fn render_report(report: &FormationReport) -> String {
    let mut out = String::new();

    if report.is_compatible() {
        let _ = writeln!(
            out,
            "{} of {} formations fit {} players:",
            report.compatible.len(),
            report.formations_checked,
            report.player_count
        );
        for formation in &report.compatible {
            let _ = writeln!(out, "\n  {}", formation.formation);
            for placed in &formation.lineup {
                let _ = writeln!(
                    out,
                    "    {:>2}  [{}]  {}",
                    placed.slot_index + 1,
                    placed.slot_roles,
                    placed.player
                );
            }
        }
        return out;
    }

    let _ = writeln!(
        out,
        "No formation fits these {} players ({} checked).",
        report.player_count, report.formations_checked
    );
    for diagnostic in &report.diagnostics {
        let tag = match diagnostic.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        let _ = writeln!(out, "  {tag}: {}", diagnostic.message);
    }
    out
}
