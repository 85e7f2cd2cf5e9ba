//! Spreadsheet roster import
//!
//! Accepts the usual fantasy-league exports: a name column and a role column
//! whose cell holds one or more role codes (`Dc;B`, `E/W`, `M, C`).
//! Headers are recognized by name in Italian or English; without a header the
//! first two columns are taken as name and roles. The delimiter is sniffed from
//! the first line unless given.

use anyhow::{Context, Result};
use mantra_core::{Player, Roster, RosterError};
use std::fs;
use std::path::Path;

const NAME_HEADERS: [&str; 5] = ["nome", "name", "giocatore", "player", "calciatore"];
const ROLE_HEADERS: [&str; 4] = ["ruoli", "ruolo", "roles", "role"];
const DELIMITERS: [u8; 3] = [b',', b';', b'\t'];

/// CSV import statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub total_rows: u32,
    pub imported: u32,
    /// Rows with a blank name or unusable roles
    pub failed: u32,
    pub duplicates: u32,
    pub blank_rows: u32,
    pub header_detected: bool,
    pub delimiter: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    name: usize,
    roles: usize,
}

impl Default for Columns {
    fn default() -> Self {
        Self { name: 0, roles: 1 }
    }
}

/// Pick the candidate delimiter occurring most often in `line` (`,` on ties)
pub fn sniff_delimiter(line: &str) -> u8 {
    let mut best = b',';
    let mut best_count = 0;
    for delimiter in DELIMITERS {
        let count = line.bytes().filter(|b| *b == delimiter).count();
        if count > best_count {
            best = delimiter;
            best_count = count;
        }
    }
    best
}

fn header_columns(record: &csv::StringRecord) -> Option<Columns> {
    let position = |names: &[&str]| {
        record
            .iter()
            .position(|field| names.contains(&field.trim().to_lowercase().as_str()))
    };
    Some(Columns {
        name: position(&NAME_HEADERS)?,
        roles: position(&ROLE_HEADERS)?,
    })
}

/// Parse a roster CSV file
///
/// # Arguments
///
/// * `csv_path` - spreadsheet export
/// * `delimiter` - field separator, sniffed from the first line when `None`
///
/// # Returns
///
/// * `Ok((Roster, ImportStats))` - every valid row, plus counts of what was dropped
/// * `Err(anyhow::Error)` - the file could not be read or is not CSV
pub fn parse_roster_csv(csv_path: &Path, delimiter: Option<u8>) -> Result<(Roster, ImportStats)> {
    let text = fs::read_to_string(csv_path)
        .with_context(|| format!("Failed to read CSV file: {}", csv_path.display()))?;
    parse_roster_text(&text, delimiter)
        .with_context(|| format!("Failed to parse CSV file: {}", csv_path.display()))
}

/// Parse roster CSV content already in memory
pub fn parse_roster_text(text: &str, delimiter: Option<u8>) -> Result<(Roster, ImportStats)> {
    let text = text.trim_start_matches('\u{feff}');
    let delimiter = delimiter.unwrap_or_else(|| {
        sniff_delimiter(text.lines().find(|l| !l.trim().is_empty()).unwrap_or(""))
    });

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(delimiter)
        .from_reader(text.as_bytes());

    let mut roster = Roster::new();
    let mut stats = ImportStats {
        delimiter,
        ..Default::default()
    };
    let mut columns = Columns::default();
    let mut first = true;

    for record in reader.records() {
        let record = record.context("Malformed CSV record")?;
        let line = record.position().map_or(0, |p| p.line());

        if record.iter().all(|field| field.is_empty()) {
            stats.blank_rows += 1;
            continue;
        }

        if first {
            first = false;
            if let Some(found) = header_columns(&record) {
                columns = found;
                stats.header_detected = true;
                continue;
            }
        }

        stats.total_rows += 1;

        let name = record.get(columns.name).unwrap_or("");
        let roles = record.get(columns.roles).unwrap_or("");
        if name.is_empty() {
            stats.failed += 1;
            tracing::warn!(line, "skipping row without a player name");
            continue;
        }

        let player = match Player::parse(name, roles) {
            Ok(player) => player,
            Err(e) => {
                stats.failed += 1;
                tracing::warn!(line, error = %e, "skipping invalid player row");
                continue;
            }
        };

        match roster.add(player) {
            Ok(()) => stats.imported += 1,
            Err(RosterError::Duplicate(name)) => {
                stats.duplicates += 1;
                tracing::warn!(line, player = %name, "skipping duplicate player");
            }
            Err(e) => return Err(e.into()),
        }
    }

    tracing::info!(
        imported = stats.imported,
        failed = stats.failed,
        duplicates = stats.duplicates,
        "roster import finished"
    );

    Ok((roster, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mantra_core::{Role, RoleSet};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(content: &str) -> Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        file.write_all(content.as_bytes())?;
        Ok(file)
    }

    #[test]
    fn test_italian_header_semicolon() -> Result<()> {
        // quoted cell keeps the inner semicolon as a role separator
        let file = csv_file(
            "Ruolo;Nome;Squadra\nPor;Sommer;Inter\n\"Dc;B\";Bastoni;Inter\nE;Dimarco;Inter\n",
        )?;
        let (roster, stats) = parse_roster_csv(file.path(), None)?;

        assert!(stats.header_detected);
        assert_eq!(stats.delimiter, b';');
        assert_eq!(stats.imported, 3);
        assert_eq!(roster.sorted_names(), vec!["Bastoni", "Dimarco", "Sommer"]);
        assert_eq!(
            roster.get("bastoni").map(|p| p.roles()),
            Some(RoleSet::from([Role::CenterBack, Role::FlexBack]))
        );
        Ok(())
    }

    #[test]
    fn test_headerless_comma_file() -> Result<()> {
        let (roster, stats) = parse_roster_text("Lautaro,Pc;A\nBarella,C\n", None)?;
        assert!(!stats.header_detected);
        assert_eq!(stats.delimiter, b',');
        assert_eq!(roster.len(), 2);
        assert!(roster.get("Lautaro").is_some_and(|p| p.roles().contains(Role::Forward)));
        Ok(())
    }

    #[test]
    fn test_bad_rows_are_counted_not_fatal() -> Result<()> {
        let text = "name,roles\nSommer,Por\n,C\nGhost,Zz\nsommer,Por\n , \nNoRoles,\nBarella,C\n";
        let (roster, stats) = parse_roster_text(text, None)?;

        assert_eq!(stats.total_rows, 6);
        assert_eq!(stats.imported, 2);
        assert_eq!(stats.failed, 3);
        assert_eq!(stats.duplicates, 1);
        assert_eq!(stats.blank_rows, 1);
        assert_eq!(roster.len(), 2);
        Ok(())
    }

    #[test]
    fn test_free_form_names_are_imported() -> Result<()> {
        let text = "nome;ruoli\nKvara_77;W/A\nLautaro (C);Pc/A\nSmith & Co;C\n";
        let (roster, stats) = parse_roster_text(text, None)?;

        assert_eq!(stats.failed, 0);
        assert_eq!(roster.sorted_names(), vec!["Kvara_77", "Lautaro (C)", "Smith & Co"]);
        Ok(())
    }

    #[test]
    fn test_explicit_tab_delimiter() -> Result<()> {
        let (roster, stats) = parse_roster_text("player\trole\nKvara\tW/A\n", Some(b'\t'))?;
        assert!(stats.header_detected);
        assert_eq!(roster.len(), 1);
        Ok(())
    }

    #[test]
    fn test_sniff_delimiter() {
        assert_eq!(sniff_delimiter("a;b;c"), b';');
        assert_eq!(sniff_delimiter("a\tb"), b'\t');
        assert_eq!(sniff_delimiter("a,b;c,d"), b',');
        assert_eq!(sniff_delimiter("single"), b',');
    }

    #[test]
    fn test_missing_file() {
        let err = parse_roster_csv(Path::new("/nonexistent/rosa.csv"), None).unwrap_err();
        assert!(err.to_string().contains("Failed to read CSV file"));
    }
}
