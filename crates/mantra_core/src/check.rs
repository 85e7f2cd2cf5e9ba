//! Catalog sweep: which formations can field a selection
//!
//! Each formation check is an independent pure call, so the sweep runs on the
//! rayon pool; results are collected back in catalog order.

use rayon::prelude::*;
use serde::Serialize;

use crate::catalog::{Catalog, Formation};
use crate::config::Settings;
use crate::diagnostics::{diagnose_with, Diagnostic, DiagnosticRules};
use crate::error::Result;
use crate::matcher::{find_assignment, is_feasible, Candidate};
use crate::player::Player;
use crate::roles::RoleSet;
use crate::roster::Roster;

/// One player's place in a witness lineup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedPlayer {
    pub player: String,
    pub slot_index: usize,
    pub slot_roles: RoleSet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompatibleFormation {
    pub formation: String,
    /// One valid placement, in selection order
    pub lineup: Vec<PlacedPlayer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormationReport {
    pub player_count: usize,
    pub formations_checked: usize,
    pub compatible: Vec<CompatibleFormation>,
    /// Filled only when `compatible` is empty
    pub diagnostics: Vec<Diagnostic>,
}

impl FormationReport {
    pub fn is_compatible(&self) -> bool {
        !self.compatible.is_empty()
    }

    pub fn formation_names(&self) -> Vec<&str> {
        self.compatible.iter().map(|c| c.formation.as_str()).collect()
    }
}

/// Names of the formations that can field every player, in catalog order
pub fn feasible_formations<'c, P>(players: &[P], catalog: &'c Catalog) -> Vec<&'c str>
where
    P: Candidate + Sync,
{
    catalog
        .formations()
        .par_iter()
        .filter(|formation| is_feasible(players, formation.slots()))
        .map(|formation| formation.name())
        .collect()
}

/// Full check of a selection against a catalog.
///
/// Returns a witness lineup for every compatible formation; when none is
/// compatible the diagnostics explain the most likely causes.
pub fn check_selection(
    players: &[Player],
    catalog: &Catalog,
    rules: &DiagnosticRules,
) -> FormationReport {
    let compatible: Vec<CompatibleFormation> = catalog
        .formations()
        .par_iter()
        .filter_map(|formation| {
            let lineup = witness_lineup(players, formation);
            tracing::debug!(
                formation = formation.name(),
                compatible = lineup.is_some(),
                "checked formation"
            );
            lineup.map(|lineup| CompatibleFormation {
                formation: formation.name().to_string(),
                lineup,
            })
        })
        .collect();

    let diagnostics = if compatible.is_empty() {
        diagnose_with(players, rules)
    } else {
        Vec::new()
    };

    tracing::info!(
        players = players.len(),
        compatible = compatible.len(),
        checked = catalog.len(),
        "formation check complete"
    );

    FormationReport {
        player_count: players.len(),
        formations_checked: catalog.len(),
        compatible,
        diagnostics,
    }
}

/// Select `names` from the roster and check them with the given settings
pub fn check_roster<S: AsRef<str>>(
    roster: &Roster,
    names: &[S],
    settings: &Settings,
) -> Result<FormationReport> {
    let players = roster.select(names)?;
    Ok(check_selection(&players, &settings.catalog, &settings.rules))
}

fn witness_lineup(players: &[Player], formation: &Formation) -> Option<Vec<PlacedPlayer>> {
    let assignment = find_assignment(players, formation.slots())?;
    Some(
        assignment
            .pairs()
            .map(|(player_index, slot_index)| PlacedPlayer {
                player: players[player_index].name().to_string(),
                slot_index,
                slot_roles: formation.slots()[slot_index],
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;

    fn lineup(rows: &[(&str, &str)]) -> Vec<Player> {
        rows.iter().map(|(name, roles)| Player::parse(name, roles).unwrap()).collect()
    }

    fn full_343_eleven() -> Vec<Player> {
        lineup(&[
            ("Sommer", "Por"),
            ("Pavard", "Dc"),
            ("Acerbi", "Dc"),
            ("Bastoni", "Dc"),
            ("Dumfries", "E"),
            ("Calhanoglu", "M;C"),
            ("Barella", "C"),
            ("Dimarco", "E"),
            ("Leao", "W;A"),
            ("Lautaro", "Pc;A"),
            ("Kvara", "W;A"),
        ])
    }

    #[test]
    fn test_full_343_eleven() {
        let players = full_343_eleven();
        let report = check_selection(&players, Catalog::builtin(), &DiagnosticRules::default());

        assert!(report.is_compatible());
        assert_eq!(report.formation_names(), vec!["3-4-3"]);
        assert!(report.diagnostics.is_empty());
        assert_eq!(report.formations_checked, 11);

        let placed = &report.compatible[0].lineup;
        assert_eq!(placed.len(), 11);
        assert_eq!(placed[0].player, "Sommer");
        assert_eq!(placed[0].slot_index, 0);
        for p in placed {
            let player = players.iter().find(|x| x.name() == p.player).unwrap();
            assert!(player.roles().intersects(p.slot_roles));
        }
    }

    #[test]
    fn test_feasible_formations_matches_report() {
        let players = lineup(&[("Sommer", "Por"), ("Bastoni", "Dc;B"), ("Barella", "C")]);
        let names = feasible_formations(&players, Catalog::builtin());
        assert_eq!(names, Catalog::builtin().names());

        let report = check_selection(&players, Catalog::builtin(), &DiagnosticRules::default());
        assert_eq!(report.formation_names(), names);
    }

    #[test]
    fn test_partial_selection_only_three_back() {
        let players = lineup(&[("Bastoni", "B"), ("Acerbi", "Dc")]);
        let names = feasible_formations(&players, Catalog::builtin());
        assert_eq!(names, vec!["3-4-3", "3-4-1-2", "3-4-2-1", "3-5-2", "3-5-1-1"]);
    }

    #[test]
    fn test_overflow_yields_diagnostics() {
        let mut players = full_343_eleven();
        players[8] = Player::parse("Retegui", "Pc").unwrap();
        players[9] = Player::parse("Kean", "Pc").unwrap();
        players[10] = Player::parse("Lucca", "Pc").unwrap();

        let report = check_selection(&players, Catalog::builtin(), &DiagnosticRules::default());
        assert!(!report.is_compatible());
        assert!(report.diagnostics.iter().any(|d| d.kind
            == DiagnosticKind::PureStrikerOverflow { found: 3, limit: 2 }));
    }

    #[test]
    fn test_check_roster_selects_then_checks() {
        let roster = Roster::from_players(full_343_eleven()).unwrap();
        let settings = crate::config::MantraConfig::default().resolve().unwrap();

        let report = check_roster(&roster, &["sommer", "LEAO"], &settings).unwrap();
        assert_eq!(report.player_count, 2);
        assert_eq!(report.formation_names(), Catalog::builtin().names());

        let err = check_roster(&roster, &["Sommer", "Ronaldo"], &settings).unwrap_err();
        assert_eq!(err.to_string(), "Player not found: Ronaldo");
    }

    #[test]
    fn test_restricted_catalog() {
        let players = full_343_eleven();
        let catalog = Catalog::builtin().subset(&["4-4-2"]).unwrap();
        let report = check_selection(&players, &catalog, &DiagnosticRules::default());
        assert!(!report.is_compatible());
        assert_eq!(report.formations_checked, 1);
        assert!(!report.diagnostics.is_empty());
    }
}
