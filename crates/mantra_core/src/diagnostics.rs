//! Failure explanations when no formation fits
//!
//! Independent heuristic counters over the selected players. They never
//! re-run the matcher, so cost does not depend on the catalog size. Results
//! are advisory: a reported overflow is a likely cause, not a proof.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Formation, FORMATION_SIZE};
use crate::matcher::Candidate;
use crate::roles::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// The condition alone rules out every formation
    Error,
    /// Congestion worth knowing about; may or may not be the cause
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    TooManyGoalkeepers { found: usize, limit: usize },
    MissingGoalkeeper { selected: usize },
    TooFewDefenders {
        found: usize,
        required: usize,
        selected: usize,
    },
    FlexBackOverflow { found: usize, limit: usize },
    PureStrikerOverflow { found: usize, limit: usize },
    WideCongestion { found: usize, limit: usize },
    RoleConflict,
}

impl DiagnosticKind {
    pub fn severity(&self) -> Severity {
        match self {
            DiagnosticKind::WideCongestion { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DiagnosticKind::TooManyGoalkeepers { found, limit } => write!(
                f,
                "Too many goalkeepers: {found} players hold Por, \
                 every formation fields at most {limit}"
            ),
            DiagnosticKind::MissingGoalkeeper { selected } => write!(
                f,
                "Missing goalkeeper: {selected} players selected but none holds Por"
            ),
            DiagnosticKind::TooFewDefenders {
                found,
                required,
                selected,
            } => write!(
                f,
                "Not enough defenders: {found} of {selected} players hold Dd, Ds, Dc or B, \
                 every formation needs at least {required}"
            ),
            DiagnosticKind::FlexBackOverflow { found, limit } => write!(
                f,
                "Flexible-back problem: {found} players are B only, \
                 three-back lines accept at most {limit} (the others must be Dc)"
            ),
            DiagnosticKind::PureStrikerOverflow { found, limit } => write!(
                f,
                "Too many pure strikers: {found} players are Pc only, \
                 formations accept at most {limit}"
            ),
            DiagnosticKind::WideCongestion { found, limit } => write!(
                f,
                "Crowded flanks: {found} players hold E or W, \
                 no formation has more than {limit} wide slots"
            ),
            DiagnosticKind::RoleConflict => write!(
                f,
                "Roles conflict: no formation accommodates this combination \
                 (probably too many players who can only fill the same slots)"
            ),
        }
    }
}

/// One ranked finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    #[serde(flatten)]
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
}

impl From<DiagnosticKind> for Diagnostic {
    fn from(kind: DiagnosticKind) -> Self {
        Diagnostic {
            severity: kind.severity(),
            message: kind.to_string(),
            kind,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Thresholds used by the counters.
///
/// `Default` matches the Mantra 2025/26 table; [`DiagnosticRules::from_catalog`]
/// derives the same numbers from any catalog's slot shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticRules {
    pub max_goalkeepers: usize,
    pub min_defenders: usize,
    /// Defender shortage is only reported from this many selected players up
    pub defender_check_squad_size: usize,
    pub max_pure_flex: usize,
    pub max_pure_strikers: usize,
    pub max_wide: usize,
}

impl Default for DiagnosticRules {
    fn default() -> Self {
        Self {
            max_goalkeepers: 1,
            min_defenders: 3,
            defender_check_squad_size: 9,
            max_pure_flex: 1,
            max_pure_strikers: 2,
            max_wide: 4,
        }
    }
}

impl DiagnosticRules {
    /// Limits implied by the catalog: the most slots any formation offers to
    /// a pure role, and the fewest defensive slots any formation has.
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            max_goalkeepers: most_slots(catalog, |f| f.slots_accepting(Role::Goalkeeper)),
            min_defenders: catalog
                .formations()
                .iter()
                .map(|f| f.slots_accepting_any(|r| r.is_defender()))
                .min()
                .unwrap_or(0),
            defender_check_squad_size: Self::default().defender_check_squad_size,
            max_pure_flex: most_slots(catalog, |f| f.slots_accepting(Role::FlexBack)),
            max_pure_strikers: most_slots(catalog, |f| f.slots_accepting(Role::CenterForward)),
            max_wide: most_slots(catalog, |f| f.slots_accepting_any(|r| r.is_wide())),
        }
    }
}

fn most_slots(catalog: &Catalog, count: impl Fn(&Formation) -> usize) -> usize {
    catalog.formations().iter().map(count).max().unwrap_or(0)
}

/// Role tallies over a selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RoleCounts {
    pub selected: usize,
    pub goalkeepers: usize,
    pub defenders: usize,
    pub pure_flex: usize,
    pub pure_strikers: usize,
    pub wide: usize,
}

impl RoleCounts {
    pub fn tally<P: Candidate>(players: &[P]) -> Self {
        let mut counts = RoleCounts {
            selected: players.len(),
            ..Default::default()
        };

        for roles in players.iter().map(|p| p.roles()) {
            if roles.contains(Role::Goalkeeper) {
                counts.goalkeepers += 1;
            }
            if roles.has_defender() {
                counts.defenders += 1;
            }
            if roles.is_exactly(Role::FlexBack) {
                counts.pure_flex += 1;
            }
            if roles.is_exactly(Role::CenterForward) {
                counts.pure_strikers += 1;
            }
            if roles.has_wide() {
                counts.wide += 1;
            }
        }

        counts
    }
}

/// Explain a selection that no formation accepts, using default thresholds
pub fn diagnose<P: Candidate>(players: &[P]) -> Vec<Diagnostic> {
    diagnose_with(players, &DiagnosticRules::default())
}

/// Run every counter and return findings ranked errors-first.
///
/// When no check fires at all the generic role-conflict message is returned,
/// so the result is never empty.
pub fn diagnose_with<P: Candidate>(players: &[P], rules: &DiagnosticRules) -> Vec<Diagnostic> {
    let counts = RoleCounts::tally(players);
    let mut findings: Vec<Diagnostic> = Vec::new();

    if counts.goalkeepers > rules.max_goalkeepers {
        findings.push(
            DiagnosticKind::TooManyGoalkeepers {
                found: counts.goalkeepers,
                limit: rules.max_goalkeepers,
            }
            .into(),
        );
    } else if counts.goalkeepers == 0 && counts.selected >= FORMATION_SIZE {
        findings.push(
            DiagnosticKind::MissingGoalkeeper {
                selected: counts.selected,
            }
            .into(),
        );
    }

    if counts.selected >= rules.defender_check_squad_size && counts.defenders < rules.min_defenders
    {
        findings.push(
            DiagnosticKind::TooFewDefenders {
                found: counts.defenders,
                required: rules.min_defenders,
                selected: counts.selected,
            }
            .into(),
        );
    }

    if counts.pure_flex > rules.max_pure_flex {
        findings.push(
            DiagnosticKind::FlexBackOverflow {
                found: counts.pure_flex,
                limit: rules.max_pure_flex,
            }
            .into(),
        );
    }

    if counts.pure_strikers > rules.max_pure_strikers {
        findings.push(
            DiagnosticKind::PureStrikerOverflow {
                found: counts.pure_strikers,
                limit: rules.max_pure_strikers,
            }
            .into(),
        );
    }

    if counts.wide > rules.max_wide {
        findings.push(
            DiagnosticKind::WideCongestion {
                found: counts.wide,
                limit: rules.max_wide,
            }
            .into(),
        );
    }

    if findings.is_empty() {
        findings.push(DiagnosticKind::RoleConflict.into());
    }

    // stable: keeps check order within a severity
    findings.sort_by_key(|d| d.severity);
    tracing::debug!(?counts, findings = findings.len(), "diagnosed infeasible selection");
    findings
}
