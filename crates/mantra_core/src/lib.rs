//! # mantra_core - Mantra formation feasibility checker
//!
//! Decides which fantasy-football Mantra formations can field a selection of
//! up to eleven players, where each player is eligible for a set of roles and
//! each formation slot accepts a set of roles.
//!
//! ## Features
//! - Embedded Mantra formation catalog (replaceable through config)
//! - Exact backtracking matcher with a witness lineup per formation
//! - Heuristic diagnostics when no formation fits
//! - JSON API for front-ends

pub mod api;
pub mod catalog;
pub mod check;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod matcher;
pub mod player;
pub mod roles;
pub mod roster;

pub use api::{check_formations_json, check_request_schema, CheckRequest, CheckResponse};
pub use catalog::{Catalog, CatalogError, Formation, Slot, FORMATION_SIZE};
pub use check::{
    check_roster, check_selection, feasible_formations, CompatibleFormation, FormationReport,
    PlacedPlayer,
};
pub use config::{ConfigError, MantraConfig, RuleOverrides, Settings, CONFIG_PATH_ENV};
pub use diagnostics::{
    diagnose, diagnose_with, Diagnostic, DiagnosticKind, DiagnosticRules, Severity,
};
pub use error::{MantraError, Result};
pub use matcher::{find_assignment, is_feasible, Assignment, Candidate};
pub use player::{Player, PlayerError};
pub use roles::{parse_role_list, Role, RoleError, RoleSet};
pub use roster::{Roster, RosterError};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;
