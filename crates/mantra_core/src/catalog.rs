//! Formation Catalog - Mantra formation table
//!
//! The official table ships as YAML embedded at compile time and is parsed
//! once into a static catalog. Alternative tables can be loaded from disk;
//! every load goes through the same validation.
//!
//! ## 사용법
//!
//! ```rust
//! use mantra_core::catalog::Catalog;
//!
//! let catalog = Catalog::builtin();
//! for (name, slots) in catalog.list_formations() {
//!     println!("{name}: {} slots", slots.len());
//! }
//! ```

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::roles::{Role, RoleSet};

/// One formation position: the roles it accepts
pub type Slot = RoleSet;

/// Players per formation (one full team)
pub const FORMATION_SIZE: usize = 11;

/// Mantra 2025/26 table (컴파일 타임 임베딩)
pub const MANTRA_2025_YAML: &str = include_str!("../../../data/formations/mantra_2025.yaml");

static BUILTIN_CATALOG: OnceLock<Catalog> = OnceLock::new();

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to parse catalog YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Catalog has no formations")]
    Empty,

    #[error("Formation name cannot be empty")]
    UnnamedFormation,

    #[error("Duplicate formation: {0}")]
    DuplicateFormation(String),

    #[error("Formation {formation} has {found} slots, expected {expected}")]
    SlotCount {
        formation: String,
        found: usize,
        expected: usize,
    },

    #[error("Formation {formation} slot {index} accepts no roles")]
    EmptySlot { formation: String, index: usize },

    #[error("Unknown formation: {0}")]
    UnknownFormation(String),
}

/// A named tactical shape: exactly 11 slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Formation {
    name: String,
    slots: Vec<Slot>,
}

impl Formation {
    pub fn new(name: impl Into<String>, slots: Vec<Slot>) -> Result<Self, CatalogError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(CatalogError::UnnamedFormation);
        }

        if slots.len() != FORMATION_SIZE {
            return Err(CatalogError::SlotCount {
                formation: name,
                found: slots.len(),
                expected: FORMATION_SIZE,
            });
        }

        if let Some(index) = slots.iter().position(|slot| slot.is_empty()) {
            return Err(CatalogError::EmptySlot {
                formation: name,
                index,
            });
        }

        Ok(Self { name, slots })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Number of slots that accept `role`
    pub fn slots_accepting(&self, role: Role) -> usize {
        self.slots.iter().filter(|slot| slot.contains(role)).count()
    }

    /// Number of slots accepting at least one role matching `pred`
    pub fn slots_accepting_any(&self, pred: impl Fn(Role) -> bool) -> usize {
        self.slots.iter().filter(|slot| slot.iter().any(&pred)).count()
    }

    /// Three-man defensive line (3-x-x formations)
    pub fn is_three_back(&self) -> bool {
        self.slots_accepting_any(|r| r.is_defender()) == 3
    }
}

/// Ordered, read-only formation collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Catalog {
    formations: Vec<Formation>,
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    formations: Vec<FormationRecord>,
}

#[derive(Debug, Deserialize)]
struct FormationRecord {
    name: String,
    slots: Vec<RoleSet>,
}

impl Catalog {
    /// Validate and wrap a formation list; names must be unique.
    pub fn new(formations: Vec<Formation>) -> Result<Self, CatalogError> {
        if formations.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for formation in &formations {
            if !seen.insert(formation.name.clone()) {
                return Err(CatalogError::DuplicateFormation(formation.name.clone()));
            }
        }

        Ok(Self { formations })
    }

    /// Official Mantra 2025/26 catalog.
    ///
    /// 최초 호출 시 YAML 파싱, 이후 캐시된 데이터 반환.
    ///
    /// # Panics
    ///
    /// Panics if the embedded table fails validation (a build defect, never a
    /// runtime condition).
    pub fn builtin() -> &'static Catalog {
        BUILTIN_CATALOG.get_or_init(|| {
            let catalog = Catalog::from_yaml_str(MANTRA_2025_YAML)
                .expect("Failed to parse embedded mantra_2025.yaml");
            tracing::debug!(formations = catalog.len(), "loaded builtin formation catalog");
            catalog
        })
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_yaml::from_str(yaml)?;
        let formations = file
            .formations
            .into_iter()
            .map(|record| Formation::new(record.name, record.slots))
            .collect::<Result<Vec<_>, _>>()?;
        Catalog::new(formations)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let yaml = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_yaml_str(&yaml)?;
        tracing::info!(
            path = %path.display(),
            formations = catalog.len(),
            "loaded formation catalog"
        );
        Ok(catalog)
    }

    /// `(name, slots)` pairs in table order
    pub fn list_formations(&self) -> impl Iterator<Item = (&str, &[Slot])> + '_ {
        self.formations.iter().map(|f| (f.name(), f.slots()))
    }

    pub fn formations(&self) -> &[Formation] {
        &self.formations
    }

    pub fn names(&self) -> Vec<&str> {
        self.formations.iter().map(|f| f.name()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Formation> {
        let name = name.trim();
        self.formations.iter().find(|f| f.name == name)
    }

    /// Restrict to the named formations, keeping catalog order
    pub fn subset<S: AsRef<str>>(&self, names: &[S]) -> Result<Catalog, CatalogError> {
        for name in names {
            if self.get(name.as_ref()).is_none() {
                return Err(CatalogError::UnknownFormation(name.as_ref().trim().to_string()));
            }
        }

        let formations = self
            .formations
            .iter()
            .filter(|f| names.iter().any(|n| n.as_ref().trim() == f.name))
            .cloned()
            .collect();
        Catalog::new(formations)
    }

    pub fn len(&self) -> usize {
        self.formations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formations.is_empty()
    }
}
