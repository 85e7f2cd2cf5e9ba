//! Configuration: catalog override and diagnostic thresholds
//!
//! ```yaml
//! catalog: formations/custom.yaml   # relative to this file
//! rules:
//!   max_pure_strikers: 2
//!   defender_check_squad_size: 10
//! ```
//!
//! `MANTRA_CONFIG_PATH` names the file when no explicit path is given.

use std::path::{Path, PathBuf};
use std::{env, fs};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, CatalogError, FORMATION_SIZE};
use crate::diagnostics::DiagnosticRules;

pub const CONFIG_PATH_ENV: &str = "MANTRA_CONFIG_PATH";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid rule {name}: {value} (must be between {min} and {max})")]
    InvalidRule {
        name: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Partial threshold overrides; unset fields keep the catalog-derived value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuleOverrides {
    pub max_goalkeepers: Option<usize>,
    pub min_defenders: Option<usize>,
    pub defender_check_squad_size: Option<usize>,
    pub max_pure_flex: Option<usize>,
    pub max_pure_strikers: Option<usize>,
    pub max_wide: Option<usize>,
}

impl RuleOverrides {
    pub fn apply(&self, base: DiagnosticRules) -> Result<DiagnosticRules, ConfigError> {
        let pick = |name: &'static str, value: Option<usize>, fallback: usize, min: usize| {
            let value = value.unwrap_or(fallback);
            if (min..=FORMATION_SIZE).contains(&value) {
                Ok(value)
            } else {
                Err(ConfigError::InvalidRule {
                    name,
                    value,
                    min,
                    max: FORMATION_SIZE,
                })
            }
        };

        Ok(DiagnosticRules {
            max_goalkeepers: pick(
                "max_goalkeepers",
                self.max_goalkeepers,
                base.max_goalkeepers,
                0,
            )?,
            min_defenders: pick("min_defenders", self.min_defenders, base.min_defenders, 0)?,
            defender_check_squad_size: pick(
                "defender_check_squad_size",
                self.defender_check_squad_size,
                base.defender_check_squad_size,
                1,
            )?,
            max_pure_flex: pick("max_pure_flex", self.max_pure_flex, base.max_pure_flex, 0)?,
            max_pure_strikers: pick(
                "max_pure_strikers",
                self.max_pure_strikers,
                base.max_pure_strikers,
                0,
            )?,
            max_wide: pick("max_wide", self.max_wide, base.max_wide, 0)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MantraConfig {
    /// Alternative formation table (YAML)
    pub catalog: Option<PathBuf>,
    pub rules: RuleOverrides,
    /// Directory relative catalog paths resolve against
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

/// Catalog and thresholds ready for a check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub catalog: Catalog,
    pub rules: DiagnosticRules,
}

impl MantraConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let yaml = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml_str(&yaml).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.base_dir = path.parent().map(Path::to_path_buf);
        tracing::info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Config named by `MANTRA_CONFIG_PATH`, or defaults when unset or blank
    pub fn from_env() -> Result<Self, ConfigError> {
        let Ok(path) = env::var(CONFIG_PATH_ENV) else {
            return Ok(Self::default());
        };

        let path = path.trim();
        if path.is_empty() {
            return Ok(Self::default());
        }

        Self::load(Path::new(path))
    }

    /// Explicit path wins over the environment
    pub fn load_or_env(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Self::from_env(),
        }
    }

    pub fn catalog_path(&self) -> Option<PathBuf> {
        let path = self.catalog.as_ref()?;
        Some(match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.clone(),
        })
    }

    /// Load the catalog (builtin unless overridden) and derive the thresholds
    pub fn resolve(&self) -> Result<Settings, ConfigError> {
        let catalog = match self.catalog_path() {
            Some(path) => Catalog::load(&path)?,
            None => Catalog::builtin().clone(),
        };
        let rules = self.rules.apply(DiagnosticRules::from_catalog(&catalog))?;
        Ok(Settings { catalog, rules })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MANTRA_2025_YAML;
    use tempfile::tempdir;

    #[test]
    fn test_default_resolves_builtin() {
        let settings = MantraConfig::default().resolve().unwrap();
        assert_eq!(&settings.catalog, Catalog::builtin());
        assert_eq!(settings.rules, DiagnosticRules::default());
    }

    #[test]
    fn test_overrides_apply_on_top_of_derived_rules() {
        let config = MantraConfig::from_yaml_str("rules:\n  max_pure_strikers: 3\n").unwrap();
        let settings = config.resolve().unwrap();
        assert_eq!(settings.rules.max_pure_strikers, 3);
        assert_eq!(settings.rules.max_pure_flex, 1);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let overrides = RuleOverrides {
            defender_check_squad_size: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            overrides.apply(DiagnosticRules::default()),
            Err(ConfigError::InvalidRule {
                name: "defender_check_squad_size",
                value: 0,
                ..
            })
        ));

        let overrides = RuleOverrides {
            max_wide: Some(12),
            ..Default::default()
        };
        assert!(overrides.apply(DiagnosticRules::default()).is_err());
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(MantraConfig::from_yaml_str("catalogue: x.yaml\n").is_err());
        assert!(MantraConfig::from_yaml_str("rules:\n  max_keepers: 2\n").is_err());
    }

    #[test]
    fn test_relative_catalog_resolves_against_config_dir() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("tables")).unwrap();

        let three_back_only = MANTRA_2025_YAML
            .split("\n  - name: \"3-4-1-2\"")
            .next()
            .unwrap()
            .to_string();
        fs::write(dir.path().join("tables/only343.yaml"), three_back_only).unwrap();

        let config_path = dir.path().join("mantra.yaml");
        fs::write(&config_path, "catalog: tables/only343.yaml\n").unwrap();

        let config = MantraConfig::load(&config_path).unwrap();
        assert_eq!(config.catalog_path(), Some(dir.path().join("tables/only343.yaml")));

        let settings = config.resolve().unwrap();
        assert_eq!(settings.catalog.names(), vec!["3-4-3"]);
        // derived from the single 3-4-3: one Pc-capable slot, four wide slots
        assert_eq!(settings.rules.max_pure_strikers, 1);
        assert_eq!(settings.rules.max_wide, 4);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = MantraConfig::load(Path::new("/nonexistent/mantra.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
