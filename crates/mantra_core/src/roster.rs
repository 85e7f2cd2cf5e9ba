//! Caller-owned roster and starting-eleven selection
//!
//! The roster is a plain value: whoever drives the checks owns it and passes
//! snapshots (`select`) into the matcher. Nothing here is global.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::FORMATION_SIZE;
use crate::player::{Player, PlayerError};

#[derive(Error, Debug)]
pub enum RosterError {
    #[error("Player already exists: {0}")]
    Duplicate(String),

    #[error("Player not found: {0}")]
    NotFound(String),

    #[error("Select at least one player")]
    EmptySelection,

    #[error("Cannot select {count} players, the maximum is {max}")]
    SelectionTooLarge { count: usize, max: usize },

    #[error(transparent)]
    Player(#[from] PlayerError),

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Roster JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Ordered player collection with case-insensitive unique names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Roster {
    players: Vec<Player>,
}

#[derive(Debug, Deserialize)]
struct RosterFile {
    players: Vec<Player>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a list, rejecting duplicate names
    pub fn from_players(players: impl IntoIterator<Item = Player>) -> Result<Self, RosterError> {
        let mut roster = Roster::new();
        for player in players {
            roster.add(player)?;
        }
        Ok(roster)
    }

    pub fn add(&mut self, player: Player) -> Result<(), RosterError> {
        if self.contains(player.name()) {
            return Err(RosterError::Duplicate(player.name().to_string()));
        }
        tracing::debug!(player = %player, "added to roster");
        self.players.push(player);
        Ok(())
    }

    pub fn remove(&mut self, name: &str) -> Result<Player, RosterError> {
        let index = self
            .players
            .iter()
            .position(|p| p.has_name(name))
            .ok_or_else(|| RosterError::NotFound(name.trim().to_string()))?;
        Ok(self.players.remove(index))
    }

    pub fn get(&self, name: &str) -> Option<&Player> {
        self.players.iter().find(|p| p.has_name(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Names in case-insensitive alphabetical order (for pickers)
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.players.iter().map(|p| p.name()).collect();
        names.sort_by_key(|n| n.to_lowercase());
        names
    }

    /// Snapshot of the named players, in roster order.
    ///
    /// Repeated names count once. The selection must hold 1..=11 players and
    /// every name must be on the roster.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<Player>, RosterError> {
        let mut wanted: Vec<String> = Vec::new();
        for name in names {
            let key = name.as_ref().trim().to_lowercase();
            if !key.is_empty() && !wanted.contains(&key) {
                wanted.push(key);
            }
        }

        if wanted.is_empty() {
            return Err(RosterError::EmptySelection);
        }
        if wanted.len() > FORMATION_SIZE {
            return Err(RosterError::SelectionTooLarge {
                count: wanted.len(),
                max: FORMATION_SIZE,
            });
        }

        if let Some(missing) = wanted.iter().find(|key| !self.contains(key)) {
            let original = names
                .iter()
                .map(|n| n.as_ref().trim())
                .find(|n| n.to_lowercase() == **missing)
                .unwrap_or(missing.as_str());
            return Err(RosterError::NotFound(original.to_string()));
        }

        Ok(self
            .players
            .iter()
            .filter(|p| wanted.contains(&p.name().to_lowercase()))
            .cloned()
            .collect())
    }

    pub fn load_json(path: &Path) -> Result<Self, RosterError> {
        let json = fs::read_to_string(path).map_err(|source| RosterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: RosterFile = serde_json::from_str(&json)?;
        let roster = Roster::from_players(file.players)?;
        tracing::info!(path = %path.display(), players = roster.len(), "loaded roster");
        Ok(roster)
    }

    pub fn save_json(&self, path: &Path) -> Result<(), RosterError> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| RosterError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, json).map_err(|source| RosterError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Player;
    type IntoIter = std::slice::Iter<'a, Player>;

    fn into_iter(self) -> Self::IntoIter {
        self.players.iter()
    }
}
