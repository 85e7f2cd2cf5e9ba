//! Player records fed into the matcher
//!
//! A `Player` is the typed result of the parse-then-validate boundary: a
//! validated display name plus a non-empty role set. Construction goes through
//! [`Player::new`] (or serde, which routes through the same checks), so nothing
//! downstream has to re-validate.

use crate::roles::{parse_role_list, RoleError, RoleSet};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Longest accepted player name, in characters
pub const MAX_NAME_LEN: usize = 50;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayerError {
    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Player '{name}' has no roles")]
    NoRoles { name: String },

    #[error("Player '{name}': {source}")]
    InvalidRoles {
        name: String,
        #[source]
        source: RoleError,
    },
}

/// A selectable player: unique (case-insensitive) name and eligible roles
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PlayerRecord", into = "PlayerRecord")]
pub struct Player {
    name: String,
    roles: RoleSet,
}

/// Wire form of a player, validated into [`Player`] on deserialization
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PlayerRecord {
    name: String,
    roles: RoleSet,
}

impl Player {
    /// Build a player, trimming the name.
    ///
    /// Names must be 1..=50 characters with no control characters.
    /// The role set must not be empty.
    pub fn new(name: impl AsRef<str>, roles: RoleSet) -> Result<Self, PlayerError> {
        let name = name.as_ref().trim();
        validate_name(name)?;

        if roles.is_empty() {
            return Err(PlayerError::NoRoles {
                name: name.to_string(),
            });
        }

        Ok(Self {
            name: name.to_string(),
            roles,
        })
    }

    /// Build a player from a spreadsheet-style role cell ("Dc;B")
    pub fn parse(name: impl AsRef<str>, roles: &str) -> Result<Self, PlayerError> {
        let name = name.as_ref().trim();
        let roles = parse_role_list(roles).map_err(|source| match source {
            RoleError::Empty => PlayerError::NoRoles {
                name: name.to_string(),
            },
            source => PlayerError::InvalidRoles {
                name: name.to_string(),
                source,
            },
        })?;
        Self::new(name, roles)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn roles(&self) -> RoleSet {
        self.roles
    }

    /// Case-insensitive name comparison used for roster uniqueness
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.roles)
    }
}

impl TryFrom<PlayerRecord> for Player {
    type Error = PlayerError;

    fn try_from(record: PlayerRecord) -> Result<Self, Self::Error> {
        Player::new(record.name, record.roles)
    }
}

impl From<Player> for PlayerRecord {
    fn from(player: Player) -> Self {
        PlayerRecord {
            name: player.name,
            roles: player.roles,
        }
    }
}

fn validate_name(name: &str) -> Result<(), PlayerError> {
    if name.is_empty() {
        return Err(PlayerError::InvalidName("Name cannot be empty".to_string()));
    }

    if name.chars().count() > MAX_NAME_LEN {
        return Err(PlayerError::InvalidName(format!(
            "Name cannot exceed {MAX_NAME_LEN} characters"
        )));
    }

    if name.chars().any(char::is_control) {
        return Err(PlayerError::InvalidName(format!(
            "'{}' contains control characters",
            name.escape_debug()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::Role;

    #[test]
    fn test_new_trims_and_validates() {
        let player = Player::new("  Bastoni ", RoleSet::from([Role::CenterBack, Role::FlexBack]))
            .unwrap();
        assert_eq!(player.name(), "Bastoni");
        assert_eq!(player.roles().len(), 2);

        assert!(matches!(
            Player::new("", RoleSet::single(Role::Goalkeeper)),
            Err(PlayerError::InvalidName(_))
        ));
        assert!(matches!(
            Player::new("x".repeat(51), RoleSet::single(Role::Goalkeeper)),
            Err(PlayerError::InvalidName(_))
        ));
        assert!(matches!(
            Player::new("Bad\nName", RoleSet::single(Role::Goalkeeper)),
            Err(PlayerError::InvalidName(_))
        ));
    }

    #[test]
    fn test_empty_roles_rejected() {
        assert_eq!(
            Player::new("Nobody", RoleSet::empty()),
            Err(PlayerError::NoRoles {
                name: "Nobody".to_string(),
            })
        );
        assert_eq!(
            Player::parse("Nobody", " ; "),
            Err(PlayerError::NoRoles {
                name: "Nobody".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_accepts_accents_and_apostrophes() {
        let player = Player::parse("D'Ambrosio Ñíguez", "Dd/Dc").unwrap();
        assert!(player.roles().contains(Role::RightBack));
        assert!(player.roles().contains(Role::CenterBack));

        let err = Player::parse("Rossi", "Dc;Qq").unwrap_err();
        assert!(matches!(err, PlayerError::InvalidRoles { .. }));
    }

    #[test]
    fn test_free_form_names_accepted() {
        for name in ["Kvara_77", "Lautaro (C)", "Smith & Co", "Bad<Name>"] {
            let player = Player::parse(name, "A").unwrap();
            assert_eq!(player.name(), name);
        }
        assert!(matches!(
            Player::parse("Tab\tName", "A"),
            Err(PlayerError::InvalidName(_))
        ));
    }

    #[test]
    fn test_has_name_is_case_insensitive() {
        let player = Player::parse("Lautaro", "Pc").unwrap();
        assert!(player.has_name("LAUTARO"));
        assert!(player.has_name(" lautaro "));
        assert!(!player.has_name("Thuram"));
    }

    #[test]
    fn test_deserialize_validates() {
        let player: Player =
            serde_json::from_str(r#"{"name":"Barella","roles":["C","T"]}"#).unwrap();
        assert_eq!(player.to_string(), "Barella (C,T)");

        let bad = serde_json::from_str::<Player>(r#"{"name":"Ghost","roles":[]}"#);
        assert!(bad.is_err());
    }
}
