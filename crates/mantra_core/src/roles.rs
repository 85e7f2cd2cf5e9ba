// crates/mantra_core/src/roles.rs
// Mantra role alphabet and compact role sets

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Role parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoleError {
    #[error("Unknown role: '{0}'")]
    Unknown(String),

    #[error("Role list is empty")]
    Empty,
}

/// Mantra positional roles (12 roles, fixed by the official formation table)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Role {
    #[serde(rename = "Por")]
    Goalkeeper = 0,
    #[serde(rename = "Dd")]
    RightBack = 1,
    #[serde(rename = "Ds")]
    LeftBack = 2,
    #[serde(rename = "Dc")]
    CenterBack = 3,
    #[serde(rename = "B")]
    FlexBack = 4,
    #[serde(rename = "E")]
    Flank = 5,
    #[serde(rename = "M")]
    HoldingMidfielder = 6,
    #[serde(rename = "C")]
    CenterMidfielder = 7,
    #[serde(rename = "T")]
    AttackingMidfielder = 8,
    #[serde(rename = "W")]
    Winger = 9,
    #[serde(rename = "A")]
    Forward = 10,
    #[serde(rename = "Pc")]
    CenterForward = 11,
}

impl Role {
    pub const ALL: [Role; 12] = [
        Role::Goalkeeper,
        Role::RightBack,
        Role::LeftBack,
        Role::CenterBack,
        Role::FlexBack,
        Role::Flank,
        Role::HoldingMidfielder,
        Role::CenterMidfielder,
        Role::AttackingMidfielder,
        Role::Winger,
        Role::Forward,
        Role::CenterForward,
    ];

    /// Official Mantra code (as printed on the formation table)
    pub fn code(&self) -> &'static str {
        match self {
            Self::Goalkeeper => "Por",
            Self::RightBack => "Dd",
            Self::LeftBack => "Ds",
            Self::CenterBack => "Dc",
            Self::FlexBack => "B",
            Self::Flank => "E",
            Self::HoldingMidfielder => "M",
            Self::CenterMidfielder => "C",
            Self::AttackingMidfielder => "T",
            Self::Winger => "W",
            Self::Forward => "A",
            Self::CenterForward => "Pc",
        }
    }

    pub fn english_name(&self) -> &'static str {
        match self {
            Self::Goalkeeper => "goalkeeper",
            Self::RightBack => "right back",
            Self::LeftBack => "left back",
            Self::CenterBack => "center back",
            Self::FlexBack => "flexible back",
            Self::Flank => "flank",
            Self::HoldingMidfielder => "holding midfielder",
            Self::CenterMidfielder => "central midfielder",
            Self::AttackingMidfielder => "attacking midfielder",
            Self::Winger => "winger",
            Self::Forward => "forward",
            Self::CenterForward => "center forward",
        }
    }

    pub fn is_goalkeeper(&self) -> bool {
        matches!(self, Role::Goalkeeper)
    }

    pub fn is_defender(&self) -> bool {
        matches!(
            self,
            Role::RightBack | Role::LeftBack | Role::CenterBack | Role::FlexBack
        )
    }

    /// Roles that can occupy a flank slot (E or W)
    pub fn is_wide(&self) -> bool {
        matches!(self, Role::Flank | Role::Winger)
    }

    fn bit(self) -> u16 {
        1 << (self as u16)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "por" | "p" | "gk" | "goalkeeper" => Ok(Role::Goalkeeper),
            "dd" | "rb" | "right-back" => Ok(Role::RightBack),
            "ds" | "lb" | "left-back" => Ok(Role::LeftBack),
            "dc" | "cb" | "center-back" | "centre-back" => Ok(Role::CenterBack),
            "b" | "braccetto" | "flex-back" | "flexible-back" => Ok(Role::FlexBack),
            "e" | "flank" | "wing-back" | "esterno" => Ok(Role::Flank),
            "m" | "dm" | "mediano" | "midfielder" | "holding-midfielder" => {
                Ok(Role::HoldingMidfielder)
            }
            "c" | "cm" | "center-mid" | "centre-mid" | "central-midfielder" => {
                Ok(Role::CenterMidfielder)
            }
            "t" | "am" | "trequartista" | "attacking-midfielder" => Ok(Role::AttackingMidfielder),
            "w" | "wing" | "winger" | "wide" => Ok(Role::Winger),
            "a" | "forward" | "attaccante" | "second-striker" => Ok(Role::Forward),
            "pc" | "cf" | "st" | "center-forward" | "centre-forward" | "punta" => {
                Ok(Role::CenterForward)
            }
            _ => Err(RoleError::Unknown(s.trim().to_string())),
        }
    }
}

/// Set of roles stored as a 12-bit mask.
///
/// Both player eligibility and slot acceptance are `RoleSet`s; placement only
/// asks whether two sets intersect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Vec<Role>", into = "Vec<Role>")]
pub struct RoleSet(u16);

impl RoleSet {
    pub const fn empty() -> Self {
        RoleSet(0)
    }

    pub fn single(role: Role) -> Self {
        RoleSet(role.bit())
    }

    pub fn insert(&mut self, role: Role) {
        self.0 |= role.bit();
    }

    pub fn contains(&self, role: Role) -> bool {
        self.0 & role.bit() != 0
    }

    pub fn intersects(&self, other: RoleSet) -> bool {
        self.0 & other.0 != 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// True when the set holds `role` and nothing else ("pure" role player)
    pub fn is_exactly(&self, role: Role) -> bool {
        self.0 == role.bit()
    }

    pub fn has_defender(&self) -> bool {
        self.iter().any(|r| r.is_defender())
    }

    pub fn has_wide(&self) -> bool {
        self.iter().any(|r| r.is_wide())
    }

    /// Roles in canonical table order
    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        Role::ALL.into_iter().filter(move |r| self.contains(*r))
    }

    pub fn to_vec(&self) -> Vec<Role> {
        self.iter().collect()
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        let mut set = RoleSet::empty();
        for role in iter {
            set.insert(role);
        }
        set
    }
}

impl From<Vec<Role>> for RoleSet {
    fn from(roles: Vec<Role>) -> Self {
        roles.into_iter().collect()
    }
}

impl From<RoleSet> for Vec<Role> {
    fn from(set: RoleSet) -> Self {
        set.to_vec()
    }
}

impl<const N: usize> From<[Role; N]> for RoleSet {
    fn from(roles: [Role; N]) -> Self {
        roles.into_iter().collect()
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let codes: Vec<&str> = self.iter().map(|r| r.code()).collect();
        f.write_str(&codes.join(","))
    }
}

impl FromStr for RoleSet {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_role_list(s)
    }
}

/// Split a spreadsheet role cell ("Dc;B", "E/W", "M, C") into a role set.
///
/// Accepts `;`, `,` and `/` as separators. Blank fragments are ignored and
/// repeated roles collapse. Fails on the first unknown label or when nothing
/// is left after splitting.
pub fn parse_role_list(text: &str) -> Result<RoleSet, RoleError> {
    let mut set = RoleSet::empty();
    for fragment in text.split([';', ',', '/']) {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            continue;
        }
        set.insert(fragment.parse()?);
    }

    if set.is_empty() {
        return Err(RoleError::Empty);
    }
    Ok(set)
}
