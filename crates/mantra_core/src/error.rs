use thiserror::Error;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::player::PlayerError;
use crate::roles::RoleError;
use crate::roster::RosterError;

/// Any failure surfaced by the library
#[derive(Error, Debug)]
pub enum MantraError {
    #[error(transparent)]
    Role(#[from] RoleError),

    #[error(transparent)]
    Player(#[from] PlayerError),

    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, MantraError>;
