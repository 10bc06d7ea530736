use std::{io, path::PathBuf, sync::Arc};

use parking_lot::RwLock;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    avatar,
    repository::{
        config::{Cfg, CoreConfig},
        db::Db,
        entities::{favorite, profile},
    },
};

mod db;

pub mod config;
pub mod entities;

pub use entities::{FavoriteKey, FavoriteRecipe, Profile, RecipeKind};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Internal database error {0}")]
    Internal(#[from] agdb::DbError),
    #[error("Filesystem error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to serialize configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
    #[error("The user profile has not been created")]
    MissingProfile,
    #[error("Database model version {found} is newer than the supported version {supported}")]
    UnsupportedModelVersion { found: u64, supported: u64 },
    #[error("Unknown recipe category: {0}")]
    UnknownRecipeKind(String),
    #[error("Username must not be blank")]
    BlankUsername,
    #[error("Avatar is not a base64 encoded image")]
    InvalidAvatar,
    #[error("Query returned no value for `{0}`")]
    MissingValue(&'static str),
}

/// Central access point for all persistent data.
///
/// The [`Repository`] owns the database handle and the core configuration. It stores the
/// single user profile and the ordered list of favorite recipes, and implements both
/// [`ProfileStore`](crate::store::ProfileStore) and
/// [`FavoritesStore`](crate::store::FavoritesStore).
#[derive(Clone, Debug)]
pub struct Repository {
    db: Db,
    cfg: Cfg,
}

impl Repository {
    /// Open the on-disk database, creating the user profile on first run.
    pub fn new() -> Result<Self> {
        let cfg = Arc::new(RwLock::new(CoreConfig::load()?));
        Self::open(Db::new()?, cfg)
    }

    fn open(db: Db, cfg: Cfg) -> Result<Self> {
        let mut default_username = cfg.read().default_username.clone();
        if default_username.trim().is_empty() {
            warn!("Configured default username is blank, using the built-in one");
            default_username = CoreConfig::default().default_username;
        }
        profile::ensure(&db, &default_username)?;

        Ok(Self { db, cfg })
    }

    /// Handle to the shared core configuration
    pub fn cfg(&self) -> Cfg {
        self.cfg.clone()
    }

    pub fn user_profile(&self) -> Result<Profile> {
        profile::load(&self.db)
    }

    /// Replace the stored username. The value is stored exactly as given, but it must contain
    /// something besides whitespace.
    pub fn set_username(&self, username: &str) -> Result<()> {
        if username.trim().is_empty() {
            return Err(Error::BlankUsername);
        }

        profile::set_username(&self.db, username)
    }

    /// Replace the stored avatar with an image data URI.
    pub fn set_avatar(&self, data_uri: &str) -> Result<()> {
        if !avatar::is_image_data_uri(data_uri) {
            return Err(Error::InvalidAvatar);
        }

        profile::set_avatar(&self.db, data_uri)
    }

    pub fn clear_avatar(&self) -> Result<()> {
        profile::clear_avatar(&self.db)
    }

    /// All favorites, in the order they were added.
    pub fn favorites(&self) -> Result<Vec<FavoriteRecipe>> {
        favorite::list(&self.db)
    }

    /// Mark a recipe as favorite. Returns `false` if a favorite with the same
    /// [`FavoriteKey`] already exists.
    pub fn add_favorite(&self, recipe: FavoriteRecipe) -> Result<bool> {
        favorite::add(&self.db, recipe)
    }

    /// Returns `false` if no favorite with the given key exists.
    pub fn remove_favorite(&self, key: FavoriteKey) -> Result<bool> {
        favorite::remove(&self.db, key)
    }

    pub fn is_favorite(&self, key: FavoriteKey) -> Result<bool> {
        Ok(favorite::find(&self.db, key)?.is_some())
    }

    /// Write a timestamped copy of the database next to the live one.
    pub fn backup(&self) -> Result<PathBuf> {
        let path = self.db.backup()?;
        debug!("Backed up database to {}", path.display());

        Ok(path)
    }

    #[cfg(test)]
    /// Return a mock version of a [`Repository`] with an in-memory database and configuration.
    pub(crate) fn mock() -> Self {
        Self::open(
            Db::in_memory(),
            Arc::new(RwLock::new(CoreConfig::mock())),
        )
        .expect("an in-memory repository should always open")
    }
}
