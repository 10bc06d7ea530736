use std::{fs, sync::Arc};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    avatar::MAX_AVATAR_BYTES, fs::config_dir, profile_page::FAVORITES_PREVIEW_LEN,
    repository::Result,
};

const FILE_NAME: &str = "core.toml";

/// Handle to the core configuration
pub type Cfg = Arc<RwLock<CoreConfig>>;

/// The core configuration, serialized to TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Username given to the profile the first time the database is created
    pub default_username: String,
    /// Longest username, in characters, the store accepts
    pub username_max_len: usize,
    /// Largest avatar file, in bytes, that may be uploaded
    pub avatar_max_bytes: u64,
    /// How many favorites the profile page shows before pointing to the favorites page
    pub favorites_preview: usize,
    pub about: About,
}

/// Static details shown on the profile page's about card.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct About {
    pub bio: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub recipes_shared: u32,
    pub followers: u32,
    pub social: SocialHandles,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialHandles {
    /// May be given with or without the leading `@`
    pub instagram: Option<String>,
    pub github: Option<String>,
    pub linkedin: Option<String>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            default_username: "Pengguna".into(),
            username_max_len: 30,
            avatar_max_bytes: MAX_AVATAR_BYTES,
            favorites_preview: FAVORITES_PREVIEW_LEN,
            about: About::default(),
        }
    }
}

impl CoreConfig {
    /// Load the configuration from disk. A missing file is created with defaults and an
    /// unparsable one falls back to defaults.
    pub fn load() -> Result<Self> {
        let path = config_dir()?.join(FILE_NAME);

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            Ok(toml::from_str(&contents).unwrap_or_else(|err| {
                warn!("Ignoring invalid {}: {err}", path.display());
                Self::default()
            }))
        } else {
            let cfg = Self::default();
            cfg.save()?;
            Ok(cfg)
        }
    }

    pub fn save(&self) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;

        fs::write(config_dir()?.join(FILE_NAME), contents)?;

        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn mock() -> Self {
        Self::default()
    }
}
