use agdb::{DbElement, DbId};

use crate::repository::db::Uid;

pub(crate) const CURRENT_MODEL_VERSION: u64 = 1;

#[derive(Debug, Clone, DbElement, PartialEq, PartialOrd)]
pub(crate) struct ModelVersion {
    db_id: Option<DbId>,
    version: u64,
}

impl ModelVersion {
    pub fn version(&self) -> u64 {
        self.version
    }
}

impl Default for ModelVersion {
    fn default() -> Self {
        Self {
            db_id: None,
            version: CURRENT_MODEL_VERSION,
        }
    }
}

#[derive(Debug, Clone, DbElement, PartialEq, PartialOrd)]
pub(crate) struct ProfileModel {
    pub(crate) db_id: Option<DbId>,
    pub(crate) uid: u64,
    pub(crate) username: String,
    /// Image data URI, absent until the user uploads one
    pub(crate) avatar: Option<String>,
    /// Unix timestamp, in seconds, of when the profile was created
    pub(crate) joined_at: i64,
}

impl ProfileModel {
    pub fn new(uid: Uid, username: &str, joined_at: i64) -> Self {
        Self {
            db_id: None,
            uid: uid.0,
            username: username.to_string(),
            avatar: None,
            joined_at,
        }
    }
}

#[derive(Debug, Clone, DbElement, PartialEq, PartialOrd)]
pub(crate) struct FavoriteModel {
    pub(crate) db_id: Option<DbId>,
    pub(crate) uid: u64,
    /// ID of the recipe within its category
    pub(crate) recipe_id: u64,
    /// Either `makanan` or `minuman`
    pub(crate) kind: String,
    pub(crate) name: String,
    pub(crate) image_url: String,
    pub(crate) ingredients: Vec<String>,
    pub(crate) steps: Vec<String>,
    pub(crate) difficulty: Option<String>,
    pub(crate) cooking_time: Option<String>,
    pub(crate) rating: Option<String>,
}
