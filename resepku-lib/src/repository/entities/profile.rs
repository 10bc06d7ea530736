use agdb::{DbId, QueryBuilder};
use chrono::{DateTime, Utc};
use getset::Getters;
use tracing::debug;

use crate::repository::{
    Error, Result,
    db::{Db, PROFILE_ALIAS, Uid, models::ProfileModel},
};

/// The persisted identity of the current user.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
#[getset(get = "pub")]
pub struct Profile {
    username: String,
    /// Image data URI
    avatar: Option<String>,
    joined_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(username: impl Into<String>, avatar: Option<String>) -> Self {
        Self {
            username: username.into(),
            avatar,
            joined_at: Utc::now(),
        }
    }

    pub fn with_joined_at(mut self, joined_at: DateTime<Utc>) -> Self {
        self.joined_at = joined_at;
        self
    }
}

impl From<ProfileModel> for Profile {
    fn from(model: ProfileModel) -> Self {
        Self {
            username: model.username,
            avatar: model.avatar,
            joined_at: DateTime::from_timestamp(model.joined_at, 0).unwrap_or_default(),
        }
    }
}

pub(crate) fn load(db: &Db) -> Result<Profile> {
    model(db).map(Profile::from)
}

/// Create the profile with the given username if the database doesn't have one yet.
pub(crate) fn ensure(db: &Db, default_username: &str) -> Result<()> {
    match model(db) {
        Ok(_) => Ok(()),
        Err(Error::MissingProfile) => {
            let model = ProfileModel::new(Uid::new(db)?, default_username, Utc::now().timestamp());
            db.write().transaction_mut(|t| -> Result<()> {
                let profile_id = t
                    .exec_mut(QueryBuilder::insert().element(model).query())?
                    .elements
                    .first()
                    .ok_or(Error::MissingValue(PROFILE_ALIAS))?
                    .id;

                t.exec_mut(
                    QueryBuilder::insert()
                        .edges()
                        .from(PROFILE_ALIAS)
                        .to(profile_id)
                        .query(),
                )?;

                Ok(())
            })?;

            debug!("Created profile for {default_username}");

            Ok(())
        }
        Err(e) => Err(e),
    }
}

pub(crate) fn set_username(db: &Db, username: &str) -> Result<()> {
    let db_id = db_id(db)?;
    db.write().exec_mut(
        QueryBuilder::insert()
            .values([[("username", username).into()]])
            .ids(db_id)
            .query(),
    )?;

    debug!("Renamed profile to {username}");

    Ok(())
}

pub(crate) fn set_avatar(db: &Db, data_uri: &str) -> Result<()> {
    let db_id = db_id(db)?;
    db.write().exec_mut(
        QueryBuilder::insert()
            .values([[("avatar", data_uri).into()]])
            .ids(db_id)
            .query(),
    )?;

    debug!("Updated avatar ({} bytes)", data_uri.len());

    Ok(())
}

pub(crate) fn clear_avatar(db: &Db) -> Result<()> {
    let db_id = db_id(db)?;
    db.write()
        .exec_mut(QueryBuilder::remove().values("avatar").ids(db_id).query())?;

    debug!("Cleared avatar");

    Ok(())
}

fn model(db: &Db) -> Result<ProfileModel> {
    let models: Vec<ProfileModel> = db
        .read()
        .exec(
            QueryBuilder::select()
                .elements::<ProfileModel>()
                .search()
                .from(PROFILE_ALIAS)
                .where_()
                .neighbor()
                .query(),
        )?
        .try_into()?;

    models.into_iter().next().ok_or(Error::MissingProfile)
}

fn db_id(db: &Db) -> Result<DbId> {
    model(db)?.db_id.ok_or(Error::MissingProfile)
}
