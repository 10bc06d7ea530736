use std::{path::PathBuf, sync::Arc};

use agdb::{DbAny, QueryBuilder};
use derive_more::Deref;
use parking_lot::RwLock;
use tracing::debug;

use crate::{
    fs::state_dir,
    repository::{
        Error, Result,
        db::models::{CURRENT_MODEL_VERSION, ModelVersion},
    },
};

pub(crate) mod models;

/// Root node the single user profile hangs off
pub(crate) const PROFILE_ALIAS: &str = "user_profile";
/// Root node every favorite hangs off
pub(crate) const FAVORITES_ALIAS: &str = "favorites";
const MODEL_VERSION_ALIAS: &str = "model_version";
const NEXT_UID_ALIAS: &str = "next_uid";

#[derive(Debug, Clone, Deref)]
pub(crate) struct Db {
    #[deref]
    db: Arc<RwLock<DbAny>>,
}

impl Db {
    pub fn new() -> Result<Self> {
        let path = state_dir()?.join("data.db");

        let mut db = Self {
            db: Arc::new(RwLock::new(DbAny::new_file(path_str(&path)?)?)),
        };

        db.init()?;

        Ok(db)
    }

    fn init(&mut self) -> Result<()> {
        let alias_count = self
            .db
            .read()
            .exec(QueryBuilder::select().aliases().query())?
            .result;

        if alias_count == 0 {
            self.db.write().transaction_mut(|t| -> Result<()> {
                t.exec_mut(
                    // Insert aliases if they don't exist
                    QueryBuilder::insert()
                        .nodes()
                        .aliases([
                            // Root element nodes
                            PROFILE_ALIAS,
                            FAVORITES_ALIAS,
                            // State nodes
                            MODEL_VERSION_ALIAS,
                            NEXT_UID_ALIAS,
                        ])
                        .query(),
                )?;

                // Signifies what the UID should be for a newly inserted element. It gets
                // incremented with every new element.
                t.exec_mut(
                    QueryBuilder::insert()
                        .values([[(NEXT_UID_ALIAS, 0_u64).into()]])
                        .ids(NEXT_UID_ALIAS)
                        .query(),
                )?;

                Ok(())
            })?;
        }

        // Fetch the current model version (if any)
        let model_version: Option<ModelVersion> = self
            .db
            .read()
            .exec(
                QueryBuilder::select()
                    .elements::<ModelVersion>()
                    .search()
                    .from(MODEL_VERSION_ALIAS)
                    .where_()
                    .neighbor()
                    .query(),
            )?
            .try_into()
            .ok();

        match model_version {
            Some(mv) if mv.version() > CURRENT_MODEL_VERSION => {
                return Err(Error::UnsupportedModelVersion {
                    found: mv.version(),
                    supported: CURRENT_MODEL_VERSION,
                });
            }
            Some(_) => {}
            None => {
                // Insert default ModelVersion if missing
                self.db.write().transaction_mut(|t| -> Result<()> {
                    let model_version_id = t
                        .exec_mut(
                            QueryBuilder::insert()
                                .element(ModelVersion::default())
                                .query(),
                        )?
                        .elements
                        .first()
                        .ok_or(Error::MissingValue(MODEL_VERSION_ALIAS))?
                        .id;

                    t.exec_mut(
                        QueryBuilder::insert()
                            .edges()
                            .from(MODEL_VERSION_ALIAS)
                            .to(model_version_id)
                            .query(),
                    )?;

                    Ok(())
                })?;
            }
        }

        Ok(())
    }

    /// Perform a backup of the database, returning the path of the copy
    pub fn backup(&self) -> Result<PathBuf> {
        let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        let path = state_dir()?.join(format!("data-{}.db.bak", timestamp));

        self.db.write().backup(path_str(&path)?)?;

        Ok(path)
    }

    /// Create a memory backed database for use in tests
    #[cfg(test)]
    pub(crate) fn in_memory() -> Self {
        let mut db = Self {
            db: Arc::new(RwLock::new(
                DbAny::new_memory("test").expect("in-memory database should open"),
            )),
        };

        db.init().expect("in-memory database should initialize");

        db
    }
}

/// A unique identifier handed out to every inserted element. UIDs only ever grow, so they
/// double as insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Uid(pub(crate) u64);

impl Uid {
    /// Allocate the next UID
    pub fn new(db: &Db) -> Result<Self> {
        let uid = db.write().transaction_mut(|t| -> Result<u64> {
            let uid = t
                .exec(
                    QueryBuilder::select()
                        .values(NEXT_UID_ALIAS)
                        .ids(NEXT_UID_ALIAS)
                        .query(),
                )?
                .elements
                .pop()
                .and_then(|mut e| e.values.pop())
                .ok_or(Error::MissingValue(NEXT_UID_ALIAS))?
                .value
                .to_u64()?;

            t.exec_mut(
                QueryBuilder::insert()
                    .values([[(NEXT_UID_ALIAS, uid.saturating_add(1)).into()]])
                    .ids(NEXT_UID_ALIAS)
                    .query(),
            )?;

            Ok(uid)
        })?;

        debug!("Allocated uid {uid}");

        Ok(Self(uid))
    }
}

fn path_str(path: &std::path::Path) -> Result<&str> {
    path.to_str().ok_or_else(|| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("path is not valid UTF-8: {}", path.display()),
        ))
    })
}
