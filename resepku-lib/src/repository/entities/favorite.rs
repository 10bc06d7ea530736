use agdb::{DbId, QueryBuilder};
use clap::ValueEnum;
use derive_more::Display;
use getset::Getters;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};
use tracing::debug;

use crate::repository::{
    Error, Result,
    db::{Db, FAVORITES_ALIAS, Uid, models::FavoriteModel},
};

/// Category a recipe belongs to. Recipe IDs are only unique within a category.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    EnumString,
    strum::Display,
    ValueEnum,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RecipeKind {
    /// Food
    Makanan,
    /// Drink
    Minuman,
}

impl RecipeKind {
    /// Human friendly category label
    pub fn label(&self) -> &'static str {
        match self {
            RecipeKind::Makanan => "Makanan",
            RecipeKind::Minuman => "Minuman",
        }
    }
}

/// Identity of a favorite: the recipe's ID together with its category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("{id}-{kind}")]
pub struct FavoriteKey {
    pub id: u64,
    pub kind: RecipeKind,
}

impl FavoriteKey {
    pub fn new(id: u64, kind: RecipeKind) -> Self {
        Self { id, kind }
    }
}

/// A recipe the user has marked for quick access.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
#[getset(get = "pub")]
pub struct FavoriteRecipe {
    id: u64,
    kind: RecipeKind,
    name: String,
    image_url: String,
    ingredients: Vec<String>,
    steps: Vec<String>,
    difficulty: Option<String>,
    cooking_time: Option<String>,
    rating: Option<String>,
}

impl FavoriteRecipe {
    pub fn new(id: u64, kind: RecipeKind, name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
            image_url: String::new(),
            ingredients: Vec::new(),
            steps: Vec::new(),
            difficulty: None,
            cooking_time: None,
            rating: None,
        }
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    pub fn with_ingredients(mut self, ingredients: Vec<String>) -> Self {
        self.ingredients = ingredients;
        self
    }

    pub fn with_steps(mut self, steps: Vec<String>) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = Some(difficulty.into());
        self
    }

    pub fn with_cooking_time(mut self, cooking_time: impl Into<String>) -> Self {
        self.cooking_time = Some(cooking_time.into());
        self
    }

    pub fn with_rating(mut self, rating: impl Into<String>) -> Self {
        self.rating = Some(rating.into());
        self
    }

    pub fn key(&self) -> FavoriteKey {
        FavoriteKey::new(self.id, self.kind)
    }
}

impl TryFrom<FavoriteModel> for FavoriteRecipe {
    type Error = Error;

    fn try_from(model: FavoriteModel) -> Result<Self> {
        let kind = model
            .kind
            .parse()
            .map_err(|_| Error::UnknownRecipeKind(model.kind.clone()))?;

        Ok(Self {
            id: model.recipe_id,
            kind,
            name: model.name,
            image_url: model.image_url,
            ingredients: model.ingredients,
            steps: model.steps,
            difficulty: model.difficulty,
            cooking_time: model.cooking_time,
            rating: model.rating,
        })
    }
}

pub(crate) fn list(db: &Db) -> Result<Vec<FavoriteRecipe>> {
    models(db)?
        .into_iter()
        .map(FavoriteRecipe::try_from)
        .collect()
}

pub(crate) fn find(db: &Db, key: FavoriteKey) -> Result<Option<DbId>> {
    Ok(models(db)?
        .into_iter()
        .find(|m| m.recipe_id == key.id && m.kind == key.kind.as_ref())
        .and_then(|m| m.db_id))
}

pub(crate) fn add(db: &Db, recipe: FavoriteRecipe) -> Result<bool> {
    let key = recipe.key();
    if find(db, key)?.is_some() {
        return Ok(false);
    }

    let model = FavoriteModel {
        db_id: None,
        uid: Uid::new(db)?.0,
        recipe_id: recipe.id,
        kind: recipe.kind.to_string(),
        name: recipe.name,
        image_url: recipe.image_url,
        ingredients: recipe.ingredients,
        steps: recipe.steps,
        difficulty: recipe.difficulty,
        cooking_time: recipe.cooking_time,
        rating: recipe.rating,
    };

    db.write().transaction_mut(|t| -> Result<()> {
        let favorite_id = t
            .exec_mut(QueryBuilder::insert().element(model).query())?
            .elements
            .first()
            .ok_or(Error::MissingValue(FAVORITES_ALIAS))?
            .id;

        t.exec_mut(
            QueryBuilder::insert()
                .edges()
                .from(FAVORITES_ALIAS)
                .to(favorite_id)
                .query(),
        )?;

        Ok(())
    })?;

    debug!("Added favorite {key}");

    Ok(true)
}

pub(crate) fn remove(db: &Db, key: FavoriteKey) -> Result<bool> {
    let Some(db_id) = find(db, key)? else {
        return Ok(false);
    };

    db.write()
        .exec_mut(QueryBuilder::remove().ids(db_id).query())?;

    debug!("Removed favorite {key}");

    Ok(true)
}

/// Every stored favorite, ordered by when it was added
fn models(db: &Db) -> Result<Vec<FavoriteModel>> {
    let mut models: Vec<FavoriteModel> = db
        .read()
        .exec(
            QueryBuilder::select()
                .elements::<FavoriteModel>()
                .search()
                .from(FAVORITES_ALIAS)
                .where_()
                .neighbor()
                .query(),
        )?
        .try_into()?;

    models.sort_by_key(|m| m.uid);

    Ok(models)
}

#[cfg(test)]
mod test {
    use super::{FavoriteKey, FavoriteRecipe, RecipeKind};

    #[test]
    fn test_kind_parses_lowercase() {
        assert_eq!("makanan".parse::<RecipeKind>().unwrap(), RecipeKind::Makanan);
        assert_eq!(RecipeKind::Minuman.to_string(), "minuman");
        assert!("dessert".parse::<RecipeKind>().is_err());
    }

    #[test]
    fn test_key_display() {
        let recipe = FavoriteRecipe::new(5, RecipeKind::Minuman, "Es Cendol");

        assert_eq!(recipe.key(), FavoriteKey::new(5, RecipeKind::Minuman));
        assert_eq!(recipe.key().to_string(), "5-minuman");
    }
}
