//! Core domain entities for Resepku.
//!
//! These are plain snapshots of what the database holds at the moment they were read.
//! Mutations go through the [`Repository`](crate::Repository) and callers re-read afterwards.

pub(crate) mod favorite;
pub(crate) mod profile;

pub use favorite::{FavoriteKey, FavoriteRecipe, RecipeKind};
pub use profile::Profile;
