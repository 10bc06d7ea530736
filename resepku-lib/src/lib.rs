//! Core library for Resepku, a recipe companion.
//!
//! The [`Repository`] persists the user's profile and favorite recipes. The
//! [`profile_page::ProfilePage`] controller drives the profile screen on top of any
//! [`store::ProfileStore`] and [`store::FavoritesStore`], whether that is the repository or a
//! test fake.

pub mod avatar;
pub mod fs;
pub mod profile_page;
pub mod repository;
pub mod store;

pub use repository::{Error, Repository, Result};
