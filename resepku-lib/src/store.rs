//! Collaborator contracts consumed by the profile page.

use tracing::warn;

use crate::{
    avatar,
    repository::{self, FavoriteRecipe, Profile, Repository},
};

/// Result of a store mutation, reported back to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub success: bool,
    pub message: String,
}

impl UpdateOutcome {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Read and update access to the single user profile.
pub trait ProfileStore {
    fn user_profile(&self) -> repository::Result<Profile>;

    /// Replace the avatar with an image data URI
    fn update_avatar(&self, data_uri: &str) -> UpdateOutcome;

    fn update_username(&self, username: &str) -> UpdateOutcome;
}

/// Read access to the user's favorite recipes.
pub trait FavoritesStore {
    /// All favorites, in store order
    fn favorites(&self) -> repository::Result<Vec<FavoriteRecipe>>;
}

impl<T: ProfileStore + ?Sized> ProfileStore for &T {
    fn user_profile(&self) -> repository::Result<Profile> {
        (**self).user_profile()
    }

    fn update_avatar(&self, data_uri: &str) -> UpdateOutcome {
        (**self).update_avatar(data_uri)
    }

    fn update_username(&self, username: &str) -> UpdateOutcome {
        (**self).update_username(username)
    }
}

impl<T: FavoritesStore + ?Sized> FavoritesStore for &T {
    fn favorites(&self) -> repository::Result<Vec<FavoriteRecipe>> {
        (**self).favorites()
    }
}

impl ProfileStore for Repository {
    fn user_profile(&self) -> repository::Result<Profile> {
        Repository::user_profile(self)
    }

    fn update_avatar(&self, data_uri: &str) -> UpdateOutcome {
        if !avatar::is_image_data_uri(data_uri) {
            warn!("Rejected avatar that is not an image data URI");
            return UpdateOutcome::failure("Format gambar tidak valid");
        }

        match self.set_avatar(data_uri) {
            Ok(()) => UpdateOutcome::success("Foto profil berhasil diperbarui"),
            Err(e) => UpdateOutcome::failure(e.to_string()),
        }
    }

    fn update_username(&self, username: &str) -> UpdateOutcome {
        if username.trim().is_empty() {
            return UpdateOutcome::failure("Username tidak boleh kosong");
        }

        let max_len = self.cfg().read().username_max_len;
        if username.chars().count() > max_len {
            return UpdateOutcome::failure(format!("Username maksimal {max_len} karakter"));
        }

        match self.set_username(username) {
            Ok(()) => UpdateOutcome::success("Username berhasil diperbarui"),
            Err(e) => UpdateOutcome::failure(e.to_string()),
        }
    }
}

impl FavoritesStore for Repository {
    fn favorites(&self) -> repository::Result<Vec<FavoriteRecipe>> {
        Repository::favorites(self)
    }
}
