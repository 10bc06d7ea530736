//! Controller behind the profile screen.
//!
//! [`ProfilePage`] owns the view state (the loaded profile, the favorites list and the
//! username edit box) and mediates every mutation through a [`ProfileStore`]. After a
//! successful mutation the profile is always re-read from the store rather than patched
//! locally.

use derive_more::Display;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    avatar::{AvatarFile, MAX_AVATAR_BYTES},
    repository::{self, FavoriteRecipe, Profile, RecipeKind},
    store::{FavoritesStore, ProfileStore},
};

pub mod about;
mod favorites;
mod username;

pub use favorites::{FAVORITES_PREVIEW_LEN, FavoriteCard, FavoritesPreview};
pub use username::{EditState, UsernameEditor};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Harap pilih file gambar yang valid")]
    InvalidFileType { media_type: String },
    #[error("Ukuran file terlalu besar. Maksimal {}MB", mebibytes(.limit))]
    FileTooLarge { size: u64, limit: u64 },
    #[error("Username tidak boleh kosong")]
    EmptyUsername,
    /// The store refused the change. `message` is the store's own explanation.
    #[error("{action}: {message}")]
    StoreOperationFailed { action: StoreAction, message: String },
    #[error("Gagal membaca file: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Repository(#[from] repository::Error),
}

/// Which store mutation failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum StoreAction {
    #[display("Gagal mengupload foto")]
    UpdateAvatar,
    #[display("Gagal mengubah username")]
    UpdateUsername,
}

fn mebibytes(bytes: &u64) -> u64 {
    bytes.checked_div(1024 * 1024).unwrap_or_default()
}

/// Receives the ID and category of a favorite the user picked.
pub type FavoriteSelectHandler = Box<dyn FnMut(u64, RecipeKind) + Send>;

pub struct ProfilePage<P, F> {
    profiles: P,
    favorites_store: F,
    profile: Option<Profile>,
    favorites: Vec<FavoriteRecipe>,
    username: UsernameEditor,
    avatar_max_bytes: u64,
    preview_len: usize,
    on_favorite_select: Option<FavoriteSelectHandler>,
}

impl<P, F> ProfilePage<P, F>
where
    P: ProfileStore,
    F: FavoritesStore,
{
    pub fn new(profiles: P, favorites: F) -> Self {
        Self {
            profiles,
            favorites_store: favorites,
            profile: None,
            favorites: Vec::new(),
            username: UsernameEditor::default(),
            avatar_max_bytes: MAX_AVATAR_BYTES,
            preview_len: FAVORITES_PREVIEW_LEN,
            on_favorite_select: None,
        }
    }

    /// Override the avatar size limit and the number of favorites previewed.
    pub fn with_limits(mut self, avatar_max_bytes: u64, preview_len: usize) -> Self {
        self.avatar_max_bytes = avatar_max_bytes;
        self.preview_len = preview_len;
        self
    }

    /// Register the handler told about favorites the user selects.
    pub fn on_favorite_select<H>(mut self, handler: H) -> Self
    where
        H: FnMut(u64, RecipeKind) + Send + 'static,
    {
        self.on_favorite_select = Some(Box::new(handler));
        self
    }

    /// Load everything the page shows.
    pub fn mount(&mut self) -> Result<()> {
        self.load_profile()?;
        self.load_favorites()
    }

    /// Re-read the profile from the store and reset the username buffer to it.
    pub fn load_profile(&mut self) -> Result<()> {
        let profile = self.profiles.user_profile()?;
        self.username.sync(profile.username());
        self.profile = Some(profile);

        Ok(())
    }

    pub fn load_favorites(&mut self) -> Result<()> {
        self.favorites = self.favorites_store.favorites()?;
        debug!("Loaded {} favorites", self.favorites.len());

        Ok(())
    }

    /// The last profile read from the store, `None` until the page is mounted
    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// Largest avatar, in bytes, this page accepts
    pub fn avatar_max_bytes(&self) -> u64 {
        self.avatar_max_bytes
    }

    pub fn favorites(&self) -> &[FavoriteRecipe] {
        &self.favorites
    }

    pub fn favorites_preview(&self) -> FavoritesPreview<'_> {
        FavoritesPreview::new(&self.favorites, self.preview_len)
    }

    pub fn username(&self) -> &UsernameEditor {
        &self.username
    }

    // Username

    /// Switch the username into edit mode, seeded with the committed username.
    pub fn begin_username_edit(&mut self) {
        if let Some(profile) = &self.profile {
            self.username.begin(profile.username());
        }
    }

    /// Replace the text in the username edit box. Ignored unless editing.
    pub fn set_username_input(&mut self, text: impl Into<String>) {
        if self.username.is_editing() {
            self.username.input(text.into());
        }
    }

    /// Persist the typed username. The buffer is sent as typed; trimming only decides
    /// whether it counts as empty.
    pub fn save_username(&mut self) -> Result<()> {
        if !self.username.is_editing() {
            return Ok(());
        }

        if !self.username.has_content() {
            warn!("Refusing to save an empty username");
            return Err(Error::EmptyUsername);
        }

        let outcome = self.profiles.update_username(self.username.buffer());
        if !outcome.success {
            warn!("Username update failed: {}", outcome.message);
            return Err(Error::StoreOperationFailed {
                action: StoreAction::UpdateUsername,
                message: outcome.message,
            });
        }

        self.username.finish();
        self.load_profile()
    }

    /// Leave edit mode, discarding whatever was typed.
    pub fn cancel_username_edit(&mut self) {
        let committed = self
            .profile
            .as_ref()
            .map(|p| p.username().as_str())
            .unwrap_or_default();
        self.username.cancel(committed);
    }

    // Avatar

    /// Check a picked file before anything is read or stored.
    pub fn validate_avatar(&self, file: &AvatarFile) -> Result<()> {
        file.validate(self.avatar_max_bytes).inspect_err(|e| {
            warn!("Rejected avatar {}: {e}", file.path().display());
        })
    }

    /// Store an already encoded avatar and reload the profile.
    pub fn apply_avatar(&mut self, data_uri: &str) -> Result<()> {
        let outcome = self.profiles.update_avatar(data_uri);
        if !outcome.success {
            warn!("Avatar update failed: {}", outcome.message);
            return Err(Error::StoreOperationFailed {
                action: StoreAction::UpdateAvatar,
                message: outcome.message,
            });
        }

        self.load_profile()
    }

    /// Validate, read and store a new avatar. Reading the file is the only await point.
    pub async fn change_avatar(&mut self, file: &AvatarFile) -> Result<()> {
        self.validate_avatar(file)?;

        let data_uri = file.read_data_uri(self.avatar_max_bytes).await?;

        self.apply_avatar(&data_uri)
    }

    // Favorites

    /// Forward a selected favorite to the registered handler, if any.
    pub fn select_favorite(&mut self, recipe: &FavoriteRecipe) {
        if let Some(handler) = self.on_favorite_select.as_mut() {
            handler(*recipe.id(), *recipe.kind());
        }
    }
}

#[cfg(test)]
mod test {
    use std::{cell::RefCell, io::Write, sync::Arc};

    use parking_lot::Mutex;

    use super::{EditState, Error, ProfilePage, StoreAction};
    use crate::{
        avatar::{AvatarFile, MAX_AVATAR_BYTES, encode_data_uri, fixtures::PNG},
        repository::{self, FavoriteKey, FavoriteRecipe, Profile, RecipeKind},
        store::{FavoritesStore, ProfileStore, UpdateOutcome},
    };

    struct FakeProfiles {
        profile: RefCell<Profile>,
        refuse_with: Option<String>,
        avatar_calls: RefCell<Vec<String>>,
        username_calls: RefCell<Vec<String>>,
    }

    impl FakeProfiles {
        fn new(username: &str) -> Self {
            Self {
                profile: RefCell::new(Profile::new(username, None)),
                refuse_with: None,
                avatar_calls: RefCell::default(),
                username_calls: RefCell::default(),
            }
        }

        fn refusing(username: &str, message: &str) -> Self {
            Self {
                refuse_with: Some(message.into()),
                ..Self::new(username)
            }
        }

        fn calls(&self) -> usize {
            self.avatar_calls.borrow().len() + self.username_calls.borrow().len()
        }
    }

    impl ProfileStore for FakeProfiles {
        fn user_profile(&self) -> repository::Result<Profile> {
            Ok(self.profile.borrow().clone())
        }

        fn update_avatar(&self, data_uri: &str) -> UpdateOutcome {
            self.avatar_calls.borrow_mut().push(data_uri.into());
            if let Some(message) = &self.refuse_with {
                return UpdateOutcome::failure(message.clone());
            }

            let username = self.profile.borrow().username().clone();
            *self.profile.borrow_mut() = Profile::new(username, Some(data_uri.into()));
            UpdateOutcome::success("ok")
        }

        fn update_username(&self, username: &str) -> UpdateOutcome {
            self.username_calls.borrow_mut().push(username.into());
            if let Some(message) = &self.refuse_with {
                return UpdateOutcome::failure(message.clone());
            }

            let avatar = self.profile.borrow().avatar().clone();
            *self.profile.borrow_mut() = Profile::new(username, avatar);
            UpdateOutcome::success("ok")
        }
    }

    struct FakeFavorites(Vec<FavoriteRecipe>);

    impl FavoritesStore for FakeFavorites {
        fn favorites(&self) -> repository::Result<Vec<FavoriteRecipe>> {
            Ok(self.0.clone())
        }
    }

    fn no_favorites() -> FakeFavorites {
        FakeFavorites(Vec::new())
    }

    fn mounted<'a>(
        profiles: &'a FakeProfiles,
        favorites: &'a FakeFavorites,
    ) -> ProfilePage<&'a FakeProfiles, &'a FakeFavorites> {
        let mut page = ProfilePage::new(profiles, favorites);
        page.mount().unwrap();
        page
    }

    #[test]
    fn test_mount_primes_username_buffer() {
        let profiles = FakeProfiles::new("oldname");
        let favorites = no_favorites();
        let page = mounted(&profiles, &favorites);

        assert_eq!(page.profile().unwrap().username(), "oldname");
        assert_eq!(page.username().buffer(), "oldname");
        assert_eq!(page.username().state(), EditState::Viewing);
    }

    #[tokio::test]
    async fn test_non_image_rejected_without_store_call() {
        let profiles = FakeProfiles::new("koki");
        let favorites = no_favorites();
        let mut page = mounted(&profiles, &favorites);

        for media_type in ["application/pdf", "text/plain", "video/mp4", ""] {
            let file = AvatarFile::new("upload", media_type, 10);

            assert!(matches!(
                page.change_avatar(&file).await,
                Err(Error::InvalidFileType { .. })
            ));
        }
        assert_eq!(profiles.calls(), 0);
    }

    #[tokio::test]
    async fn test_oversized_rejected_without_store_call() {
        let profiles = FakeProfiles::new("koki");
        let favorites = no_favorites();
        let mut page = mounted(&profiles, &favorites);

        let file = AvatarFile::new("huge.png", "image/png", MAX_AVATAR_BYTES + 1);
        let err = page.change_avatar(&file).await.unwrap_err();

        assert!(matches!(err, Error::FileTooLarge { .. }));
        assert_eq!(err.to_string(), "Ukuran file terlalu besar. Maksimal 5MB");
        assert_eq!(profiles.calls(), 0);
    }

    #[tokio::test]
    async fn test_valid_avatar_stored_once_and_reloaded() {
        let profiles = FakeProfiles::new("koki");
        let favorites = no_favorites();
        let mut page = mounted(&profiles, &favorites);

        let mut tmp = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        tmp.write_all(PNG).unwrap();
        let file = AvatarFile::from_path(tmp.path()).await.unwrap();

        page.change_avatar(&file).await.unwrap();

        let expected = encode_data_uri("image/png", PNG);
        assert_eq!(*profiles.avatar_calls.borrow(), [expected.clone()]);
        assert_eq!(
            page.profile().unwrap().avatar().as_deref(),
            Some(expected.as_str())
        );
    }

    #[test]
    fn test_refused_avatar_keeps_profile() {
        let profiles = FakeProfiles::refusing("koki", "penyimpanan penuh");
        let favorites = no_favorites();
        let mut page = mounted(&profiles, &favorites);

        let err = page
            .apply_avatar(&encode_data_uri("image/png", PNG))
            .unwrap_err();

        assert!(matches!(
            &err,
            Error::StoreOperationFailed {
                action: StoreAction::UpdateAvatar,
                message,
            } if message == "penyimpanan penuh"
        ));
        assert_eq!(err.to_string(), "Gagal mengupload foto: penyimpanan penuh");
        assert!(page.profile().unwrap().avatar().is_none());
        assert_eq!(profiles.avatar_calls.borrow().len(), 1);
    }

    #[test]
    fn test_blank_username_rejected() {
        let profiles = FakeProfiles::new("oldname");
        let favorites = no_favorites();
        let mut page = mounted(&profiles, &favorites);

        page.begin_username_edit();
        page.set_username_input("   ");

        assert!(matches!(page.save_username(), Err(Error::EmptyUsername)));
        assert_eq!(page.username().state(), EditState::Editing);
        assert_eq!(page.username().buffer(), "   ");
        assert_eq!(profiles.calls(), 0);
    }

    #[test]
    fn test_save_username_sends_untrimmed_and_reloads() {
        let profiles = FakeProfiles::new("oldname");
        let favorites = no_favorites();
        let mut page = mounted(&profiles, &favorites);

        page.begin_username_edit();
        assert_eq!(page.username().buffer(), "oldname");

        page.set_username_input(" newname ");
        page.save_username().unwrap();

        assert_eq!(*profiles.username_calls.borrow(), [" newname "]);
        assert_eq!(page.username().state(), EditState::Viewing);
        assert_eq!(page.profile().unwrap().username(), " newname ");
        assert_eq!(page.username().buffer(), " newname ");
    }

    #[test]
    fn test_refused_username_stays_editing() {
        let profiles = FakeProfiles::refusing("oldname", "sudah dipakai");
        let favorites = no_favorites();
        let mut page = mounted(&profiles, &favorites);

        page.begin_username_edit();
        page.set_username_input("newname");
        let err = page.save_username().unwrap_err();

        assert_eq!(err.to_string(), "Gagal mengubah username: sudah dipakai");
        assert_eq!(page.username().state(), EditState::Editing);
        assert_eq!(page.username().buffer(), "newname");
        assert_eq!(page.profile().unwrap().username(), "oldname");
    }

    #[test]
    fn test_cancel_restores_committed_username() {
        let profiles = FakeProfiles::new("oldname");
        let favorites = no_favorites();
        let mut page = mounted(&profiles, &favorites);

        page.begin_username_edit();
        page.set_username_input("newname");
        page.cancel_username_edit();

        assert_eq!(page.username().state(), EditState::Viewing);
        assert_eq!(page.username().buffer(), "oldname");
        assert_eq!(profiles.calls(), 0);
    }

    #[test]
    fn test_input_ignored_while_viewing() {
        let profiles = FakeProfiles::new("oldname");
        let favorites = no_favorites();
        let mut page = mounted(&profiles, &favorites);

        page.set_username_input("sneaky");
        page.save_username().unwrap();

        assert_eq!(page.username().buffer(), "oldname");
        assert_eq!(profiles.calls(), 0);
    }

    #[test]
    fn test_preview_truncates_without_mutating() {
        let profiles = FakeProfiles::new("koki");
        let favorites = FakeFavorites(
            (1..=9)
                .map(|id| FavoriteRecipe::new(id, RecipeKind::Makanan, format!("Resep {id}")))
                .collect(),
        );
        let page = mounted(&profiles, &favorites);

        let preview = page.favorites_preview();

        assert_eq!(preview.shown().len(), 6);
        assert_eq!(preview.remaining(), 3);
        assert_eq!(page.favorites().len(), 9);
    }

    #[test]
    fn test_same_id_in_both_categories_are_separate_cards() {
        let profiles = FakeProfiles::new("koki");
        let favorites = FakeFavorites(vec![
            FavoriteRecipe::new(5, RecipeKind::Makanan, "Sate Ayam"),
            FavoriteRecipe::new(5, RecipeKind::Minuman, "Es Jeruk"),
        ]);
        let page = mounted(&profiles, &favorites);

        let keys: Vec<FavoriteKey> = page.favorites_preview().cards().map(|c| c.key).collect();

        assert_eq!(
            keys,
            [
                FavoriteKey::new(5, RecipeKind::Makanan),
                FavoriteKey::new(5, RecipeKind::Minuman)
            ]
        );
        assert_ne!(keys.first(), keys.last());
    }

    #[test]
    fn test_select_favorite_forwards_id_and_kind() {
        let profiles = FakeProfiles::new("koki");
        let favorites = no_favorites();
        let selected = Arc::new(Mutex::new(Vec::new()));

        let mut page = ProfilePage::new(&profiles, &favorites).on_favorite_select({
            let selected = selected.clone();
            move |id, kind| selected.lock().push((id, kind))
        });

        page.select_favorite(&FavoriteRecipe::new(8, RecipeKind::Minuman, "Bajigur"));

        assert_eq!(*selected.lock(), [(8, RecipeKind::Minuman)]);
        assert_eq!(profiles.calls(), 0);
    }

    #[test]
    fn test_select_favorite_without_handler_is_noop() {
        let profiles = FakeProfiles::new("koki");
        let favorites = no_favorites();
        let mut page = mounted(&profiles, &favorites);

        page.select_favorite(&FavoriteRecipe::new(8, RecipeKind::Minuman, "Bajigur"));

        assert_eq!(page.favorites().len(), 0);
    }
}
