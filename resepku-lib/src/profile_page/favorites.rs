use crate::repository::{FavoriteKey, FavoriteRecipe};

/// How many favorites the profile page shows by default
pub const FAVORITES_PREVIEW_LEN: usize = 6;

/// The leading slice of the favorites list that fits on the profile page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FavoritesPreview<'a> {
    shown: &'a [FavoriteRecipe],
    total: usize,
}

impl<'a> FavoritesPreview<'a> {
    pub(crate) fn new(favorites: &'a [FavoriteRecipe], limit: usize) -> Self {
        Self {
            shown: favorites.get(..limit).unwrap_or(favorites),
            total: favorites.len(),
        }
    }

    pub fn shown(&self) -> &'a [FavoriteRecipe] {
        self.shown
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Favorites left off the page
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.shown.len())
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Cards for the shown favorites
    pub fn cards(self) -> impl Iterator<Item = FavoriteCard<'a>> {
        self.shown.iter().map(FavoriteCard::from)
    }

    /// Note pointing to the favorites page, only when some favorites were left off.
    pub fn footer(&self) -> Option<String> {
        (self.remaining() > 0).then(|| {
            format!(
                "Menampilkan {} dari {} resep favorit. Lihat semua di halaman Favorit.",
                self.shown.len(),
                self.total
            )
        })
    }
}

/// What a single favorite card displays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FavoriteCard<'a> {
    /// Unique across categories, suitable as a widget key
    pub key: FavoriteKey,
    pub name: &'a str,
    pub image_url: &'a str,
    pub category: &'static str,
    pub ingredient_count: usize,
    pub step_count: usize,
    pub difficulty: Option<&'a str>,
    pub cooking_time: Option<&'a str>,
    pub rating: Option<&'a str>,
}

impl<'a> From<&'a FavoriteRecipe> for FavoriteCard<'a> {
    fn from(recipe: &'a FavoriteRecipe) -> Self {
        Self {
            key: recipe.key(),
            name: recipe.name(),
            image_url: recipe.image_url(),
            category: recipe.kind().label(),
            ingredient_count: recipe.ingredients().len(),
            step_count: recipe.steps().len(),
            difficulty: recipe.difficulty().as_deref(),
            cooking_time: recipe.cooking_time().as_deref(),
            rating: recipe.rating().as_deref(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::{FAVORITES_PREVIEW_LEN, FavoritesPreview};
    use crate::repository::{FavoriteRecipe, RecipeKind};

    fn favorites(n: u64) -> Vec<FavoriteRecipe> {
        (1..=n)
            .map(|id| FavoriteRecipe::new(id, RecipeKind::Makanan, format!("Resep {id}")))
            .collect()
    }

    #[test]
    fn test_nine_favorites_show_six() {
        let favorites = favorites(9);
        let preview = FavoritesPreview::new(&favorites, FAVORITES_PREVIEW_LEN);

        assert_eq!(preview.shown().len(), 6);
        assert_eq!(preview.shown().first().unwrap().name(), "Resep 1");
        assert_eq!(preview.shown().last().unwrap().name(), "Resep 6");
        assert_eq!(preview.total(), 9);
        assert_eq!(preview.remaining(), 3);
        assert_eq!(
            preview.footer().as_deref(),
            Some("Menampilkan 6 dari 9 resep favorit. Lihat semua di halaman Favorit.")
        );
        assert_eq!(favorites.len(), 9);
    }

    #[test]
    fn test_short_list_has_no_footer() {
        let favorites = favorites(4);
        let preview = FavoritesPreview::new(&favorites, FAVORITES_PREVIEW_LEN);

        assert_eq!(preview.shown().len(), 4);
        assert_eq!(preview.remaining(), 0);
        assert!(preview.footer().is_none());
        assert!(!preview.is_empty());
    }

    #[test]
    fn test_exactly_six_has_no_footer() {
        let favorites = favorites(6);
        let preview = FavoritesPreview::new(&favorites, FAVORITES_PREVIEW_LEN);

        assert_eq!(preview.shown().len(), 6);
        assert_eq!(preview.remaining(), 0);
        assert!(preview.footer().is_none());
    }

    #[test]
    fn test_seven_shows_footer() {
        let favorites = favorites(7);
        let preview = FavoritesPreview::new(&favorites, FAVORITES_PREVIEW_LEN);

        assert_eq!(preview.shown().len(), 6);
        assert_eq!(preview.remaining(), 1);
        assert_eq!(
            preview.footer().as_deref(),
            Some("Menampilkan 6 dari 7 resep favorit. Lihat semua di halaman Favorit.")
        );
    }

    #[test]
    fn test_empty() {
        let preview = FavoritesPreview::new(&[], FAVORITES_PREVIEW_LEN);

        assert!(preview.is_empty());
        assert_eq!(preview.cards().count(), 0);
    }

    #[test]
    fn test_card_counts() {
        let recipe = FavoriteRecipe::new(2, RecipeKind::Minuman, "Es Dawet")
            .with_ingredients(vec!["cendol".into(), "santan".into(), "gula merah".into()])
            .with_steps(vec!["campur".into()])
            .with_cooking_time("15 menit");
        let favorites = [recipe];
        let card = FavoritesPreview::new(&favorites, FAVORITES_PREVIEW_LEN)
            .cards()
            .next()
            .unwrap();

        assert_eq!(card.category, "Minuman");
        assert_eq!(card.ingredient_count, 3);
        assert_eq!(card.step_count, 1);
        assert_eq!(card.cooking_time, Some("15 menit"));
        assert_eq!(card.rating, None);
    }
}
