use iced::{
    Alignment, Element, Length,
    widget::{Column, button, column, container, keyed_column, row, space, text},
};
use resepku_lib::{
    profile_page::{FavoriteCard, FavoritesPreview, about},
    repository::{Profile, config::About},
};

use super::Message;

pub fn about_view(about: &About, profile: &Profile, favorites: usize) -> Element<'static, Message> {
    let stats = about::stats(about, favorites);

    let mut details = Column::new().spacing(6);
    for (label, value) in [
        ("Email", &about.email),
        ("Telepon", &about.phone),
        ("Lokasi", &about.location),
    ] {
        if let Some(value) = value {
            details = details.push(row![text(label).width(100), text(value.clone())]);
        }
    }
    details = details.push(row![
        text("Bergabung").width(100),
        text(about::joined_label(profile))
    ]);

    let bio: Element<'static, Message> = match &about.bio {
        Some(bio) => text(bio.clone()).into(),
        None => Column::new().into(),
    };

    card(
        column![
            bio,
            row![
                stat("Resep", stats.recipes_shared.to_string()),
                stat("Favorit", stats.favorites.to_string()),
                stat("Pengikut", stats.followers.to_string()),
            ]
            .spacing(32),
            details,
        ]
        .spacing(16),
    )
}

pub fn favorites_view(preview: FavoritesPreview<'_>) -> Element<'_, Message> {
    let header = row![
        text("Resep Favorit").size(20),
        space::horizontal(),
        button(text("Muat ulang"))
            .style(button::text)
            .on_press(Message::RefreshFavoritesPressed),
    ]
    .align_y(Alignment::Center);

    if preview.is_empty() {
        return card(column![
            header,
            text("Belum ada resep favorit. Tandai resep yang kamu suka untuk melihatnya di sini."),
        ]);
    }

    let cards = keyed_column(preview.cards().map(|c| (c.key, favorite_card(c)))).spacing(8);

    let footer: Element<'_, Message> = match preview.footer() {
        Some(footer) => text(footer).size(14).into(),
        None => Column::new().into(),
    };

    card(column![header, cards, footer].spacing(12))
}

fn favorite_card(card: FavoriteCard<'_>) -> Element<'_, Message> {
    let mut meta = row![
        text(card.category),
        text(format!("{} bahan", card.ingredient_count)),
        text(format!("{} langkah", card.step_count)),
    ]
    .spacing(12);
    for value in [card.cooking_time, card.difficulty, card.rating]
        .into_iter()
        .flatten()
    {
        meta = meta.push(text(value));
    }

    button(column![text(card.name).size(18), meta].spacing(4))
        .width(Length::Fill)
        .style(button::secondary)
        .on_press(Message::FavoriteSelected(card.key))
        .into()
}

pub fn social_view(about: &About) -> Element<'static, Message> {
    let links = about::social_links(about);
    if links.is_empty() {
        return Column::new().into();
    }

    card(
        Column::with_children(links.into_iter().map(|link| {
            row![text(link.network).width(100), text(link.handle), text(link.url).size(12)]
                .spacing(12)
                .align_y(Alignment::Center)
                .into()
        }))
        .spacing(8),
    )
}

fn stat(label: &'static str, value: String) -> Element<'static, Message> {
    column![text(value).size(24), text(label).size(12)]
        .align_x(Alignment::Center)
        .into()
}

fn card<'a>(content: impl Into<Element<'a, Message>>) -> Element<'a, Message> {
    container(content)
        .padding(16)
        .width(Length::Fill)
        .style(container::rounded_box)
        .into()
}
