use std::path::PathBuf;

use iced::{
    Alignment, Element, Length, Task,
    widget::{Column, button, column, container, image, row, scrollable, space, text, text_input},
};
use resepku_lib::{
    Repository,
    avatar::{AvatarFile, decode_data_uri},
    profile_page as page,
    repository::{FavoriteKey, config::Cfg},
};
use rfd::AsyncFileDialog;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tracing::error;

mod cards;

type Page = page::ProfilePage<Repository, Repository>;

#[derive(Debug, Clone)]
pub enum Message {
    AvatarPressed,
    AvatarPicked(Option<PathBuf>),
    AvatarDescribed(Result<AvatarFile, String>),
    AvatarEncoded(Result<String, String>),
    EditUsernamePressed,
    UsernameInput(String),
    SaveUsernamePressed,
    CancelUsernamePressed,
    FavoriteSelected(FavoriteKey),
    RefreshFavoritesPressed,
    NoticeDismissed,
}

/// Action used for communicating with the parent component
pub enum Action {
    None,
    Run(Task<Message>),
    OpenRecipe(FavoriteKey),
}

pub struct ProfilePage {
    page: Page,
    cfg: Cfg,
    /// Favorites the page handed upward, drained after every selection
    selections: UnboundedReceiver<FavoriteKey>,
    avatar: Option<image::Handle>,
    /// Last user-facing error
    notice: Option<String>,
}

impl ProfilePage {
    pub fn new(repo: Repository) -> Self {
        let cfg = repo.cfg();
        let (avatar_max_bytes, preview_len) = {
            let cfg = cfg.read();
            (cfg.avatar_max_bytes, cfg.favorites_preview)
        };
        let (sender, selections) = unbounded_channel();

        let mut page = Page::new(repo.clone(), repo)
            .with_limits(avatar_max_bytes, preview_len)
            .on_favorite_select(move |id, kind| {
                // The receiver lives as long as this component does
                let _ = sender.send(FavoriteKey::new(id, kind));
            });

        let notice = page.mount().err().map(|e| {
            error!("Failed to load profile page: {e}");
            e.to_string()
        });

        let mut this = Self {
            page,
            cfg,
            selections,
            avatar: None,
            notice,
        };
        this.refresh_avatar();

        this
    }

    pub fn update(&mut self, message: Message) -> Action {
        match message {
            Message::AvatarPressed => Action::Run(Task::perform(
                async {
                    AsyncFileDialog::new()
                        .add_filter("Gambar", &["png", "jpg", "jpeg", "gif", "webp", "bmp"])
                        .pick_file()
                        .await
                        .map(|handle| handle.path().to_path_buf())
                },
                Message::AvatarPicked,
            )),
            // Dialog dismissed
            Message::AvatarPicked(None) => Action::None,
            Message::AvatarPicked(Some(path)) => Action::Run(Task::perform(
                async move {
                    AvatarFile::from_path(path)
                        .await
                        .map_err(|e| e.to_string())
                },
                Message::AvatarDescribed,
            )),
            Message::AvatarDescribed(Err(e)) | Message::AvatarEncoded(Err(e)) => {
                self.notice = Some(e);
                Action::None
            }
            Message::AvatarDescribed(Ok(file)) => match self.page.validate_avatar(&file) {
                Ok(()) => {
                    let limit = self.page.avatar_max_bytes();
                    Action::Run(Task::perform(
                        async move {
                            file.read_data_uri(limit)
                                .await
                                .map_err(|e| e.to_string())
                        },
                        Message::AvatarEncoded,
                    ))
                }
                Err(e) => {
                    self.notice = Some(e.to_string());
                    Action::None
                }
            },
            Message::AvatarEncoded(Ok(data_uri)) => {
                let result = self.page.apply_avatar(&data_uri);
                self.report(result);
                self.refresh_avatar();
                Action::None
            }
            Message::EditUsernamePressed => {
                self.page.begin_username_edit();
                Action::None
            }
            Message::UsernameInput(content) => {
                self.page.set_username_input(content);
                Action::None
            }
            Message::SaveUsernamePressed => {
                let result = self.page.save_username();
                self.report(result);
                Action::None
            }
            Message::CancelUsernamePressed => {
                self.page.cancel_username_edit();
                self.notice = None;
                Action::None
            }
            Message::FavoriteSelected(key) => {
                let recipe = self
                    .page
                    .favorites()
                    .iter()
                    .find(|f| f.key() == key)
                    .cloned();
                if let Some(recipe) = recipe {
                    self.page.select_favorite(&recipe);
                }

                match self.selections.try_recv() {
                    Ok(key) => Action::OpenRecipe(key),
                    Err(_) => Action::None,
                }
            }
            Message::RefreshFavoritesPressed => {
                let result = self.page.load_favorites();
                self.report(result);
                Action::None
            }
            Message::NoticeDismissed => {
                self.notice = None;
                Action::None
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let Some(profile) = self.page.profile() else {
            return container(text(self.notice.as_deref().unwrap_or("Memuat...")))
                .center(Length::Fill)
                .into();
        };

        let about = self.cfg.read().about.clone();

        let content = column![
            text("Profil Pengguna").size(28),
            row![self.avatar_view(), self.username_view(profile.username())]
                .spacing(20)
                .align_y(Alignment::Center),
            self.notice_view(),
            cards::about_view(&about, profile, self.page.favorites().len()),
            cards::favorites_view(self.page.favorites_preview()),
            cards::social_view(&about),
        ]
        .spacing(24)
        .padding(24);

        scrollable(content).into()
    }

    fn avatar_view(&self) -> Element<'_, Message> {
        let picture: Element<'_, Message> = match &self.avatar {
            Some(handle) => image(handle.clone()).width(120).height(120).into(),
            None => container(text("Foto").size(20)).center(120).into(),
        };

        column![
            picture,
            button(text("Ganti foto")).on_press(Message::AvatarPressed)
        ]
        .spacing(8)
        .align_x(Alignment::Center)
        .into()
    }

    fn username_view<'a>(&'a self, committed: &'a str) -> Element<'a, Message> {
        let editor = self.page.username();
        if editor.is_editing() {
            row![
                text_input("Username", editor.buffer())
                    .on_input(Message::UsernameInput)
                    .on_submit(Message::SaveUsernamePressed)
                    .width(240),
                button(text("Simpan")).on_press(Message::SaveUsernamePressed),
                button(text("Batal"))
                    .style(button::secondary)
                    .on_press(Message::CancelUsernamePressed),
            ]
            .spacing(8)
            .into()
        } else {
            row![
                text(committed).size(24),
                button(text("Ubah"))
                    .style(button::text)
                    .on_press(Message::EditUsernamePressed),
            ]
            .spacing(8)
            .align_y(Alignment::Center)
            .into()
        }
    }

    fn notice_view(&self) -> Element<'_, Message> {
        match &self.notice {
            Some(notice) => container(
                row![
                    text(notice),
                    space::horizontal(),
                    button(text("Tutup"))
                        .style(button::text)
                        .on_press(Message::NoticeDismissed),
                ]
                .align_y(Alignment::Center),
            )
            .padding(12)
            .style(container::bordered_box)
            .into(),
            None => Column::new().into(),
        }
    }

    /// Surface a failed action to the user
    fn report(&mut self, result: page::Result<()>) {
        self.notice = match result {
            Ok(()) => None,
            Err(e) => Some(e.to_string()),
        };
    }

    /// Rebuild the avatar image from the loaded profile
    fn refresh_avatar(&mut self) {
        self.avatar = self
            .page
            .profile()
            .and_then(|p| p.avatar().as_deref())
            .and_then(decode_data_uri)
            .map(|(_, bytes)| image::Handle::from_bytes(bytes));
    }
}
