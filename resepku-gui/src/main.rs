use iced::{
    Element,
    Length::Fill,
    Task, Theme, application,
    widget::{button, column, container, text},
};
use resepku_lib::{Repository, repository::FavoriteKey};
use tracing::{Level, error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::{
    components::profile_page::{self, ProfilePage},
    config::GuiConfig,
};

pub mod components;
pub mod config;

fn main() -> iced::Result {
    // Human friendly panicking in release mode
    human_panic::setup_panic!();

    // Logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    application(App::new, App::update, App::view)
        .theme(App::theme)
        .title(App::title)
        .run()
}

#[derive(Debug, Clone)]
enum Message {
    ProfilePage(profile_page::Message),
    BackPressed,
}

enum Screen {
    /// The repository couldn't be opened
    Error(String),
    Profile,
    Recipe(FavoriteKey),
}

struct App {
    title: String,
    theme: Theme,
    screen: Screen,
    // Components
    profile_page: Option<ProfilePage>,
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        let theme = GuiConfig::load().theme();

        let (screen, profile_page) = match Repository::new() {
            Ok(repo) => (Screen::Profile, Some(ProfilePage::new(repo))),
            Err(e) => {
                error!("Failed to open repository: {e}");
                (Screen::Error(e.to_string()), None)
            }
        };

        (
            Self {
                title: "Resepku".into(),
                theme,
                screen,
                profile_page,
            },
            Task::none(),
        )
    }

    // Update application state based on messages passed by view()
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            // Redirect messages to relevant child components
            Message::ProfilePage(msg) => {
                let Some(page) = &mut self.profile_page else {
                    return Task::none();
                };

                match page.update(msg) {
                    profile_page::Action::None => Task::none(),
                    profile_page::Action::Run(task) => task.map(Message::ProfilePage),
                    profile_page::Action::OpenRecipe(key) => {
                        info!("Opening recipe {key}");
                        self.screen = Screen::Recipe(key);
                        Task::none()
                    }
                }
            }
            Message::BackPressed => {
                self.screen = Screen::Profile;
                Task::none()
            }
        }
    }

    // Render the application and pass along messages from components to update()
    pub fn view(&self) -> Element<'_, Message> {
        match (&self.screen, &self.profile_page) {
            (Screen::Profile, Some(page)) => page.view().map(Message::ProfilePage),
            (Screen::Recipe(key), _) => column![
                button(text("Kembali")).on_press(Message::BackPressed),
                text(format!("Resep {} ({})", key.id, key.kind.label())).size(24),
            ]
            .spacing(16)
            .padding(24)
            .into(),
            (Screen::Error(e), _) => container(text(format!("Gagal membuka data: {e}")))
                .center(Fill)
                .into(),
            (Screen::Profile, None) => container(text("Memuat...")).center(Fill).into(),
        }
    }

    pub fn title(&self) -> String {
        self.title.clone()
    }

    pub fn theme(&self) -> Theme {
        self.theme.clone()
    }
}
