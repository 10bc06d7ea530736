use std::path::PathBuf;

use clap::Subcommand;
use colored::Colorize;
use resepku_lib::{
    Repository,
    avatar::AvatarFile,
    profile_page::{ProfilePage, Result, about},
};

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Show the profile and its about card
    Show,
    /// Change the username
    Rename { username: String },
    /// Upload a new avatar image
    Avatar { path: PathBuf },
    /// Remove the avatar
    ClearAvatar,
}

pub async fn handle(repo: &Repository, cmd: &Command) -> Result<()> {
    let (avatar_max_bytes, preview_len) = {
        let cfg = repo.cfg();
        let cfg = cfg.read();
        (cfg.avatar_max_bytes, cfg.favorites_preview)
    };
    let mut page = ProfilePage::new(repo, repo).with_limits(avatar_max_bytes, preview_len);
    page.mount()?;

    match cmd {
        Command::Show => show(repo, &page),
        Command::Rename { username } => {
            page.begin_username_edit();
            page.set_username_input(username.as_str());
            page.save_username()?;

            if let Some(profile) = page.profile() {
                println!("Username changed to {}", profile.username().bold());
            }
        }
        Command::Avatar { path } => {
            let file = AvatarFile::from_path(path.clone()).await?;
            page.change_avatar(&file).await?;

            println!("Avatar updated from {}", path.display());
        }
        Command::ClearAvatar => {
            repo.clear_avatar()?;
            println!("Avatar removed");
        }
    }

    Ok(())
}

fn show(repo: &Repository, page: &ProfilePage<&Repository, &Repository>) {
    let Some(profile) = page.profile() else {
        return;
    };
    let cfg = repo.cfg();
    let cfg = cfg.read();
    let card = &cfg.about;

    println!("{}", profile.username().bold());
    println!(
        "Avatar:    {}",
        if profile.avatar().is_some() { "set" } else { "none" }
    );
    println!("Bergabung: {}", about::joined_label(profile));

    if let Some(bio) = &card.bio {
        println!("\n{bio}");
    }

    let stats = about::stats(card, page.favorites().len());
    println!(
        "\n{} resep · {} favorit · {} pengikut",
        stats.recipes_shared, stats.favorites, stats.followers
    );

    for (label, value) in [
        ("Email", &card.email),
        ("Telepon", &card.phone),
        ("Lokasi", &card.location),
    ] {
        if let Some(value) = value {
            println!("{label:<10} {value}");
        }
    }

    for link in about::social_links(card) {
        println!("{:<10} {} ({})", link.network, link.handle, link.url.dimmed());
    }
}
