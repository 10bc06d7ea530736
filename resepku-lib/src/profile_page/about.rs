use chrono::Datelike;

use crate::repository::{Profile, config::About};

/// A link to one of the user's social media accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialLink {
    pub network: &'static str,
    /// Handle exactly as configured
    pub handle: String,
    pub url: String,
}

/// Counters shown under the bio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub recipes_shared: u32,
    pub favorites: usize,
    pub followers: u32,
}

pub fn stats(about: &About, favorites: usize) -> Stats {
    Stats {
        recipes_shared: about.recipes_shared,
        favorites,
        followers: about.followers,
    }
}

/// Links for every configured social handle, in a fixed order.
pub fn social_links(about: &About) -> Vec<SocialLink> {
    let social = &about.social;
    let mut links = Vec::new();

    if let Some(handle) = &social.instagram {
        links.push(SocialLink {
            network: "Instagram",
            handle: handle.clone(),
            url: format!("https://instagram.com/{}", handle.trim_start_matches('@')),
        });
    }
    if let Some(handle) = &social.github {
        links.push(SocialLink {
            network: "GitHub",
            handle: handle.clone(),
            url: format!("https://github.com/{handle}"),
        });
    }
    if let Some(handle) = &social.linkedin {
        links.push(SocialLink {
            network: "LinkedIn",
            handle: handle.clone(),
            url: format!("https://linkedin.com/in/{handle}"),
        });
    }

    links
}

/// When the user joined, e.g. "Januari 2024".
pub fn joined_label(profile: &Profile) -> String {
    let joined = profile.joined_at();
    format!("{} {}", month_name(joined.month()), joined.year())
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "Januari",
        2 => "Februari",
        3 => "Maret",
        4 => "April",
        5 => "Mei",
        6 => "Juni",
        7 => "Juli",
        8 => "Agustus",
        9 => "September",
        10 => "Oktober",
        11 => "November",
        _ => "Desember",
    }
}
