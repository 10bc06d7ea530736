use std::sync::mpsc;

use clap::{Args, Subcommand};
use colored::Colorize;
use resepku_lib::{
    Repository,
    profile_page::{FavoriteCard, ProfilePage, Result},
    repository::{FavoriteKey, FavoriteRecipe, RecipeKind},
};

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List favorite recipes as shown on the profile
    List {
        /// Show every favorite instead of the preview
        #[arg(short, long)]
        all: bool,
    },
    /// Mark a recipe as favorite
    Add(AddArgs),
    /// Unmark a favorite recipe
    Remove { id: u64, kind: RecipeKind },
    /// Print the details of a favorite recipe
    Open { id: u64, kind: RecipeKind },
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    id: u64,
    kind: RecipeKind,
    name: String,
    #[arg(long)]
    image_url: Option<String>,
    #[arg(long = "ingredient")]
    ingredients: Vec<String>,
    #[arg(long = "step")]
    steps: Vec<String>,
    #[arg(long)]
    difficulty: Option<String>,
    #[arg(long)]
    cooking_time: Option<String>,
    #[arg(long)]
    rating: Option<String>,
}

pub fn handle(repo: &Repository, cmd: &Command) -> Result<()> {
    match cmd {
        Command::List { all } => list(repo, *all)?,
        Command::Add(args) => {
            let recipe = recipe(args.clone());
            let key = recipe.key();

            if repo.add_favorite(recipe)? {
                println!("Added {} to favorites", key.to_string().bold());
            } else {
                println!("{key} is already a favorite");
            }
        }
        Command::Remove { id, kind } => {
            let key = FavoriteKey::new(*id, *kind);

            if repo.remove_favorite(key)? {
                println!("Removed {} from favorites", key.to_string().bold());
            } else {
                println!("{key} is not a favorite");
            }
        }
        Command::Open { id, kind } => open(repo, FavoriteKey::new(*id, *kind))?,
    }

    Ok(())
}

fn list(repo: &Repository, all: bool) -> Result<()> {
    let preview_len = if all {
        usize::MAX
    } else {
        repo.cfg().read().favorites_preview
    };
    let mut page = ProfilePage::new(repo, repo).with_limits(u64::MAX, preview_len);
    page.load_favorites()?;

    let preview = page.favorites_preview();

    if preview.is_empty() {
        println!("Belum ada resep favorit");
        return Ok(());
    }

    let footer = preview.footer();
    for card in preview.cards() {
        print_card(&card);
    }

    if let Some(footer) = footer {
        println!("\n{}", footer.dimmed());
    }

    Ok(())
}

fn open(repo: &Repository, key: FavoriteKey) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    let mut page = ProfilePage::new(repo, repo).on_favorite_select(move |id, kind| {
        // The receiver outlives the page
        let _ = tx.send(FavoriteKey::new(id, kind));
    });
    page.load_favorites()?;

    let Some(recipe) = page.favorites().iter().find(|r| r.key() == key).cloned() else {
        println!("{key} is not a favorite");
        return Ok(());
    };
    page.select_favorite(&recipe);

    for selected in rx.try_iter() {
        if selected == key {
            print_recipe(&recipe);
        }
    }

    Ok(())
}

fn recipe(args: AddArgs) -> FavoriteRecipe {
    let mut recipe = FavoriteRecipe::new(args.id, args.kind, args.name)
        .with_ingredients(args.ingredients)
        .with_steps(args.steps);

    if let Some(image_url) = args.image_url {
        recipe = recipe.with_image_url(image_url);
    }
    if let Some(difficulty) = args.difficulty {
        recipe = recipe.with_difficulty(difficulty);
    }
    if let Some(cooking_time) = args.cooking_time {
        recipe = recipe.with_cooking_time(cooking_time);
    }
    if let Some(rating) = args.rating {
        recipe = recipe.with_rating(rating);
    }

    recipe
}

fn print_card(card: &FavoriteCard) {
    println!(
        "{:<12} {} [{}]",
        card.key.to_string().dimmed(),
        card.name.bold(),
        card.category
    );
    println!(
        "{:<12} {} bahan · {} langkah",
        "", card.ingredient_count, card.step_count
    );

    let extras: Vec<&str> = [card.difficulty, card.cooking_time, card.rating]
        .into_iter()
        .flatten()
        .collect();
    if !extras.is_empty() {
        println!("{:<12} {}", "", extras.join(" · "));
    }
}

fn print_recipe(recipe: &FavoriteRecipe) {
    println!("{} [{}]", recipe.name().bold(), recipe.kind().label());

    if !recipe.image_url().is_empty() {
        println!("{}", recipe.image_url().dimmed());
    }

    println!("\n{}", "Bahan".underline());
    for ingredient in recipe.ingredients() {
        println!("  - {ingredient}");
    }

    println!("\n{}", "Langkah".underline());
    for (n, step) in recipe.steps().iter().enumerate() {
        println!("  {}. {step}", n.saturating_add(1));
    }
}
