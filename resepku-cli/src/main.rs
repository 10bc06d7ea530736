use clap::{Parser, Subcommand};
use colored::Colorize;
use resepku_lib::{Repository, profile_page::Error};
use sysexits::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod favorites;
mod profile;

#[derive(Parser, Debug)]
#[command(name = "resepku")]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Inspect or edit the user profile
    #[command(subcommand)]
    Profile(profile::Command),
    /// Manage favorite recipes
    #[command(subcommand)]
    Favorites(favorites::Command),
    /// Write a timestamped copy of the database
    Backup,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Human friendly panicking in release mode
    human_panic::setup_panic!();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    debug!("Running {:?}", cli.command);

    let repo = match Repository::new() {
        Ok(repo) => repo,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            return ExitCode::Software;
        }
    };

    let result = match &cli.command {
        Command::Profile(cmd) => profile::handle(&repo, cmd).await,
        Command::Favorites(cmd) => favorites::handle(&repo, cmd),
        Command::Backup => repo
            .backup()
            .map(|path| println!("Backup written to {}", path.display()))
            .map_err(Error::from),
    };

    match result {
        Ok(()) => ExitCode::Ok,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            exit_code(&e)
        }
    }
}

fn exit_code(error: &Error) -> ExitCode {
    match error {
        Error::InvalidFileType { .. } | Error::FileTooLarge { .. } | Error::EmptyUsername => {
            ExitCode::DataErr
        }
        Error::StoreOperationFailed { .. } => ExitCode::Unavailable,
        Error::Io(_) => ExitCode::NoInput,
        Error::Repository(_) => ExitCode::Software,
    }
}
