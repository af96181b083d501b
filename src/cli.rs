// src/cli.rs
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::User;
use crate::pages::AuthForm;
use crate::session::Session;
use crate::storage::FileStore;
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Track the movies you watch, rate them and keep a list for later.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(arg_required_else_help = false)] // no subcommand launches the TUI
pub struct Cli {
    /// Directory holding the saved user, history and saved movies
    #[clap(long, global = true, value_parser)]
    pub data_dir: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Launch the Terminal User Interface (TUI)
    Tui,
    /// Print the watch history, most recent first
    History,
    /// Print the movies saved for later
    Saved,
    /// Show the signed-in user
    Whoami,
    /// Sign in without opening the TUI
    Login {
        #[clap(short, long)]
        email: String,
        #[clap(short, long)]
        name: Option<String>,
    },
    /// Sign out; history and saved movies are kept
    Logout,
    /// Delete every stored record (debug builds or `debug_tools = true`)
    Reset {
        /// Skip the confirmation prompt
        #[clap(short, long)]
        yes: bool,
    },
}

fn open_session(data_dir: &Path) -> Session<FileStore> {
    let (session, report) = Session::load(FileStore::new(data_dir));
    if let Some(e) = report.corruption {
        eprintln!("Stored data was corrupt and has been cleared: {}", e);
    }
    session
}

fn finish(session: &mut Session<FileStore>) -> AppResult<()> {
    match session.take_storage_warning() {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

/// Signs in with an already-read password and stores the user.
fn login_with_password(
    data_dir: &Path,
    email: &str,
    name: Option<&str>,
    password: String,
) -> AppResult<User> {
    let form = AuthForm {
        email: email.to_string(),
        name: name.unwrap_or_default().to_string(),
        password,
        ..AuthForm::default()
    };
    let user = form.submit().map_err(|e| {
        log::warn!("CLI login rejected: {}", e);
        AppError::Cli(e.to_string())
    })?;

    let mut session = open_session(data_dir);
    session.login(Some(user.clone()));
    finish(&mut session)?;
    Ok(user)
}

fn confirm(prompt: &str) -> AppResult<bool> {
    print!("{} (y/N): ", prompt);
    io::stdout().flush().map_err(|e| {
        log::error!("Failed to flush stdout for confirmation: {}", e);
        AppError::Cli(format!("Failed to flush stdout: {}", e))
    })?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer).map_err(|e| {
        log::error!("Failed to read confirmation: {}", e);
        AppError::Cli(format!("Failed to read confirmation: {}", e))
    })?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

/// Handles the parsed CLI command.
/// Returns `Ok(true)` if the TUI should run, `Ok(false)` if a CLI command was handled.
pub fn handle_cli_command(cli: &Cli, config: &Config) -> AppResult<bool> {
    log::debug!("Handling CLI command: {:?}", cli.command);
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.resolve_data_dir());

    match &cli.command {
        None | Some(Commands::Tui) => {
            log::info!("Preparing to launch TUI.");
            Ok(true)
        }
        Some(Commands::History) => {
            let session = open_session(&data_dir);
            let history = session.watch_history();
            if history.is_empty() {
                println!("No movies watched yet.");
            } else {
                println!("Watch history:");
                for entry in history {
                    let stars = "*".repeat(entry.rating as usize);
                    println!(
                        "  - {} ({}) [{}] watched {} {:<5}",
                        entry.title,
                        entry.year,
                        entry.genre,
                        entry.watch_date.format(&config.date_format),
                        stars
                    );
                }
            }
            log::info!("Listed {} history entries from {:?}.", history.len(), data_dir);
            Ok(false)
        }
        Some(Commands::Saved) => {
            let session = open_session(&data_dir);
            let saved = session.saved_movies();
            if saved.is_empty() {
                println!("No saved movies.");
            } else {
                println!("Saved for later:");
                for movie in saved {
                    println!("  - {} ({}) {}", movie.movie.title, movie.movie.year, movie.movie.runtime);
                }
            }
            Ok(false)
        }
        Some(Commands::Whoami) => {
            let session = open_session(&data_dir);
            match session.user() {
                Some(user) => println!("{} <{}>", user.name, user.email),
                None => println!("Not signed in."),
            }
            Ok(false)
        }
        Some(Commands::Login { email, name }) => {
            let password = rpassword::prompt_password("Password: ").map_err(|e| {
                log::error!("Failed to read password: {}", e);
                AppError::Cli(format!("Failed to read password: {}", e))
            })?;
            let user = login_with_password(&data_dir, email, name.as_deref(), password)?;
            println!("Signed in as {} <{}>.", user.name, user.email);
            Ok(false)
        }
        Some(Commands::Logout) => {
            let mut session = open_session(&data_dir);
            session.logout();
            finish(&mut session)?;
            println!("Signed out.");
            Ok(false)
        }
        Some(Commands::Reset { yes }) => {
            if !config.debug_tools_enabled() {
                log::warn!("Reset refused: debug tools are disabled");
                return Err(AppError::Cli(
                    "reset is only available in debug builds or with debug_tools = true".to_string(),
                ));
            }
            if !*yes && !confirm(&format!("Delete all data in {:?}?", data_dir))? {
                println!("Reset cancelled.");
                return Ok(false);
            }
            let mut session = open_session(&data_dir);
            session.reset();
            finish(&mut session)?;
            println!("All data cleared.");
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{self, KeyValueStore, USER_KEY};
    use tempfile::tempdir;

    fn run(args: &[&str], config: &Config) -> AppResult<bool> {
        let cli = Cli::try_parse_from(args).expect("valid arguments");
        handle_cli_command(&cli, config)
    }

    #[test]
    fn test_no_command_launches_tui() {
        assert!(run(&["reelnote"], &Config::default()).unwrap());
        assert!(run(&["reelnote", "tui"], &Config::default()).unwrap());
    }

    #[test]
    fn test_logout_removes_stored_user() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        store.set_item(USER_KEY, r#"{"id":1,"name":"a","email":"a@b.com"}"#).unwrap();

        let data_dir = dir.path().to_str().unwrap();
        assert!(!run(&["reelnote", "--data-dir", data_dir, "logout"], &Config::default()).unwrap());
        assert_eq!(store.get_item(USER_KEY).unwrap(), None);
    }

    #[test]
    fn test_reset_with_debug_tools_clears_keys() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().to_str().unwrap();
        let config = Config { debug_tools: true, ..Config::default() };
        let mut store = FileStore::new(dir.path());
        for key in storage::ALL_KEYS {
            store.set_item(key, "null").unwrap();
        }

        assert!(!run(&["reelnote", "--data-dir", data_dir, "reset", "--yes"], &config).unwrap());
        for key in storage::ALL_KEYS {
            assert_eq!(store.get_item(key).unwrap(), None);
        }
    }

    #[test]
    fn test_login_stores_user_for_whoami() {
        let dir = tempdir().unwrap();
        let user = login_with_password(dir.path(), "ada@example.com", None, "x".to_string()).unwrap();
        assert_eq!(user.name, "ada");

        let (session, _) = Session::load(FileStore::new(dir.path()));
        assert_eq!(session.user(), Some(&user));

        let data_dir = dir.path().to_str().unwrap();
        assert!(!run(&["reelnote", "--data-dir", data_dir, "whoami"], &Config::default()).unwrap());
    }

    #[test]
    fn test_login_without_password_is_rejected() {
        let dir = tempdir().unwrap();
        let err = login_with_password(dir.path(), "ada@example.com", Some("Ada"), String::new()).unwrap_err();
        assert!(matches!(err, AppError::Cli(ref msg) if msg == "Please fill in all required fields"));

        let store = FileStore::new(dir.path());
        assert_eq!(store.get_item(USER_KEY).unwrap(), None);
    }

    #[test]
    fn test_saved_lists_stored_movies() {
        let dir = tempdir().unwrap();
        let mut session = Session::new(FileStore::new(dir.path()));
        session.login(Some(User { id: 1, name: "a".to_string(), email: "a@b.com".to_string() }));
        let mut filters = crate::pages::SuggestionFilters::default();
        filters.toggle_genre("Drama");
        session.request_suggestions(&filters).unwrap();
        session.toggle_saved(1).unwrap();

        let data_dir = dir.path().to_str().unwrap();
        assert!(!run(&["reelnote", "--data-dir", data_dir, "saved"], &Config::default()).unwrap());
        let (reloaded, report) = Session::load(FileStore::new(dir.path()));
        assert!(report.corruption.is_none());
        assert_eq!(reloaded.saved_movies().len(), 1);
    }

    #[test]
    fn test_history_on_empty_store() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().to_str().unwrap();
        assert!(!run(&["reelnote", "--data-dir", data_dir, "history"], &Config::default()).unwrap());
    }
}
