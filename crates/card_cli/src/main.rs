//! Command-line entry point for the card store.
//!
//! # Responsibility
//! - Drive `card_core` against a SQLite file for local administration.
//! - Print cards as JSON lines; print rejections as their user message.
//!
//! Exit codes: `0` success, `1` rejected input, `2` any other failure.

use anyhow::{Context, Result};
use card_core::db::open_db;
use card_core::{
    core_version, default_log_level, init_logging, CardService, CardServiceError,
    SqliteCardRepository,
};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "card_cli", version, about = "Manage stored payment cards")]
struct Cli {
    /// SQLite database file.
    #[arg(long, env = "CARD_DB", default_value = "cards.sqlite3")]
    db: PathBuf,

    /// Absolute directory for rolling log files; logging is off when unset.
    #[arg(long, env = "CARD_LOG_DIR")]
    log_dir: Option<String>,

    /// trace|debug|info|warn|error; defaults by build mode.
    #[arg(long, env = "CARD_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Validate and store a card.
    Add {
        number: String,
        month: String,
        /// Two-digit (`27`) or four-digit (`2027`) year.
        year: String,
        name: String,
    },
    /// Delete the card with this number; surrounding whitespace is ignored as in `add`.
    Remove { number: String },
    /// Print one card; surrounding whitespace is ignored as in `add`.
    Show { number: String },
    /// Print all cards ordered by number.
    List,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let rejection = err
                .downcast_ref::<CardServiceError>()
                .and_then(CardServiceError::rejection);
            match rejection {
                Some(rejection) => {
                    eprintln!("{rejection}");
                    ExitCode::from(1)
                }
                None => {
                    eprintln!("error: {err:#}");
                    ExitCode::from(2)
                }
            }
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).map_err(anyhow::Error::msg)?;
    }
    info!(
        "event=cli_start module=cli status=ok version={} db={}",
        core_version(),
        cli.db.display()
    );

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
    let service = CardService::new(SqliteCardRepository::new(&conn));

    match cli.command {
        Command::Add {
            number,
            month,
            year,
            name,
        } => {
            let card = service.create(number, month, year, name)?;
            println!("{}", serde_json::to_string(&card)?);
        }
        Command::Remove { number } => {
            let card = service.remove(number.trim())?;
            println!("{}", serde_json::to_string(&card)?);
        }
        Command::Show { number } => {
            let number = number.trim();
            match service.get(number)? {
                Some(card) => println!("{}", serde_json::to_string(&card)?),
                None => anyhow::bail!("no card with number ending in {}", last_four(number)),
            }
        }
        Command::List => {
            for card in service.list()? {
                println!("{}", serde_json::to_string(&card)?);
            }
        }
    }
    Ok(())
}

fn last_four(number: &str) -> &str {
    let start = number
        .char_indices()
        .rev()
        .nth(3)
        .map_or(0, |(index, _)| index);
    &number[start..]
}

#[cfg(test)]
mod tests {
    use super::{last_four, run, Cli, Command};
    use card_core::db::open_db;
    use card_core::{CardService, SqliteCardRepository};
    use clap::Parser;
    use std::path::Path;

    fn run_args(db: &Path, args: &[&str]) -> anyhow::Result<()> {
        let db = db.to_str().unwrap();
        let argv = ["card_cli", "--db", db].into_iter().chain(args.iter().copied());
        run(Cli::try_parse_from(argv).unwrap())
    }

    #[test]
    fn remove_and_show_ignore_surrounding_whitespace_like_add() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("cards.db");

        run_args(&db, &["add", " 1111222233334444", "12", "99", "Test Name"]).unwrap();
        run_args(&db, &["show", " 1111222233334444 "]).unwrap();
        run_args(&db, &["remove", " 1111222233334444"]).unwrap();

        let conn = open_db(&db).unwrap();
        let service = CardService::new(SqliteCardRepository::new(&conn));
        assert_eq!(service.count().unwrap(), 0);
    }

    #[test]
    fn parses_add_command() {
        let cli = Cli::try_parse_from([
            "card_cli",
            "--db",
            "/tmp/cards.db",
            "add",
            "1111222233334444",
            "08",
            "27",
            "Test Name",
        ])
        .unwrap();
        assert_eq!(cli.db.to_str(), Some("/tmp/cards.db"));
        match cli.command {
            Command::Add { number, year, .. } => {
                assert_eq!(number, "1111222233334444");
                assert_eq!(year, "27");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn last_four_handles_short_input() {
        assert_eq!(last_four("1111222233334444"), "4444");
        assert_eq!(last_four("12"), "12");
    }
}
