use colored::Colorize;
use env_logger::Env;
use log::{error, info, warn};
use std::io;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Only the deck half of the core is used here.
#[allow(dead_code)]
mod liboboeru;
use crate::liboboeru::deck::{Card, Deck, DeckError, DELIMITER};

#[derive(Parser, Debug)]
#[command(name = "デッキ (Dekki)")]
#[command(version, about = "Check, export and import oboeru decks", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every line of a deck that does not produce a card.
    Check { deck: PathBuf },
    /// Write a deck as JSON.
    Export {
        deck: PathBuf,
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Turn a JSON card list into a deck file.
    Import {
        json: PathBuf,
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Error)]
enum Error {
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error("cannot access {path:?}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize, Debug)]
struct DeckJson {
    cards: Vec<CardJson>,
}
#[derive(Serialize, Deserialize, Debug)]
struct CardJson {
    front: Option<String>,
    back: Option<String>,
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level)).init();

    let result = match args.command {
        Commands::Check { deck } => check(&deck),
        Commands::Export { deck, output } => export(&deck, output.as_deref()),
        Commands::Import { json, output } => import(&json, output.as_deref()),
    };

    if let Err(err) = result {
        error!("{}", format!("{}", err).red());
        std::process::exit(1);
    }
}

fn read(path: &Path) -> Result<String, Error> {
    std::fs::read_to_string(path).map_err(|source| Error::File {
        path: path.to_path_buf(),
        source,
    })
}

fn write(output: Option<&Path>, content: &str) -> Result<(), Error> {
    match output {
        Some(path) => {
            std::fs::write(path, content).map_err(|source| Error::File {
                path: path.to_path_buf(),
                source,
            })?;
            info!("{}", format!("Wrote {:?}", path).cyan());
        }
        None => print!("{}", content),
    }
    Ok(())
}

fn check(path: &Path) -> Result<(), Error> {
    let (deck, malformed) = Deck::scan(&Deck::read(path)?);

    info!("{}", format!("Checking {:?}", path).cyan());
    for line in &malformed {
        warn!(
            "{}",
            format!(
                "├ ✘ Line {} ({} parts): {:?}",
                line.line_number, line.parts, line.content
            )
            .red()
        );
    }
    let summary = format!("{} cards, {} lines dropped", deck.len(), malformed.len());
    if malformed.is_empty() {
        info!("{}", summary.green());
    } else {
        info!("{}", summary.yellow());
    }
    Ok(())
}

fn export(path: &Path, output: Option<&Path>) -> Result<(), Error> {
    let deck = Deck::load(path)?;
    info!(
        "{}",
        format!("Exporting {} cards from {:?}", deck.len(), path).blue()
    );
    let mut json = serde_json::to_string_pretty(&deck)?;
    json.push('\n');
    write(output, &json)
}

fn import(path: &Path, output: Option<&Path>) -> Result<(), Error> {
    let content: DeckJson = serde_json::from_str(&read(path)?)?;
    info!(
        "{}",
        format!("Importing data... ({} Cards)", content.cards.len()).blue()
    );

    let deck: Deck = content
        .cards
        .iter()
        .filter_map(|card| match to_card(card) {
            Some(c) => {
                info!("{}", format!("├ Card: {} / {}", c.front(), c.back()).green());
                Some(c)
            }
            None => {
                error!(
                    "{}",
                    format!(
                        "├ ✘ Card: {:?} (Missing `front` or `back`, or contains `{}`)",
                        card, DELIMITER
                    )
                    .red()
                    .strikethrough()
                );
                None
            }
        })
        .collect();

    write(output, &deck.to_text())
}

fn to_card(card: &CardJson) -> Option<Card> {
    let (front, back) = (card.front.as_deref()?, card.back.as_deref()?);
    if front.contains(DELIMITER) || back.contains(DELIMITER) {
        return None;
    }
    Card::new(front, back)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card_json(front: Option<&str>, back: Option<&str>) -> CardJson {
        CardJson {
            front: front.map(str::to_string),
            back: back.map(str::to_string),
        }
    }

    #[test]
    fn to_card_rejects_unrepresentable_cards() {
        assert!(to_card(&card_json(Some("a"), None)).is_none());
        assert!(to_card(&card_json(None, Some("b"))).is_none());
        assert!(to_card(&card_json(Some("  "), Some("b"))).is_none());
        assert!(to_card(&card_json(Some("a|::|b"), Some("c"))).is_none());

        let card = to_card(&card_json(Some(" a "), Some("b"))).unwrap();
        assert_eq!((card.front(), card.back()), ("a", "b"));
    }

    #[test]
    fn export_writes_fronts_and_backs_without_rank() {
        let deck = Deck::parse("cat|::|gato");
        let json = serde_json::to_value(&deck).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "cards": [{ "front": "cat", "back": "gato" }] })
        );
    }

    #[test]
    fn import_then_load_gives_back_valid_cards() {
        let dir = tempfile::tempdir().unwrap();
        let json_path = dir.path().join("import.json");
        let deck_path = dir.path().join("import.txt");
        std::fs::write(
            &json_path,
            r#"{"cards":[{"front":"sun","back":"taiyou"},{"front":"bad"},{"front":"x|::|y","back":"z"}]}"#,
        )
        .unwrap();

        import(&json_path, Some(&deck_path)).unwrap();
        let deck = Deck::load(&deck_path).unwrap();
        assert_eq!(deck.len(), 1);
        assert_eq!(deck.get(0).unwrap().back(), "taiyou");
    }

    #[test]
    fn check_missing_deck_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = check(&dir.path().join("missing.txt"));
        assert!(matches!(result, Err(Error::Deck(_))));
    }
}
