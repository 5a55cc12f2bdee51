use cfg_if::cfg_if;
use clap::Parser;
use colored::Colorize;
use env_logger::Env;
use log::{debug, error};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

mod cli;
#[cfg(feature = "gui")]
mod gui;
mod liboboeru;

use crate::liboboeru::deck::{Deck, DeckError};
use crate::liboboeru::session::Session;

#[derive(Parser, Debug)]
#[command(name = "覚える (Oboeru)")]
#[command(version, about, long_about = None)]
struct Args {
    /// Deck file, one `front|::|back` card per line.
    #[arg(value_name = "FILE", default_value = "flashcards.txt")]
    deck: PathBuf,
    #[arg(short, long, default_value = "error")]
    log_level: String,
    /// Study in the terminal instead of opening a window.
    #[cfg(feature = "gui")]
    #[arg(long)]
    cli: bool,
    /// Extra font for the window, e.g. a CJK font for Japanese decks.
    #[cfg(feature = "gui")]
    #[arg(long, value_name = "FILE")]
    font: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub(crate) enum Error {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[cfg(feature = "gui")]
    #[error("window failed: {0}")]
    Gui(#[from] eframe::Error),
}

fn main() -> Result<(), Error> {
    //INIT START
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.as_str()))
        .init();
    debug!("[Setup] {:?}", args);

    let deck = match Deck::load(&args.deck) {
        Ok(deck) => deck,
        Err(err) => {
            error!("[Setup] {}", err);
            eprintln!("{}", format!("Failed to load flashcards: {}", err).bright_red());
            show_failure(&args, &err)?;
            std::process::exit(1);
        }
    };

    let session = Session::new(deck);
    // INIT DONE

    study(&args, session)
}

fn study_in_terminal(mut session: Session) -> Result<(), Error> {
    cli::cli_loop(&mut session, io::stdin().lock(), &mut io::stdout().lock())
}

cfg_if! {
    if #[cfg(feature = "gui")] {
        fn study(args: &Args, session: Session) -> Result<(), Error> {
            if args.cli {
                study_in_terminal(session)
            } else {
                gui::init_gui(session, args.font.as_deref())
            }
        }

        fn show_failure(args: &Args, err: &DeckError) -> Result<(), Error> {
            if args.cli {
                Ok(())
            } else {
                gui::show_load_failure(err, args.font.as_deref())
            }
        }
    } else {
        fn study(_args: &Args, session: Session) -> Result<(), Error> {
            study_in_terminal(session)
        }

        fn show_failure(_args: &Args, _err: &DeckError) -> Result<(), Error> {
            Ok(())
        }
    }
}
