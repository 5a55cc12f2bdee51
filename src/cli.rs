use crate::liboboeru::deck::{Card, LEARNED_RANK, RANK_NAMES};
use crate::liboboeru::session::{Intent, Mark, Session, Snapshot};
use crate::Error;
use colored::Colorize;
use log::{debug, warn};
use std::io::{BufRead, Write};

#[derive(Debug, PartialEq)]
enum Command {
    Intent(Intent),
    Quit,
    Unknown,
}

impl Command {
    fn from_str(input: &str) -> Command {
        match input.trim().to_lowercase().as_str() {
            "r" | "s" => Command::Intent(Intent::Reveal),
            "g" | "+" => Command::Intent(Intent::Mark(Mark::Good)),
            "b" | "-" => Command::Intent(Intent::Mark(Mark::Bad)),
            "q" => Command::Quit,
            _ => Command::Unknown,
        }
    }
}

pub(crate) fn progress_line(snap: &Snapshot) -> String {
    (0..=LEARNED_RANK)
        .map(|rank| format!("{}: {}", RANK_NAMES[rank as usize], snap.counts[rank as usize]))
        .collect::<Vec<_>>()
        .join(" | ")
}

fn render(out: &mut impl Write, snap: &Snapshot) -> Result<(), Error> {
    writeln!(out, "{}", progress_line(snap).cyan())?;
    let (Some(front), Some(rank)) = (&snap.front, snap.rank) else {
        return Ok(());
    };

    let leading = format!("{}/{}. ", snap.position + 1, snap.total);
    writeln!(
        out,
        "{}{}",
        leading.cyan(),
        format!("{} ({})", front, rank).black().bold().on_white()
    )?;
    if let Some(back) = &snap.back {
        writeln!(out, "{}{}", " ".repeat(leading.len()), back.bright_green())?;
    }
    Ok(())
}

/// Runs a study session over `input` until the deck is learned, `q` is
/// entered, or `input` runs dry.
pub fn cli_loop<R: BufRead, W: Write>(
    session: &mut Session,
    mut input: R,
    out: &mut W,
) -> Result<(), Error> {
    if session.is_empty() {
        warn!("[CLI] Deck has no cards.");
        writeln!(
            out,
            "{}",
            "This deck has no cards. Every line should look like `front|::|back`.".yellow()
        )?;
        return Ok(());
    }

    let mut snap = session.snapshot();
    render(out, &snap)?;

    let mut line = String::new();
    while !snap.completed {
        write!(out, "{} ", "(r)eveal, (g)ood, (b)ad, (q)uit:".cyan())?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            debug!("[CLI] Input closed.");
            writeln!(out)?;
            writeln!(out, "{}", "Quitting Early!".cyan())?;
            return Ok(());
        }
        let command = Command::from_str(&line);
        debug!("[CLI] command: {:?}", command);

        match command {
            Command::Intent(intent) => {
                let marked = snap.position;
                snap = session.handle_intent(intent);
                if let (Intent::Mark(mark), Some(card)) = (intent, session.card(marked)) {
                    print_mark(out, mark, card)?;
                }
                render(out, &snap)?;
            }
            Command::Quit => {
                writeln!(out, "{}", "Quitting Early!".cyan())?;
                return Ok(());
            }
            Command::Unknown => {
                writeln!(
                    out,
                    "{}",
                    format!("Unknown command {:?}.", line.trim()).bright_red()
                )?;
            }
        }
    }

    writeln!(out, "{}", "==========> Congratulations! <==========".bright_green().bold())?;
    writeln!(out, "{}", "You have learned all the flashcards.".bright_green())?;
    Ok(())
}

fn print_mark(out: &mut impl Write, mark: Mark, card: &Card) -> Result<(), Error> {
    let message = format!("Card {} has a learning level of {}", card.front(), card.rank());
    match mark {
        Mark::Good => writeln!(out, "{} {}", "Good!".bright_green(), message)?,
        Mark::Bad => writeln!(out, "{} {}", "Bad!".bright_red(), message)?,
    }
    Ok(())
}
