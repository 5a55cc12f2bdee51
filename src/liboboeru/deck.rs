use log::{debug, info};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

/// Separator between the front and the back of a card on a deck line.
pub const DELIMITER: &str = "|::|";

pub type Rank = u8;

/// Ceiling for [`Card::promote`]. Only ranks up to [`LEARNED_RANK`] are shown.
pub const MAX_RANK: Rank = 4;
/// A deck is finished once every card sits exactly at this rank.
pub const LEARNED_RANK: Rank = 3;

/// Progress tiers shown to the user, indexed by rank.
pub const RANK_NAMES: [&str; LEARNED_RANK as usize + 1] =
    ["Unlearned", "Slightly Learned", "Nearly Learned", "Learned"];

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("cannot read deck {path:?}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A deck line that did not produce a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine {
    /// 1-based.
    pub line_number: usize,
    pub content: String,
    /// How many pieces the line split into around [`DELIMITER`].
    pub parts: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    front: String,
    back: String,
    #[serde(skip)]
    rank: Rank,
}

impl Card {
    /// Trims both faces. Returns `None` if either face ends up empty.
    pub fn new(front: &str, back: &str) -> Option<Card> {
        let (front, back) = (front.trim(), back.trim());
        if front.is_empty() || back.is_empty() {
            return None;
        }
        Some(Card {
            front: front.to_string(),
            back: back.to_string(),
            rank: 0,
        })
    }

    pub fn front(&self) -> &str {
        &self.front
    }
    pub fn back(&self) -> &str {
        &self.back
    }
    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub(crate) fn promote(&mut self) -> Rank {
        if self.rank < MAX_RANK {
            self.rank += 1;
        }
        self.rank
    }
    pub(crate) fn demote(&mut self) -> Rank {
        self.rank = self.rank.saturating_sub(1);
        self.rank
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Parses deck text, dropping every line that is not exactly `front|::|back`.
    pub fn parse(text: &str) -> Deck {
        let (deck, malformed) = Self::scan(text);
        for line in &malformed {
            debug!(
                "[Deck] Dropped line {} ({} parts): {:?}",
                line.line_number, line.parts, line.content
            );
        }
        deck
    }

    /// Like [`Deck::parse`], but also hands back the lines that were dropped.
    pub fn scan(text: &str) -> (Deck, Vec<MalformedLine>) {
        let mut cards = Vec::new();
        let mut malformed = Vec::new();

        for (idx, line) in text.lines().enumerate() {
            let parts: Vec<&str> = line.split(DELIMITER).collect();
            let card = match parts.as_slice() {
                [front, back] => Card::new(front, back),
                _ => None,
            };
            match card {
                Some(card) => cards.push(card),
                None => malformed.push(MalformedLine {
                    line_number: idx + 1,
                    content: line.to_string(),
                    parts: parts.len(),
                }),
            }
        }

        (Deck { cards }, malformed)
    }

    /// Reads a deck file without parsing it.
    pub fn read(path: &Path) -> Result<String, DeckError> {
        std::fs::read_to_string(path).map_err(|source| DeckError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Deck, DeckError> {
        let now = Instant::now();
        let text = Self::read(path)?;
        let deck = Self::parse(&text);
        debug!("[Deck] Loading took {} ms.", now.elapsed().as_millis());
        info!("[Deck] Loaded {} cards from {:?}", deck.len(), path);
        Ok(deck)
    }

    /// Renders the deck back into its line format, one card per line.
    #[allow(dead_code)] // dekki only
    pub fn to_text(&self) -> String {
        self.cards
            .iter()
            .map(|c| format!("{}{}{}\n", c.front, DELIMITER, c.back))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
    pub fn get(&self, idx: usize) -> Option<&Card> {
        self.cards.get(idx)
    }
    pub(crate) fn get_mut(&mut self, idx: usize) -> Option<&mut Card> {
        self.cards.get_mut(idx)
    }
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }
}

impl FromIterator<Card> for Deck {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        Deck {
            cards: iter.into_iter().collect(),
        }
    }
}
