//! Review state over a loaded [`Deck`].
//!
//! Front-ends never touch cards directly. They feed an [`Intent`] into
//! [`Session::handle_intent`] and redraw from the returned [`Snapshot`].

use crate::liboboeru::deck::{Card, Deck, Rank, LEARNED_RANK, MAX_RANK};
use log::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    Good,
    Bad,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Reveal,
    Mark(Mark),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Browsing { cursor: usize, revealed: bool },
    /// Every card is at [`LEARNED_RANK`]. Nothing leaves this state.
    Completed,
}

/// Owned view of a session, taken after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub position: usize,
    pub total: usize,
    pub front: Option<String>,
    /// Only filled while the answer is revealed.
    pub back: Option<String>,
    pub revealed: bool,
    pub rank: Option<Rank>,
    /// Card count per rank, indexed by rank.
    pub counts: [usize; MAX_RANK as usize + 1],
    pub completed: bool,
}

impl Snapshot {
    pub fn learned(&self) -> usize {
        self.counts[LEARNED_RANK as usize]
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    deck: Deck,
    // Kept as-is on completion so the last card marked stays addressable.
    cursor: usize,
    revealed: bool,
    completed: bool,
}

impl Session {
    pub fn new(deck: Deck) -> Self {
        debug!("[Session] Starting with {} cards", deck.len());
        Self {
            deck,
            cursor: 0,
            revealed: false,
            completed: false,
        }
    }

    pub fn state(&self) -> State {
        if self.completed {
            State::Completed
        } else {
            State::Browsing {
                cursor: self.cursor,
                revealed: self.revealed,
            }
        }
    }
    pub fn is_completed(&self) -> bool {
        self.state() == State::Completed
    }
    pub fn is_revealed(&self) -> bool {
        matches!(self.state(), State::Browsing { revealed: true, .. })
    }
    pub fn len(&self) -> usize {
        self.deck.len()
    }
    pub fn is_empty(&self) -> bool {
        self.deck.is_empty()
    }
    #[cfg(test)]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn current_card(&self) -> Option<&Card> {
        self.deck.get(self.cursor)
    }

    pub fn card(&self, idx: usize) -> Option<&Card> {
        self.deck.get(idx)
    }

    pub fn count_by_rank(&self, rank: Rank) -> usize {
        self.deck.iter().filter(|c| c.rank() == rank).count()
    }

    pub fn rank_counts(&self) -> [usize; MAX_RANK as usize + 1] {
        let mut counts = [0; MAX_RANK as usize + 1];
        for card in self.deck.iter() {
            counts[card.rank() as usize] += 1;
        }
        counts
    }

    pub fn learned(&self) -> usize {
        self.count_by_rank(LEARNED_RANK)
    }

    pub fn reveal(&mut self) {
        if self.completed || self.deck.is_empty() {
            return;
        }
        self.revealed = !self.revealed;
        debug!("[Session] Reveal -> {}", self.revealed);
    }

    pub fn mark_good(&mut self) {
        self.mark(Mark::Good)
    }

    pub fn mark_bad(&mut self) {
        self.mark(Mark::Bad)
    }

    fn mark(&mut self, mark: Mark) {
        if self.completed {
            return;
        }
        let Some(card) = self.deck.get_mut(self.cursor) else {
            return;
        };

        let rank = match mark {
            Mark::Good => card.promote(),
            Mark::Bad => card.demote(),
        };
        info!("[Session] Card {} has a learning level of {}", card.front(), rank);

        if self.learned() == self.len() {
            info!("[Session] All {} cards learned", self.len());
            self.completed = true;
            self.revealed = false;
        } else {
            self.cursor = (self.cursor + 1) % self.len();
            self.revealed = false;
        }
    }

    pub fn handle_intent(&mut self, intent: Intent) -> Snapshot {
        match intent {
            Intent::Reveal => self.reveal(),
            Intent::Mark(Mark::Good) => self.mark_good(),
            Intent::Mark(Mark::Bad) => self.mark_bad(),
        }
        self.snapshot()
    }

    pub fn snapshot(&self) -> Snapshot {
        let card = self.current_card();
        let revealed = self.is_revealed();
        Snapshot {
            position: self.cursor,
            total: self.deck.len(),
            front: card.map(|c| c.front().to_string()),
            back: card
                .filter(|_| revealed)
                .map(|c| c.back().to_string()),
            revealed,
            rank: card.map(Card::rank),
            counts: self.rank_counts(),
            completed: self.is_completed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(text: &str) -> Session {
        Session::new(Deck::parse(text))
    }

    fn cursor(session: &Session) -> usize {
        match session.state() {
            State::Browsing { cursor, .. } => cursor,
            State::Completed => panic!("session completed unexpectedly"),
        }
    }

    #[test]
    fn starts_browsing_first_card_hidden() {
        let s = session("a|::|1\nb|::|2");
        assert_eq!(
            s.state(),
            State::Browsing {
                cursor: 0,
                revealed: false
            }
        );
        assert_eq!(s.current_card().unwrap().front(), "a");
    }

    #[test]
    fn reveal_toggles() {
        let mut s = session("a|::|1");
        s.reveal();
        assert!(s.is_revealed());
        assert_eq!(s.snapshot().back.as_deref(), Some("1"));
        s.reveal();
        assert!(!s.is_revealed());
        assert_eq!(s.snapshot().back, None);
    }

    #[test]
    fn mark_hides_answer_and_advances() {
        let mut s = session("a|::|1\nb|::|2");
        s.reveal();
        let snap = s.handle_intent(Intent::Mark(Mark::Good));
        assert_eq!(snap.position, 1);
        assert!(!snap.revealed);
        assert_eq!(snap.front.as_deref(), Some("b"));
        assert_eq!(s.deck().get(0).unwrap().rank(), 1);
    }

    #[test]
    fn full_pass_returns_cursor_to_start() {
        let mut s = session("a|::|1\nb|::|2\nc|::|3\nd|::|4");
        for i in 0..s.len() {
            if i % 2 == 0 {
                s.mark_good();
            } else {
                s.mark_bad();
            }
        }
        assert_eq!(cursor(&s), 0);
    }

    #[test]
    fn single_card_wraps_to_itself() {
        let mut s = session("only|::|one");
        s.mark_bad();
        assert_eq!(cursor(&s), 0);
        s.mark_good();
        assert_eq!(cursor(&s), 0);
    }

    #[test]
    fn bad_never_goes_below_zero() {
        let mut s = session("a|::|1");
        s.mark_bad();
        s.mark_bad();
        assert_eq!(s.current_card().unwrap().rank(), 0);
    }

    #[test]
    fn good_is_capped_at_max_rank() {
        // The second card stays at 0, so the deck never completes and the
        // first card can climb past the learned rank.
        let mut s = session("a|::|1\nb|::|2");
        for _ in 0..5 {
            s.mark_good();
            s.mark_bad();
        }
        assert!(!s.is_completed());
        assert_eq!(s.deck().get(0).unwrap().rank(), MAX_RANK);
        assert_eq!(s.deck().get(1).unwrap().rank(), 0);
    }

    #[test]
    fn counts_always_sum_to_deck_size() {
        let mut s = session("a|::|1\nb|::|2\nc|::|3");
        let pattern = [Mark::Good, Mark::Good, Mark::Bad, Mark::Good, Mark::Bad];
        for mark in pattern.iter().cycle().take(40) {
            let snap = s.handle_intent(Intent::Mark(*mark));
            assert_eq!(snap.counts.iter().sum::<usize>(), 3);
            for card in s.deck().iter() {
                assert!(card.rank() <= MAX_RANK);
            }
            for rank in 0..=MAX_RANK {
                assert_eq!(s.count_by_rank(rank), snap.counts[rank as usize]);
            }
        }
    }

    #[test]
    fn all_cards_learned_completes() {
        let mut s = session("a|::|1\nb|::|2");
        for _ in 0..5 {
            s.mark_good();
        }
        assert!(!s.is_completed());
        s.mark_good();
        assert!(s.is_completed());
        assert_eq!(s.learned(), 2);

        let before = s.snapshot();
        assert!(before.completed);
        assert_eq!(s.handle_intent(Intent::Reveal), before);
        assert_eq!(s.handle_intent(Intent::Mark(Mark::Good)), before);
        assert_eq!(s.handle_intent(Intent::Mark(Mark::Bad)), before);
        assert_eq!(s.count_by_rank(LEARNED_RANK), 2);
    }

    #[test]
    fn card_above_learned_rank_blocks_completion() {
        let mut s = session("a|::|1\nb|::|2");
        // a: 1, b: 0, a: 2, b: 0, a: 3, b: 0, a: 4
        for _ in 0..3 {
            s.mark_good();
            s.mark_bad();
        }
        s.mark_good();
        assert_eq!(s.deck().get(0).unwrap().rank(), 4);
        // b climbs to 3 while a sits at 4.
        for _ in 0..3 {
            s.mark_good();
            s.mark_good();
        }
        assert!(!s.is_completed());
        assert_eq!(s.rank_counts(), [0, 0, 0, 1, 1]);
    }

    #[test]
    fn empty_deck_ignores_intents() {
        let mut s = session("nothing here");
        assert!(s.is_empty());
        assert!(s.current_card().is_none());

        let snap = s.handle_intent(Intent::Reveal);
        assert!(!snap.revealed);
        let snap = s.handle_intent(Intent::Mark(Mark::Good));
        assert!(!snap.completed);
        assert_eq!(snap.front, None);
        assert_eq!(snap.total, 0);
    }

    #[test]
    fn state_and_snapshot_share_one_cursor() {
        let mut s = session("a|::|1\nb|::|2\nc|::|3");
        for _ in 0..7 {
            let snap = s.handle_intent(Intent::Mark(Mark::Good));
            assert_eq!(snap.position, cursor(&s));
            assert_eq!(snap.front.as_deref(), s.current_card().map(Card::front));
        }
        s.reveal();
        assert_eq!(
            s.state(),
            State::Browsing {
                cursor: 1,
                revealed: true
            }
        );
    }
}
