use crate::{Deck, Flashcard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrowserState {
    #[default]
    Empty,
    Browsing,
}

/// Owns the current deck, the cursor into it and the reveal flag of the
/// displayed card.
///
/// Invariant: `cursor < deck.len()` whenever the deck is non-empty, and
/// `cursor == 0` when it is empty. Only the card under the cursor can be
/// revealed, so moving the cursor hides the answer again.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeckBrowser {
    deck: Deck,
    cursor: usize,
    revealed: bool,
}

impl DeckBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> BrowserState {
        if self.deck.is_empty() {
            BrowserState::Empty
        } else {
            BrowserState::Browsing
        }
    }

    /// Replaces the deck wholesale. Cursor and reveal state are reset in the
    /// same assignment, so no observer sees a cursor outside the new deck.
    pub fn assign(&mut self, deck: Deck) {
        *self = Self {
            deck,
            cursor: 0,
            revealed: false,
        };
    }

    /// Advances the cursor; returns whether it moved. No wraparound.
    pub fn next(&mut self) -> bool {
        if self.cursor + 1 < self.deck.len() {
            self.cursor += 1;
            self.revealed = false;
            true
        } else {
            false
        }
    }

    /// Moves the cursor back; returns whether it moved.
    pub fn previous(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.revealed = false;
            true
        } else {
            false
        }
    }

    /// Flips the answer of the current card. No-op on an empty deck.
    pub fn toggle_reveal(&mut self) -> bool {
        if self.deck.is_empty() {
            return false;
        }
        self.revealed = !self.revealed;
        true
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn cursor(&self) -> Option<usize> {
        match self.state() {
            BrowserState::Empty => None,
            BrowserState::Browsing => Some(self.cursor),
        }
    }

    pub fn current(&self) -> Option<&Flashcard> {
        self.deck.get(self.cursor)
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed && self.cursor() == Some(index)
    }
}
