//! Card supply. The round engine only ever asks for a fresh shoe and then
//! draws from it one card at a time; where the cards come from is up to the
//! [`CardSupplier`] implementation.

use crate::cards::{Card, Rank, Suit};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;
use std::fmt;

/// Identifies one shuffled shoe at the supplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShoeId(pub u64);

impl fmt::Display for ShoeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shoe-{}", self.0)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SupplierError {
    #[error("card supplier unavailable: {0}")]
    Unavailable(String),
    #[error("unknown shoe: {0}")]
    UnknownShoe(ShoeId),
    #[error("shoe has no cards left")]
    Exhausted,
}

/// Source of shuffled cards.
pub trait CardSupplier: fmt::Debug {
    /// Obtain a freshly shuffled shoe.
    fn new_shoe(&mut self) -> Result<ShoeId, SupplierError>;
    /// Draw the next card from `shoe`.
    fn draw(&mut self, shoe: ShoeId) -> Result<Card, SupplierError>;
}

/// One standard 52-card deck in suit-major order.
pub fn standard_deck() -> Vec<Card> {
    let mut cards = Vec::with_capacity(52);
    for &s in &Suit::ALL {
        for &r in &Rank::ALL {
            cards.push(Card::new(r, s));
        }
    }
    cards
}

/// In-process shoe of `decks` standard decks, shuffled with ChaCha8.
///
/// When the shoe runs dry it is refilled and reshuffled under the same id, so
/// for the purposes of a game it never runs out.
///
/// ```
/// use blackjack_rs::shoe::{CardSupplier, LocalSupplier};
///
/// let mut supplier = LocalSupplier::seeded(1, 42);
/// let shoe = supplier.new_shoe().unwrap();
/// assert!(supplier.draw(shoe).is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct LocalSupplier {
    decks: usize,
    rng: ChaCha8Rng,
    current: Option<ShoeId>,
    next_id: u64,
    cards: Vec<Card>,
}

impl LocalSupplier {
    /// Shoe with a random seed.
    pub fn new(decks: usize) -> Self {
        let seed: u64 = rand::rng().random();
        Self::seeded(decks, seed)
    }

    /// Shoe whose shuffles are reproducible from `seed`.
    pub fn seeded(decks: usize, seed: u64) -> Self {
        Self {
            decks: decks.max(1),
            rng: ChaCha8Rng::seed_from_u64(seed),
            current: None,
            next_id: 1,
            cards: Vec::new(),
        }
    }

    pub fn decks(&self) -> usize {
        self.decks
    }

    /// Cards left before the next reshuffle.
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    fn refill(&mut self) {
        self.cards.clear();
        for _ in 0..self.decks {
            self.cards.extend(standard_deck());
        }
        self.cards.shuffle(&mut self.rng);
    }
}

impl CardSupplier for LocalSupplier {
    fn new_shoe(&mut self) -> Result<ShoeId, SupplierError> {
        let id = ShoeId(self.next_id);
        self.next_id += 1;
        self.refill();
        self.current = Some(id);
        log::debug!("shuffled {id} with {} decks", self.decks);
        Ok(id)
    }

    fn draw(&mut self, shoe: ShoeId) -> Result<Card, SupplierError> {
        if self.current != Some(shoe) {
            return Err(SupplierError::UnknownShoe(shoe));
        }
        if self.cards.is_empty() {
            log::info!("{shoe} ran dry, reshuffling");
            self.refill();
        }
        self.cards.pop().ok_or(SupplierError::Exhausted)
    }
}

/// Deals a fixed sequence of cards in order. Drawing past the end reports
/// [`SupplierError::Exhausted`].
///
/// ```
/// use blackjack_rs::cards::parse_cards;
/// use blackjack_rs::shoe::{CardSupplier, StackedSupplier};
///
/// let mut supplier = StackedSupplier::new(parse_cards("As Kd").unwrap());
/// let shoe = supplier.new_shoe().unwrap();
/// assert_eq!(supplier.draw(shoe).unwrap().to_string(), "As");
/// assert_eq!(supplier.draw(shoe).unwrap().to_string(), "Kd");
/// assert!(supplier.draw(shoe).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StackedSupplier {
    cards: VecDeque<Card>,
    available: bool,
}

impl StackedSupplier {
    pub fn new(cards: Vec<Card>) -> Self {
        Self { cards: cards.into(), available: true }
    }

    /// A supplier that refuses to hand out a shoe at all.
    pub fn unavailable() -> Self {
        Self { cards: VecDeque::new(), available: false }
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }
}

impl CardSupplier for StackedSupplier {
    fn new_shoe(&mut self) -> Result<ShoeId, SupplierError> {
        if !self.available {
            return Err(SupplierError::Unavailable("no shoe available".into()));
        }
        Ok(ShoeId(0))
    }

    fn draw(&mut self, _shoe: ShoeId) -> Result<Card, SupplierError> {
        self.cards.pop_front().ok_or(SupplierError::Exhausted)
    }
}
