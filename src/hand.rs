use crate::cards::{Card, Rank};
use std::fmt;
use std::str::FromStr;

/// Which two cards count as a splittable pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum PairRule {
    /// Same rank label: K-K pairs, 10-K and J-Q do not.
    #[default]
    SameRank,
    /// Same rank class: every ten-valued card pairs with every other.
    SameValue,
}

impl PairRule {
    pub fn pairs(self, a: Rank, b: Rank) -> bool {
        match self {
            PairRule::SameRank => a.label() == b.label(),
            PairRule::SameValue => a.points() == b.points(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PairRule::SameRank => "same-rank",
            PairRule::SameValue => "same-value",
        }
    }
}

impl fmt::Display for PairRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PairRule {
    type Err = crate::config::ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "same-rank" | "rank" => Ok(PairRule::SameRank),
            "same-value" | "value" => Ok(PairRule::SameValue),
            _ => Err(crate::config::ConfigError::PairRule(s.to_string())),
        }
    }
}

/// An ordered set of cards evaluated as one Blackjack total.
///
/// ```
/// use blackjack_rs::cards::parse_cards;
/// use blackjack_rs::hand::Hand;
///
/// let hand = Hand::from_cards(parse_cards("Ah Ad 9c").unwrap());
/// assert_eq!(hand.value(), 21);
/// assert!(hand.is_soft());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hand {
    cards: Vec<Card>,
}

impl Hand {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Total with every Ace counted as 1.
    pub fn hard_total(&self) -> u16 {
        self.cards
            .iter()
            .map(|c| if c.rank().is_ace() { 1 } else { u16::from(c.rank().points()) })
            .sum()
    }

    /// Best total: Aces start at 11 and are demoted to 1, one at a time, while
    /// the hand would otherwise bust.
    pub fn value(&self) -> u16 {
        let (total, _) = self.best_total();
        total
    }

    fn best_total(&self) -> (u16, usize) {
        let mut total: u16 = self.cards.iter().map(|c| u16::from(c.rank().points())).sum();
        let mut high_aces = self.cards.iter().filter(|c| c.rank().is_ace()).count();
        while total > 21 && high_aces > 0 {
            total -= 10;
            high_aces -= 1;
        }
        (total, high_aces)
    }

    pub fn is_bust(&self) -> bool {
        self.value() > 21
    }

    /// True when an Ace is still counted as 11 in [`Hand::value`].
    pub fn is_soft(&self) -> bool {
        self.best_total().1 > 0
    }

    pub fn is_pair(&self, rule: PairRule) -> bool {
        match self.cards.as_slice() {
            [a, b] => rule.pairs(a.rank(), b.rank()),
            _ => false,
        }
    }

    /// For a two-card hand holding exactly one Ace, the other card's rank.
    pub fn soft_pair(&self) -> Option<Rank> {
        match self.cards.as_slice() {
            [a, b] if a.rank().is_ace() && !b.rank().is_ace() => Some(b.rank()),
            [a, b] if b.rank().is_ace() && !a.rank().is_ace() => Some(a.rank()),
            _ => None,
        }
    }

    /// Remove the second card of a two-card hand, leaving the first in place.
    pub fn split_off(&mut self) -> Option<Card> {
        if self.cards.len() != 2 {
            return None;
        }
        self.cards.pop()
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.cards.iter().map(|c| c.to_string()).collect();
        write!(f, "[{}] {}", parts.join(" "), self.value())
    }
}
