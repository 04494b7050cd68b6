//! Static basic-strategy table.
//!
//! Rows are keyed by the shape of a hand ([`HandKey`]), columns by the
//! dealer's up-card ([`CardClass`]). Lookup precedence is pair, then soft
//! total, then hard total; the first key that has a row wins.
//!
//! ```
//! use blackjack_rs::cards::parse_cards;
//! use blackjack_rs::hand::{Hand, PairRule};
//! use blackjack_rs::strategy::{recommend, Action, CardClass};
//!
//! let hand = Hand::from_cards(parse_cards("8h 8d").unwrap());
//! assert_eq!(recommend(&hand, CardClass::Ten, PairRule::SameRank), Action::Split);
//! ```

use crate::cards::Rank;
use crate::hand::{Hand, PairRule};
use std::fmt;

/// A recommended play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Hit,
    Stand,
    Double,
    /// Double if still allowed, otherwise stand.
    DoubleThenStand,
    Split,
}

impl Action {
    pub const fn symbol(self) -> &'static str {
        match self {
            Action::Hit => "H",
            Action::Stand => "S",
            Action::Double => "D",
            Action::DoubleThenStand => "Ds",
            Action::Split => "P",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Action::Hit => "Hit",
            Action::Stand => "Stand",
            Action::Double => "Double",
            Action::DoubleThenStand => "Double (else stand)",
            Action::Split => "Split",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rank class as the table sees it: the four ten-valued ranks collapse to `Ten`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CardClass {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Ace,
}

impl CardClass {
    pub const ALL: [CardClass; 10] = [
        CardClass::Two,
        CardClass::Three,
        CardClass::Four,
        CardClass::Five,
        CardClass::Six,
        CardClass::Seven,
        CardClass::Eight,
        CardClass::Nine,
        CardClass::Ten,
        CardClass::Ace,
    ];

    pub const fn from_rank(rank: Rank) -> Self {
        match rank {
            Rank::Two => CardClass::Two,
            Rank::Three => CardClass::Three,
            Rank::Four => CardClass::Four,
            Rank::Five => CardClass::Five,
            Rank::Six => CardClass::Six,
            Rank::Seven => CardClass::Seven,
            Rank::Eight => CardClass::Eight,
            Rank::Nine => CardClass::Nine,
            Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => CardClass::Ten,
            Rank::Ace => CardClass::Ace,
        }
    }

    /// Column / row offset into the table arrays.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn label(self) -> &'static str {
        match self {
            CardClass::Two => "2",
            CardClass::Three => "3",
            CardClass::Four => "4",
            CardClass::Five => "5",
            CardClass::Six => "6",
            CardClass::Seven => "7",
            CardClass::Eight => "8",
            CardClass::Nine => "9",
            CardClass::Ten => "10",
            CardClass::Ace => "A",
        }
    }
}

impl fmt::Display for CardClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Row key of the strategy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandKey {
    Pair(CardClass),
    /// Ace plus the given class, two cards only.
    Soft(CardClass),
    Hard(u16),
}

impl fmt::Display for HandKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandKey::Pair(c) => write!(f, "{c},{c}"),
            HandKey::Soft(c) => write!(f, "A,{c}"),
            HandKey::Hard(v) => write!(f, "{v}"),
        }
    }
}

use Action::{Double as D, DoubleThenStand as Ds, Hit as H, Split as P, Stand as S};

const HARD_MIN: u16 = 5;
const HARD_MAX: u16 = 21;

//            2  3  4  5  6  7  8  9  10 A
const HARD: [[Action; 10]; 17] = [
    [H, H, H, H, H, H, H, H, H, H], // 5
    [H, H, H, H, H, H, H, H, H, H], // 6
    [H, H, H, H, H, H, H, H, H, H], // 7
    [H, H, H, H, H, H, H, H, H, H], // 8
    [H, D, D, D, D, H, H, H, H, H], // 9
    [D, D, D, D, D, D, D, D, H, H], // 10
    [D, D, D, D, D, D, D, D, D, H], // 11
    [H, H, S, S, S, H, H, H, H, H], // 12
    [S, S, S, S, S, H, H, H, H, H], // 13
    [S, S, S, S, S, H, H, H, H, H], // 14
    [S, S, S, S, S, H, H, H, H, H], // 15
    [S, S, S, S, S, H, H, H, H, H], // 16
    [S, S, S, S, S, S, S, S, S, S], // 17
    [S, S, S, S, S, S, S, S, S, S], // 18
    [S, S, S, S, S, S, S, S, S, S], // 19
    [S, S, S, S, S, S, S, S, S, S], // 20
    [S, S, S, S, S, S, S, S, S, S], // 21
];

// A,2 through A,9
const SOFT: [[Action; 10]; 8] = [
    [H, H, H, D, D, H, H, H, H, H],
    [H, H, H, D, D, H, H, H, H, H],
    [H, H, D, D, D, H, H, H, H, H],
    [H, H, D, D, D, H, H, H, H, H],
    [H, D, D, D, D, H, H, H, H, H],
    [S, Ds, Ds, Ds, Ds, S, S, H, H, H],
    [S, S, S, S, S, S, S, S, S, S],
    [S, S, S, S, S, S, S, S, S, S],
];

// 2,2 through 10,10 then A,A; indexed by CardClass
const PAIRS: [[Action; 10]; 10] = [
    [P, P, P, P, P, P, H, H, H, H],
    [P, P, P, P, P, P, H, H, H, H],
    [H, H, H, P, P, H, H, H, H, H],
    [D, D, D, D, D, D, D, D, H, H],
    [P, P, P, P, P, H, H, H, H, H],
    [P, P, P, P, P, P, H, H, H, H],
    [P, P, P, P, P, P, P, P, P, P],
    [P, P, P, P, P, S, P, P, S, S],
    [S, S, S, S, S, S, S, S, S, S],
    [P, P, P, P, P, P, P, P, P, P],
];

/// The row for `key`, if the table has one.
fn row(key: HandKey) -> Option<&'static [Action; 10]> {
    match key {
        HandKey::Pair(c) => PAIRS.get(c.index()),
        HandKey::Soft(c) => match c {
            CardClass::Ten | CardClass::Ace => None,
            other => SOFT.get(other.index()),
        },
        HandKey::Hard(v) if (HARD_MIN..=HARD_MAX).contains(&v) => {
            HARD.get(usize::from(v - HARD_MIN))
        }
        HandKey::Hard(_) => None,
    }
}

/// Table entry for `key` against dealer up-card `up`.
pub fn lookup(key: HandKey, up: CardClass) -> Option<Action> {
    row(key).map(|r| r[up.index()])
}

/// The key the table is consulted with: the first of pair, soft, hard that
/// has a row.
pub fn classify(hand: &Hand, rule: PairRule) -> HandKey {
    if hand.is_pair(rule) {
        if let Some(first) = hand.cards().first() {
            return HandKey::Pair(CardClass::from_rank(first.rank()));
        }
    }
    if let Some(other) = hand.soft_pair() {
        let key = HandKey::Soft(CardClass::from_rank(other));
        if row(key).is_some() {
            return key;
        }
    }
    HandKey::Hard(hand.value())
}

/// `action` as it can still be taken on a hand of `cards` cards:
/// `DoubleThenStand` stands once doubling is no longer possible.
pub fn playable(action: Action, cards: usize) -> Action {
    match action {
        Action::DoubleThenStand if cards > 2 => Action::Stand,
        other => other,
    }
}

/// Recommended action for `hand` against dealer up-card `up`.
///
/// A hard total outside the table stands from 17 and hits below it. The
/// result passes through [`playable`]; with the current table only two-card
/// soft hands reach a `DoubleThenStand` cell, so the downgrade guards table
/// edits rather than any reachable hand.
pub fn recommend(hand: &Hand, up: CardClass, rule: PairRule) -> Action {
    let key = classify(hand, rule);
    let action = match lookup(key, up) {
        Some(a) => a,
        None if hand.value() >= 17 => Action::Stand,
        None => Action::Hit,
    };
    playable(action, hand.len())
}
