use crate::hand::Hand;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Winner {
    Dealer,
    /// Zero-based seat index.
    Seat(usize),
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Winner::Dealer => f.write_str("Dealer"),
            Winner::Seat(i) => write!(f, "Player {}", i + 1),
        }
    }
}

/// Outcome of a finished round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Winners {
    members: Vec<Winner>,
    tie: bool,
}

impl Winners {
    pub fn members(&self) -> &[Winner] {
        &self.members
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Set when no seat won outright but some seat matched the dealer.
    pub fn is_tie(&self) -> bool {
        self.tie
    }

    pub fn contains(&self, winner: Winner) -> bool {
        self.members.contains(&winner)
    }

    /// Seat indices among the winners, in seat order.
    pub fn seats(&self) -> Vec<usize> {
        self.members
            .iter()
            .filter_map(|w| match w {
                Winner::Seat(i) => Some(*i),
                Winner::Dealer => None,
            })
            .collect()
    }

    /// One-line banner for the result.
    pub fn summary(&self) -> String {
        let names: Vec<String> = self.members.iter().map(|w| w.to_string()).collect();
        match (self.tie, self.members.as_slice()) {
            (_, []) => "No Winners".to_string(),
            (false, [Winner::Dealer]) => "Dealer Wins!".to_string(),
            (true, _) => format!("Tie! {}", names.join(" & ")),
            (false, _) => format!("Winners: {}", names.join(", ")),
        }
    }
}

/// Decide the round from each seat's hands and the dealer's final hand.
///
/// A seat wins if any of its non-bust hands beats the dealer, or the dealer
/// busted. With no seat winning, seats that matched the dealer tie with it
/// (or alone, if the dealer busted); otherwise a standing dealer wins.
///
/// ```
/// use blackjack_rs::cards::parse_cards;
/// use blackjack_rs::game::{determine_winners, Winner};
/// use blackjack_rs::hand::Hand;
///
/// let h = |s: &str| Hand::from_cards(parse_cards(s).unwrap());
/// let seats = vec![vec![h("Th 9c")], vec![h("Th 7c")], vec![h("Kh Qc 5d")], vec![h("9h 9c")]];
/// let winners = determine_winners(&seats, &h("Ts 8d"));
/// assert_eq!(winners.members(), &[Winner::Seat(0)]);
/// ```
pub fn determine_winners<S: AsRef<[Hand]>>(seats: &[S], dealer: &Hand) -> Winners {
    let dealer_value = dealer.value();
    let dealer_bust = dealer_value > 21;
    let mut members = Vec::new();
    let mut ties = Vec::new();

    for (i, hands) in seats.iter().enumerate() {
        let mut wins = false;
        let mut tied = false;
        for hand in hands.as_ref() {
            let v = hand.value();
            if v > 21 {
                continue;
            }
            if dealer_bust || v > dealer_value {
                wins = true;
            } else if v == dealer_value {
                tied = true;
            }
        }
        if wins {
            members.push(Winner::Seat(i));
        } else if tied {
            ties.push(Winner::Seat(i));
        }
    }

    if !members.is_empty() {
        return Winners { members, tie: false };
    }
    if !ties.is_empty() {
        if !dealer_bust {
            members.push(Winner::Dealer);
        }
        members.extend(ties);
        return Winners { members, tie: true };
    }
    if !dealer_bust {
        members.push(Winner::Dealer);
    }
    Winners { members, tie: false }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn h(s: &str) -> Hand {
        Hand::from_cards(parse_cards(s).unwrap())
    }

    #[test]
    fn push_with_dealer_is_a_tie() {
        let seats = vec![vec![h("Th 7c")], vec![h("Th 5c 9d")], vec![h("Th 6c")], vec![h("Th 2c")]];
        let w = determine_winners(&seats, &h("9s 8d"));
        assert!(w.is_tie());
        assert_eq!(w.members(), &[Winner::Dealer, Winner::Seat(0)]);
        assert_eq!(w.summary(), "Tie! Dealer & Player 1");
    }

    #[test]
    fn dealer_wins_when_nobody_matches() {
        let seats = vec![vec![h("Th 6c")]; 4];
        let w = determine_winners(&seats, &h("9s 8d"));
        assert_eq!(w.members(), &[Winner::Dealer]);
        assert_eq!(w.summary(), "Dealer Wins!");
    }

    #[test]
    fn busted_seats_never_win_against_busted_dealer() {
        let seats = vec![vec![h("Th 6c Kd")]; 4];
        let w = determine_winners(&seats, &h("9s 7d 8c"));
        assert!(w.is_empty());
        assert_eq!(w.summary(), "No Winners");
    }

    #[test]
    fn one_winning_split_hand_wins_the_seat_once() {
        let seats = vec![vec![h("8h Tc"), h("8s Kd")], vec![h("Th 2c")], vec![h("Th 2c")], vec![h("Th 2c")]];
        let w = determine_winners(&seats, &h("9s 8d"));
        assert_eq!(w.members(), &[Winner::Seat(0)]);
        assert_eq!(w.summary(), "Winners: Player 1");
    }

    #[test]
    fn ties_are_listed_once_per_seat() {
        let seats = vec![vec![h("Th 7c"), h("9h 8c")], vec![h("Th 2c")], vec![h("Th 2c")], vec![h("Th 2c")]];
        let w = determine_winners(&seats, &h("9s 8d"));
        assert_eq!(w.seats(), vec![0]);
    }
}
