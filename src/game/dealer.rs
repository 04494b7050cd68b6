//! Dealer play: the dealer consults the same strategy table as a player,
//! using its own second card as the up-card.

use crate::cards::Card;
use crate::config::{DealerRule, Rules};
use crate::hand::Hand;
use crate::shoe::SupplierError;
use crate::strategy::{recommend, Action, CardClass};

/// Whether the dealer takes another card with `hand`.
///
/// The dealer can neither double nor split, so those recommendations draw
/// below 17 and stop from it. A table stand below 17 is honoured only under
/// [`DealerRule::Strategy`].
pub fn dealer_draws(hand: &Hand, rules: &Rules) -> bool {
    let value = hand.value();
    let action = match hand.cards().get(1) {
        Some(up) => recommend(hand, CardClass::from_rank(up.rank()), rules.pair_rule),
        None => Action::Hit,
    };
    match (action, rules.dealer_rule) {
        (Action::Hit, _) => value < 21,
        (Action::Stand, DealerRule::Strategy) => false,
        _ => value < 17,
    }
}

/// Draw into `hand` until [`dealer_draws`] says stop or a card takes the
/// total to 17 or more.
///
/// Every draw raises the hard total, and the value never sits below it, so
/// the loop ends after at most sixteen cards.
pub fn dealer_play<F>(hand: &mut Hand, rules: &Rules, mut draw: F) -> Result<(), SupplierError>
where
    F: FnMut() -> Result<Card, SupplierError>,
{
    while dealer_draws(hand, rules) {
        let card = draw()?;
        hand.add_card(card);
        if hand.value() >= 17 {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;
    use std::collections::VecDeque;

    fn hand(s: &str) -> Hand {
        Hand::from_cards(parse_cards(s).unwrap())
    }

    fn play(start: &str, shoe: &str, rules: Rules) -> Hand {
        let mut h = hand(start);
        let mut cards: VecDeque<Card> = parse_cards(shoe).unwrap().into();
        dealer_play(&mut h, &rules, || cards.pop_front().ok_or(SupplierError::Exhausted)).unwrap();
        h
    }

    #[test]
    fn stands_on_hard_seventeen() {
        assert_eq!(play("Th 7c", "5d", Rules::default()).len(), 2);
    }

    #[test]
    fn hits_stiff_hand_against_ten_up() {
        // 6 under a ten: hard 16 vs T hits
        let h = play("6h Tc", "5d 9s", Rules::default());
        assert_eq!(h.to_string(), "[6h Tc 5d] 21");
    }

    #[test]
    fn table_stand_below_seventeen_is_honoured_by_default() {
        // hard 13 vs 3 up is a stand in the table
        let h = play("Th 3c", "5d", Rules::default());
        assert_eq!(h.value(), 13);
        let h = play("Th 3c", "5d", Rules::default().with_dealer_rule(DealerRule::HitBelowSeventeen));
        assert_eq!(h.value(), 18);
    }

    #[test]
    fn pair_of_aces_draws_instead_of_splitting() {
        let h = play("Ah As", "5d", Rules::default());
        assert_eq!(h.value(), 17);
    }

    #[test]
    fn stops_after_a_draw_reaches_seventeen_even_if_soft() {
        // 4 + 2 = 6 hits; Ace makes soft 17 and the loop ends
        let h = play("4h 2c", "Ad 9s", Rules::default());
        assert_eq!(h.to_string(), "[4h 2c Ad] 17");
    }

    #[test]
    fn draw_failure_propagates() {
        let mut h = hand("6h Tc");
        let err = dealer_play(&mut h, &Rules::default(), || Err(SupplierError::Exhausted));
        assert_eq!(err, Err(SupplierError::Exhausted));
        assert_eq!(h.len(), 2);
    }
}
