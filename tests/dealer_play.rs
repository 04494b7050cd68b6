use blackjack_rs::cards::{parse_cards, Card, Rank, Suit};
use blackjack_rs::clock::ManualClock;
use blackjack_rs::config::{DealerRule, Rules};
use blackjack_rs::game::{dealer_draws, dealer_play, Game, HistoryVerb, Phase};
use blackjack_rs::hand::Hand;
use blackjack_rs::shoe::{StackedSupplier, SupplierError};
use proptest::prelude::*;
use std::collections::VecDeque;

fn hand(s: &str) -> Hand {
    Hand::from_cards(parse_cards(s).unwrap())
}

/// Deal with every seat standing on the first action; returns the finished game.
fn play_round(rules: Rules, cards: &str) -> Game {
    let shoe = StackedSupplier::new(parse_cards(cards).unwrap());
    let mut game = Game::new(rules, Box::new(shoe), Box::new(ManualClock::new())).unwrap();
    game.deal_initial_cards().unwrap();
    while game.phase() == Phase::Players {
        game.stand().unwrap();
    }
    game
}

#[test]
fn dealer_draws_on_stiff_hand_against_ten() {
    // dealer 6h Tc: hard 16 vs T hits
    let game = play_round(Rules::default(), "Th Th Th Th 6h 9c 9c 9c 9c Tc 5d");
    assert_eq!(game.dealer_hand().to_string(), "[6h Tc 5d] 21");
    assert!(game.game_over());
    let dealer_hits = game.history_recent(10).iter().filter(|e| e.verb == HistoryVerb::DealerHit).count();
    assert_eq!(dealer_hits, 1);
}

#[test]
fn dealer_honours_table_stand_below_17_by_default() {
    // dealer Th 3c: hard 13 vs 3 stands in the table
    let game = play_round(Rules::default(), "Th Th Th Th Th 9c 9c 9c 9c 3c 9d");
    assert_eq!(game.dealer_hand().value(), 13);
}

#[test]
fn hit_below_17_rule_ignores_early_stands() {
    let rules = Rules::default().with_dealer_rule(DealerRule::HitBelowSeventeen);
    let game = play_round(rules, "Th Th Th Th Th 9c 9c 9c 9c 3c 9d");
    assert_eq!(game.dealer_hand().to_string(), "[Th 3c 9d] 22");
}

#[test]
fn dealer_soft_17_after_a_draw_stops() {
    let game = play_round(Rules::default(), "Th Th Th Th 4h 9c 9c 9c 9c 2c Ad 9s");
    assert_eq!(game.dealer_hand().to_string(), "[4h 2c Ad] 17");
}

#[test]
fn dealer_draw_failure_is_fatal() {
    let shoe = StackedSupplier::new(parse_cards("Th Th Th Th 6h 9c 9c 9c 9c Tc").unwrap());
    let mut game = Game::new(Rules::default(), Box::new(shoe), Box::new(ManualClock::new())).unwrap();
    game.deal_initial_cards().unwrap();
    for _ in 0..3 {
        game.stand().unwrap();
    }
    let err = game.stand().unwrap_err();
    assert!(err.is_fatal());
    assert!(!game.game_over());
    assert_eq!(game.phase(), Phase::Aborted);
}

#[test]
fn one_card_dealer_hits() {
    assert!(dealer_draws(&hand("5h"), &Rules::default()));
}

fn any_card() -> impl Strategy<Value = Card> {
    ((0usize..13), (0usize..4)).prop_map(|(r, s)| Card::new(Rank::ALL[r], Suit::ALL[s]))
}

fn any_rule() -> impl Strategy<Value = DealerRule> {
    prop_oneof![Just(DealerRule::Strategy), Just(DealerRule::HitBelowSeventeen)]
}

proptest! {
    #[test]
    fn dealer_play_terminates(
        start in prop::collection::vec(any_card(), 2),
        shoe in prop::collection::vec(any_card(), 20),
        rule in any_rule(),
    ) {
        let rules = Rules::default().with_dealer_rule(rule);
        let mut h = Hand::from_cards(start);
        let mut cards: VecDeque<Card> = shoe.into();
        let mut draws = 0;
        let res = dealer_play(&mut h, &rules, || {
            draws += 1;
            cards.pop_front().ok_or(SupplierError::Exhausted)
        });
        prop_assert!(res.is_ok());
        prop_assert!(draws <= 16);
        if rule == DealerRule::HitBelowSeventeen {
            prop_assert!(h.value() >= 17);
        }
        if draws > 0 {
            // every stop after a draw is at 17 or more, or a table stand
            prop_assert!(h.value() >= 17 || !dealer_draws(&h, &rules));
        }
    }
}
