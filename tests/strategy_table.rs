use blackjack_rs::cards::{parse_cards, Rank};
use blackjack_rs::hand::{Hand, PairRule};
use blackjack_rs::strategy::{classify, lookup, recommend, Action, CardClass, HandKey};
use proptest::prelude::*;

fn hand(s: &str) -> Hand {
    Hand::from_cards(parse_cards(s).unwrap())
}

fn up(r: Rank) -> CardClass {
    CardClass::from_rank(r)
}

#[test]
fn sample_entries() {
    let rule = PairRule::SameRank;
    assert_eq!(recommend(&hand("Th 6d"), up(Rank::Ten), rule), Action::Hit);
    assert_eq!(recommend(&hand("Th 6d"), up(Rank::Six), rule), Action::Stand);
    assert_eq!(recommend(&hand("6h 5d"), up(Rank::Five), rule), Action::Double);
    assert_eq!(recommend(&hand("8h 8d"), up(Rank::Ten), rule), Action::Split);
    assert_eq!(recommend(&hand("Ah Ad"), up(Rank::Ace), rule), Action::Split);
    assert_eq!(recommend(&hand("Ah 7d"), up(Rank::Four), rule), Action::DoubleThenStand);
    assert_eq!(recommend(&hand("Ah 7d"), up(Rank::Nine), rule), Action::Hit);
    assert_eq!(recommend(&hand("9h 9d"), up(Rank::Seven), rule), Action::Stand);
    assert_eq!(recommend(&hand("5h 5d"), up(Rank::Nine), rule), Action::Double);
}

#[test]
fn pair_beats_soft_beats_hard() {
    assert_eq!(classify(&hand("Ah Ad"), PairRule::SameRank), HandKey::Pair(CardClass::Ace));
    assert_eq!(classify(&hand("Ah 6d"), PairRule::SameRank), HandKey::Soft(CardClass::Six));
    assert_eq!(classify(&hand("Ah Kd"), PairRule::SameRank), HandKey::Hard(21));
    assert_eq!(classify(&hand("Ah 6d 2c"), PairRule::SameRank), HandKey::Hard(19));
}

#[test]
fn ten_and_king_only_pair_by_value() {
    assert_eq!(classify(&hand("Th Kd"), PairRule::SameRank), HandKey::Hard(20));
    assert_eq!(classify(&hand("Th Kd"), PairRule::SameValue), HandKey::Pair(CardClass::Ten));
}

#[test]
fn every_hard_total_from_5_to_21_has_a_row() {
    for total in 5..=21 {
        for column in CardClass::ALL {
            assert!(lookup(HandKey::Hard(total), column).is_some(), "{total} vs {column}");
        }
    }
}

#[test]
fn all_ten_valued_up_cards_share_a_column() {
    let h = hand("Th 6d");
    let expected = recommend(&h, up(Rank::Ten), PairRule::SameRank);
    for r in [Rank::Jack, Rank::Queen, Rank::King] {
        assert_eq!(recommend(&h, up(r), PairRule::SameRank), expected);
    }
}

proptest! {
    #[test]
    fn recommend_is_total(
        cards in prop::collection::vec((0usize..13).prop_map(|i| Rank::ALL[i]), 2..6),
        column in (0usize..13).prop_map(|i| Rank::ALL[i]),
    ) {
        let s: Vec<String> = cards.iter().map(|r| format!("{r}c")).collect();
        let h = hand(&s.join(" "));
        let action = recommend(&h, up(column), PairRule::SameRank);
        if h.len() > 2 {
            prop_assert_ne!(action, Action::DoubleThenStand);
            prop_assert_ne!(action, Action::Split);
        }
        if h.value() >= 17 && !h.is_soft() && !h.is_pair(PairRule::SameRank) {
            prop_assert_eq!(action, Action::Stand);
        }
    }
}
