use blackjack_rs::cards::{parse_cards, Card, Rank, Suit};
use blackjack_rs::hand::{Hand, PairRule};
use proptest::prelude::*;

fn any_rank() -> impl Strategy<Value = Rank> {
    (0usize..13).prop_map(|i| Rank::ALL[i])
}

fn any_suit() -> impl Strategy<Value = Suit> {
    prop_oneof![Just(Suit::Clubs), Just(Suit::Diamonds), Just(Suit::Hearts), Just(Suit::Spades),]
}

fn any_card() -> impl Strategy<Value = Card> {
    (any_rank(), any_suit()).prop_map(|(r, s)| Card::new(r, s))
}

fn hand(s: &str) -> Hand {
    Hand::from_cards(parse_cards(s).unwrap())
}

/// Largest total not above 21 over every way of counting each Ace as 1 or 11,
/// or the all-low total when every count busts.
fn brute_force_value(cards: &[Card]) -> u16 {
    let hard: u16 = cards.iter().map(|c| if c.rank().is_ace() { 1 } else { u16::from(c.rank().points()) }).sum();
    let aces = cards.iter().filter(|c| c.rank().is_ace()).count() as u16;
    (0..=aces).map(|high| hard + 10 * high).filter(|v| *v <= 21).max().unwrap_or(hard)
}

#[test]
fn table_of_known_hands() {
    let cases = [
        ("Ah Ks", 21),
        ("Ah Ad", 12),
        ("Ah Ad 9c", 21),
        ("Ah Ad Ac 9c", 12),
        ("5h 6d", 11),
        ("Kh Qd 5c", 25),
        ("Ah 6d Kc", 17),
        ("2h 3d 4c 5s 6h", 20),
    ];
    for (cards, value) in cases {
        assert_eq!(hand(cards).value(), value, "{cards}");
    }
}

#[test]
fn face_cards_count_ten() {
    for r in [Rank::Ten, Rank::Jack, Rank::Queen, Rank::King] {
        assert_eq!(r.points(), 10);
    }
}

#[test]
fn rank_labels_decide_pairs() {
    assert!(hand("Qh Qs").is_pair(PairRule::SameRank));
    assert!(!hand("Qh Ks").is_pair(PairRule::SameRank));
    assert!(hand("Qh Ks").is_pair(PairRule::SameValue));
    assert!(hand("Ah As").is_pair(PairRule::SameRank));
}

proptest! {
    #[test]
    fn value_matches_best_ace_count(cards in prop::collection::vec(any_card(), 0..8)) {
        let h = Hand::from_cards(cards.clone());
        prop_assert_eq!(h.value(), brute_force_value(&cards));
    }

    #[test]
    fn value_is_hard_total_or_ten_more(cards in prop::collection::vec(any_card(), 1..8)) {
        let h = Hand::from_cards(cards);
        let hard = h.hard_total();
        prop_assert!(h.value() == hard || (h.value() == hard + 10 && h.is_soft()));
        prop_assert_eq!(h.is_bust(), hard > 21);
    }

    #[test]
    fn bust_hands_stay_bust(cards in prop::collection::vec(any_card(), 1..8), extra in any_card()) {
        let mut h = Hand::from_cards(cards);
        let was_bust = h.is_bust();
        let hard = h.hard_total();
        h.add_card(extra);
        prop_assert!(h.hard_total() > hard);
        if was_bust {
            prop_assert!(h.is_bust());
        }
    }
}
