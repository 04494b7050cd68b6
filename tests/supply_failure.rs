use blackjack_rs::cards::{parse_cards, Card};
use blackjack_rs::clock::ManualClock;
use blackjack_rs::config::Rules;
use blackjack_rs::game::{ActionError, Game, Phase, RoundError};
use blackjack_rs::shoe::{CardSupplier, ShoeId, StackedSupplier, SupplierError};

/// Stacked cards, except that draw number `fail_on` (1-based) fails.
#[derive(Debug)]
struct FailsOnce {
    cards: StackedSupplier,
    fail_on: usize,
    draws: usize,
    shoes: u64,
}

impl FailsOnce {
    fn new(cards: &str, fail_on: usize) -> Self {
        Self { cards: StackedSupplier::new(parse_cards(cards).unwrap()), fail_on, draws: 0, shoes: 0 }
    }
}

impl CardSupplier for FailsOnce {
    fn new_shoe(&mut self) -> Result<ShoeId, SupplierError> {
        self.shoes += 1;
        Ok(ShoeId(self.shoes))
    }

    fn draw(&mut self, shoe: ShoeId) -> Result<Card, SupplierError> {
        self.draws += 1;
        if self.draws == self.fail_on {
            return Err(SupplierError::Unavailable("connection reset".into()));
        }
        self.cards.draw(shoe)
    }
}

fn game(cards: &str, fail_on: usize) -> Game {
    let shoe = FailsOnce::new(cards, fail_on);
    Game::new(Rules::default(), Box::new(shoe), Box::new(ManualClock::new())).unwrap()
}

fn hand_str(game: &Game, seat: usize) -> String {
    game.seats()[seat].hands()[0].hand().to_string()
}

// seat 1: Th 6c (16); seats 2-4: 11; dealer 9c 8s; then a second round's worth
const DECK: &str = "Th 5c 5d 5h 9c 6c 6c 6d 6h 8s 2d 9h 9d 9s Tc 8c 8d 8h 7s 7c Ah";

const ABORTED: RoundError = RoundError::Illegal(ActionError::Aborted);

#[test]
fn failed_hit_aborts_the_round() {
    let mut g = game(DECK, 11);
    g.deal_initial_cards().unwrap();
    let err = g.hit().unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(g.phase(), Phase::Aborted);
    assert_eq!(g.idle_remaining(), None);

    // nothing else goes through, and the hand is untouched
    assert_eq!(g.hit(), Err(ABORTED));
    assert_eq!(g.stand(), Err(ABORTED));
    assert_eq!(g.double(), Err(ABORTED));
    assert_eq!(g.split(), Err(ABORTED));
    assert_eq!(hand_str(&g, 0), "[Th 6c] 16");
    assert!(!g.tick().unwrap());
}

#[test]
fn restart_after_an_abort_deals_from_a_new_shoe() {
    let mut g = game(DECK, 11);
    g.deal_initial_cards().unwrap();
    assert!(g.hit().is_err());
    g.restart().unwrap();
    assert_eq!(g.phase(), Phase::Players);
    assert_eq!(g.round(), 2);
    assert_eq!(hand_str(&g, 0), "[2d 8c] 10");
    g.hit().unwrap();
}

#[test]
fn failed_double_and_split_abort_without_touching_the_hand() {
    let mut g = game(DECK, 11);
    g.deal_initial_cards().unwrap();
    assert!(g.double().unwrap_err().is_fatal());
    assert_eq!(g.phase(), Phase::Aborted);
    assert_eq!(g.seats()[0].hands()[0].hand().len(), 2);

    // seat 1 holds 8h 8d; the second split card fails
    let mut g = game("8h 5c 5d 5h 9c 8d 6c 6d 6h 8s 3c", 12);
    g.deal_initial_cards().unwrap();
    assert!(g.split().unwrap_err().is_fatal());
    assert_eq!(g.phase(), Phase::Aborted);
    assert_eq!(g.seats()[0].hands().len(), 1);
    assert_eq!(hand_str(&g, 0), "[8h 8d] 16");
}

#[test]
fn failed_dealer_draw_aborts_and_restart_recovers() {
    // dealer 6h Tc must draw; that draw fails
    let mut g = game("Th Th Th Th 6h 9c 9c 9c 9c Tc Kd Kc Ks Kh 7d 9d 9h 9s 8c 8d", 11);
    g.deal_initial_cards().unwrap();
    for _ in 0..3 {
        g.stand().unwrap();
    }
    assert!(g.stand().unwrap_err().is_fatal());
    assert_eq!(g.phase(), Phase::Aborted);
    assert!(!g.game_over());
    assert!(g.winners().is_empty());

    g.restart().unwrap();
    assert_eq!(g.phase(), Phase::Players);
    assert_eq!(hand_str(&g, 0), "[Kd 9d] 19");
}

#[test]
fn failed_deal_aborts_and_restart_deals_again() {
    let mut g = game(DECK, 3);
    assert!(g.deal_initial_cards().unwrap_err().is_fatal());
    assert_eq!(g.phase(), Phase::Aborted);
    assert_eq!(g.stand(), Err(ABORTED));
    g.restart().unwrap();
    assert_eq!(g.phase(), Phase::Players);
}
