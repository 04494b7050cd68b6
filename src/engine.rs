// Table engine boundary. Frontends (TUI, bots, tests) drive a round and read
// its state through this trait and the plain `Snapshot` it produces, never
// through `Game` internals.

use crate::cards::Card;
use crate::config::Rules;
use crate::game::{Finish, Game, Phase, RoundError, Seat, Winners};
use crate::hand::Hand;

pub trait TableEngine {
    // Commands
    fn hit(&mut self) -> Result<(), RoundError>;
    fn stand(&mut self) -> Result<(), RoundError>;
    fn double(&mut self) -> Result<(), RoundError>;
    fn split(&mut self) -> Result<(), RoundError>;
    fn restart(&mut self) -> Result<(), RoundError>;
    fn tick(&mut self) -> Result<bool, RoundError>;

    // Queries
    fn phase(&self) -> Phase;
    fn game_over(&self) -> bool;
    fn rules(&self) -> &Rules;
    fn current_seat(&self) -> usize;
    fn current_hand_index(&self) -> usize;
    fn seat(&self, idx: usize) -> Option<&Seat>;
    fn active_hand(&self) -> Option<&Hand>;
    fn dealer_hand(&self) -> &Hand;
    fn up_card(&self) -> Option<Card>;
    fn snapshot(&self) -> Snapshot;
}

impl TableEngine for Game {
    fn hit(&mut self) -> Result<(), RoundError> {
        self.hit()
    }
    fn stand(&mut self) -> Result<(), RoundError> {
        self.stand()
    }
    fn double(&mut self) -> Result<(), RoundError> {
        self.double()
    }
    fn split(&mut self) -> Result<(), RoundError> {
        self.split()
    }
    fn restart(&mut self) -> Result<(), RoundError> {
        self.restart()
    }
    fn tick(&mut self) -> Result<bool, RoundError> {
        self.tick()
    }

    fn phase(&self) -> Phase {
        self.phase
    }
    fn game_over(&self) -> bool {
        self.game_over()
    }
    fn rules(&self) -> &Rules {
        &self.rules
    }
    fn current_seat(&self) -> usize {
        self.current
    }
    fn current_hand_index(&self) -> usize {
        self.current_hand_index()
    }
    fn seat(&self, idx: usize) -> Option<&Seat> {
        self.seats.get(idx)
    }
    fn active_hand(&self) -> Option<&Hand> {
        self.active_hand()
    }
    fn dealer_hand(&self) -> &Hand {
        &self.dealer
    }
    fn up_card(&self) -> Option<Card> {
        self.up_card()
    }
    fn snapshot(&self) -> Snapshot {
        Snapshot::of(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandView {
    pub cards: Vec<Card>,
    pub value: u16,
    pub finish: Option<Finish>,
    /// The hand awaiting a command.
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatView {
    pub hands: Vec<HandView>,
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealerView {
    pub cards: Vec<Card>,
    /// Draw the first card face down.
    pub hide_first: bool,
    /// Up-card points while hidden, the full total otherwise.
    pub value: u16,
}

/// Read-only picture of the table, rebuilt for every frame.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Snapshot {
    pub round: u64,
    pub phase: Phase,
    pub seats: Vec<SeatView>,
    pub dealer: DealerView,
    pub current_seat: Option<usize>,
    pub current_hand: Option<usize>,
    /// Whole seconds left on the idle timer, rounded up.
    pub idle_secs: Option<u64>,
    pub winners: Winners,
}

impl Snapshot {
    pub fn of(game: &Game) -> Self {
        let acting = game.phase() == Phase::Players;
        let seats = game
            .seats()
            .iter()
            .enumerate()
            .map(|(si, seat)| SeatView {
                done: seat.is_done(),
                hands: seat
                    .hands()
                    .iter()
                    .enumerate()
                    .map(|(hi, played)| HandView {
                        cards: played.hand().cards().to_vec(),
                        value: played.hand().value(),
                        finish: played.finish(),
                        active: acting
                            && si == game.current_seat()
                            && hi == seat.active_index(),
                    })
                    .collect(),
            })
            .collect();
        Self {
            round: game.round(),
            phase: game.phase(),
            seats,
            dealer: DealerView {
                cards: game.dealer_hand().cards().to_vec(),
                hide_first: game.dealer_hidden(),
                value: game.dealer_visible_value(),
            },
            current_seat: acting.then(|| game.current_seat()),
            current_hand: acting.then(|| game.current_hand_index()),
            idle_secs: game.idle_remaining().map(|d| d.as_secs_f64().ceil() as u64),
            winners: game.winners().clone(),
        }
    }

    pub fn game_over(&self) -> bool {
        self.phase == Phase::Over
    }
}
