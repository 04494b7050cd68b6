use crate::cards::Card;
use crate::clock::Clock;
use crate::config::Rules;
use crate::hand::Hand;
use crate::shoe::{CardSupplier, ShoeId, SupplierError};
use crate::strategy::CardClass;
use std::time::{Duration, Instant};

mod dealer;
mod winners;

pub use dealer::{dealer_draws, dealer_play};
pub use winners::{determine_winners, Winner, Winners};

/// Number of player seats at the table.
pub const SEATS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Phase {
    /// No round dealt yet.
    Waiting,
    /// Seats are acting.
    Players,
    /// Every seat is done; the dealer is drawing.
    Dealer,
    /// Winners are known; only a restart is accepted.
    Over,
    /// A card could not be drawn. The round is void and only a restart,
    /// which opens a new shoe, is accepted.
    Aborted,
}

/// Commands the presentation layer may issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Command {
    Hit,
    Stand,
    Double,
    Split,
    Restart,
}

/// Why a hand stopped taking cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Finish {
    Stood,
    Bust,
    Doubled,
    SplitAces,
    /// Reached 21 or the card limit.
    Exhausted,
    TimedOut,
}

impl Finish {
    pub fn label(self) -> &'static str {
        match self {
            Finish::Stood => "Stood",
            Finish::Bust => "Bust",
            Finish::Doubled => "Doubled",
            Finish::SplitAces => "Split aces",
            Finish::Exhausted => "Done",
            Finish::TimedOut => "Timed out",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum HistoryVerb {
    Deal,
    Hit,
    Stand,
    Double,
    Split,
    Bust,
    Exhausted,
    TimedOut,
    DealerHit,
    DealerStand,
}

impl HistoryVerb {
    pub fn label(self) -> &'static str {
        match self {
            HistoryVerb::Deal => "Deal",
            HistoryVerb::Hit => "Hit",
            HistoryVerb::Stand => "Stand",
            HistoryVerb::Double => "Double",
            HistoryVerb::Split => "Split",
            HistoryVerb::Bust => "Bust",
            HistoryVerb::Exhausted => "Done",
            HistoryVerb::TimedOut => "Timed out",
            HistoryVerb::DealerHit => "Dealer hits",
            HistoryVerb::DealerStand => "Dealer stands",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct HistoryEntry {
    /// `None` for the dealer.
    pub seat: Option<usize>,
    pub hand: usize,
    pub verb: HistoryVerb,
    pub card: Option<Card>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActionError {
    #[error("no round has been dealt")]
    NoRound,
    #[error("the dealer is playing")]
    DealerTurn,
    #[error("the round is over")]
    RoundOver,
    #[error("the round is still in progress")]
    RoundInProgress,
    #[error("seat {seat} is not acting")]
    NotActing { seat: usize },
    #[error("double needs exactly two cards, hand has {0}")]
    CannotDouble(usize),
    #[error("only a pair can be split")]
    NotAPair,
    #[error("the round was aborted after a failed draw")]
    Aborted,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RoundError {
    /// The command was rejected and nothing changed.
    #[error(transparent)]
    Illegal(#[from] ActionError),
    /// No card could be drawn; the round cannot continue.
    #[error(transparent)]
    Supplier(#[from] SupplierError),
}

impl RoundError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, RoundError::Supplier(_))
    }
}

/// A hand at a seat together with how it finished, if it has.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayedHand {
    pub(crate) hand: Hand,
    pub(crate) finish: Option<Finish>,
}

impl PlayedHand {
    pub(crate) fn new(hand: Hand) -> Self {
        Self { hand, finish: None }
    }

    pub fn hand(&self) -> &Hand {
        &self.hand
    }

    pub fn finish(&self) -> Option<Finish> {
        self.finish
    }

    pub fn is_finished(&self) -> bool {
        self.finish.is_some()
    }
}

/// One player slot. Holds one hand, or several after splitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seat {
    pub(crate) hands: Vec<PlayedHand>,
    pub(crate) active: usize,
    pub(crate) done: bool,
}

impl Seat {
    fn new() -> Self {
        Self { hands: vec![PlayedHand::default()], active: 0, done: false }
    }

    pub fn hands(&self) -> &[PlayedHand] {
        &self.hands
    }

    /// Index of the hand currently being played.
    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}

/// The round engine: four seats against a strategy-driven dealer.
#[derive(Debug)]
#[non_exhaustive]
pub struct Game {
    pub(crate) rules: Rules,
    supplier: Box<dyn CardSupplier>,
    clock: Box<dyn Clock>,
    shoe: ShoeId,
    pub(crate) seats: Vec<Seat>,
    pub(crate) dealer: Hand,
    pub(crate) current: usize,
    pub(crate) phase: Phase,
    pub(crate) winners: Winners,
    deadline: Option<Instant>,
    round: u64,
    history: Vec<HistoryEntry>,
}

impl Game {
    /// Open a shoe at `supplier`. Nothing is dealt until
    /// [`Game::deal_initial_cards`].
    pub fn new(
        rules: Rules,
        mut supplier: Box<dyn CardSupplier>,
        clock: Box<dyn Clock>,
    ) -> Result<Self, SupplierError> {
        let shoe = supplier.new_shoe().inspect_err(|e| log::error!("cannot open a shoe: {e}"))?;
        Ok(Self {
            rules,
            supplier,
            clock,
            shoe,
            seats: (0..SEATS).map(|_| Seat::new()).collect(),
            dealer: Hand::new(),
            current: 0,
            phase: Phase::Waiting,
            winners: Winners::default(),
            deadline: None,
            round: 0,
            history: Vec::new(),
        })
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn game_over(&self) -> bool {
        matches!(self.phase, Phase::Over)
    }

    /// Number of rounds dealt so far.
    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub fn seat(&self, idx: usize) -> Option<&Seat> {
        self.seats.get(idx)
    }

    pub fn dealer_hand(&self) -> &Hand {
        &self.dealer
    }

    /// Index of the acting seat.
    pub fn current_seat(&self) -> usize {
        self.current
    }

    /// Index of the acting hand within the acting seat.
    pub fn current_hand_index(&self) -> usize {
        self.seats.get(self.current).map(|s| s.active).unwrap_or(0)
    }

    /// The hand awaiting a command, if seats are acting.
    pub fn active_hand(&self) -> Option<&Hand> {
        if self.phase != Phase::Players {
            return None;
        }
        let seat = self.seats.get(self.current)?;
        seat.hands.get(seat.active).map(|h| &h.hand)
    }

    /// The dealer's face-up card: the second one dealt.
    pub fn up_card(&self) -> Option<Card> {
        self.dealer.cards().get(1).copied()
    }

    pub fn up_class(&self) -> Option<CardClass> {
        self.up_card().map(|c| CardClass::from_rank(c.rank()))
    }

    /// Whether the dealer's first card must be shown face down.
    pub fn dealer_hidden(&self) -> bool {
        matches!(self.phase, Phase::Players)
    }

    /// Dealer total as the players may see it: only the up-card while hidden.
    pub fn dealer_visible_value(&self) -> u16 {
        if self.dealer_hidden() {
            return self.up_card().map(|c| u16::from(c.rank().points())).unwrap_or(0);
        }
        self.dealer.value()
    }

    pub fn winners(&self) -> &Winners {
        &self.winners
    }

    /// Time left before the acting hand is stood automatically.
    pub fn idle_remaining(&self) -> Option<Duration> {
        let deadline = self.deadline?;
        Some(deadline.saturating_duration_since(self.clock.now()))
    }

    pub fn history_recent(&self, n: usize) -> Vec<HistoryEntry> {
        let len = self.history.len();
        let start = len.saturating_sub(n);
        self.history[start..].to_vec()
    }

    pub fn history_recent_offset(&self, n: usize, offset: usize) -> Vec<HistoryEntry> {
        if n == 0 || self.history.is_empty() {
            return Vec::new();
        }
        let len = self.history.len();
        let offset = offset.min(len.saturating_sub(n));
        let end = len - offset;
        let start = end.saturating_sub(n);
        self.history[start..end].to_vec()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Reset every seat and the dealer and deal two cards to each, seats
    /// first, dealer last, twice over. The dealer's first card is the hidden
    /// one.
    pub fn deal_initial_cards(&mut self) -> Result<(), RoundError> {
        self.seats = (0..SEATS).map(|_| Seat::new()).collect();
        self.dealer = Hand::new();
        self.current = 0;
        self.phase = Phase::Waiting;
        self.winners = Winners::default();
        self.deadline = None;
        self.history.clear();

        for _ in 0..2 {
            for seat in 0..SEATS {
                let card = self.draw()?;
                self.seats[seat].hands[0].hand.add_card(card);
            }
            let card = self.draw()?;
            self.dealer.add_card(card);
        }
        for seat in 0..SEATS {
            self.history.push(HistoryEntry {
                seat: Some(seat),
                hand: 0,
                verb: HistoryVerb::Deal,
                card: None,
            });
        }

        self.round += 1;
        self.phase = Phase::Players;
        log::info!(
            "round {} dealt, dealer shows {}",
            self.round,
            self.up_card().map(|c| c.to_string()).unwrap_or_default()
        );
        self.arm_deadline();
        self.settle()
    }

    pub fn apply(&mut self, command: Command) -> Result<(), RoundError> {
        let res = match command {
            Command::Hit => self.hit(),
            Command::Stand => self.stand(),
            Command::Double => self.double(),
            Command::Split => self.split(),
            Command::Restart => self.restart(),
        };
        if let Err(RoundError::Illegal(e)) = &res {
            log::warn!("{command:?} rejected: {e}");
        }
        res
    }

    pub fn hit(&mut self) -> Result<(), RoundError> {
        self.ensure_can_act()?;
        let card = self.draw()?;
        self.active_mut().hand.add_card(card);
        self.record(HistoryVerb::Hit, Some(card));
        self.arm_deadline();
        self.settle()
    }

    pub fn stand(&mut self) -> Result<(), RoundError> {
        self.ensure_can_act()?;
        self.finish_active(Finish::Stood)?;
        self.settle()
    }

    /// Take exactly one more card on a two-card hand, then move on.
    pub fn double(&mut self) -> Result<(), RoundError> {
        self.ensure_can_act()?;
        let len = self.active_mut().hand.len();
        if len != 2 {
            return Err(ActionError::CannotDouble(len).into());
        }
        let card = self.draw()?;
        self.active_mut().hand.add_card(card);
        self.record(HistoryVerb::Double, Some(card));
        self.finish_active(Finish::Doubled)?;
        self.settle()
    }

    /// Split a pair into two hands, the new one right after the current one,
    /// and deal one card to each. Split Aces get that one card only.
    pub fn split(&mut self) -> Result<(), RoundError> {
        self.ensure_can_act()?;
        let pair_rule = self.rules.pair_rule;
        let played = self.active_mut();
        if !played.hand.is_pair(pair_rule) {
            return Err(ActionError::NotAPair.into());
        }
        let aces = played.hand.cards().first().is_some_and(|c| c.rank().is_ace());

        // Draw both cards before touching the hand so a failed draw leaves it whole.
        let first = self.draw()?;
        let second = self.draw()?;

        let seat = &mut self.seats[self.current];
        let idx = seat.active;
        let moved = seat.hands[idx].hand.split_off().ok_or(ActionError::NotAPair)?;
        seat.hands[idx].hand.add_card(first);
        let mut other = Hand::new();
        other.add_card(moved);
        other.add_card(second);
        seat.hands.insert(idx + 1, PlayedHand::new(other));
        self.record(HistoryVerb::Split, Some(moved));
        self.arm_deadline();

        if aces {
            self.finish_active(Finish::SplitAces)?;
            self.finish_active(Finish::SplitAces)?;
        }
        self.settle()
    }

    /// Deal a new round once the previous one is over. After an aborted
    /// round a new shoe is opened first.
    pub fn restart(&mut self) -> Result<(), RoundError> {
        match self.phase {
            Phase::Over | Phase::Waiting => self.deal_initial_cards(),
            Phase::Aborted => {
                self.shoe = self
                    .supplier
                    .new_shoe()
                    .inspect_err(|e| log::error!("cannot open a new shoe: {e}"))?;
                log::info!("opened {} after an aborted round", self.shoe);
                self.deal_initial_cards()
            }
            Phase::Players | Phase::Dealer => Err(ActionError::RoundInProgress.into()),
        }
    }

    /// Give the acting hand a full idle timeout again, e.g. after the table
    /// was hidden behind the menu.
    pub fn reset_idle(&mut self) {
        if self.phase == Phase::Players {
            self.arm_deadline();
        }
    }

    /// Check the idle deadline; stands the acting hand when it has passed.
    /// Returns whether a hand was timed out.
    pub fn tick(&mut self) -> Result<bool, RoundError> {
        if self.phase != Phase::Players {
            return Ok(false);
        }
        let Some(deadline) = self.deadline else {
            return Ok(false);
        };
        if self.clock.now() < deadline {
            return Ok(false);
        }
        log::info!("seat {} hand {} timed out", self.current + 1, self.current_hand_index() + 1);
        self.finish_active(Finish::TimedOut)?;
        self.settle()?;
        Ok(true)
    }

    fn ensure_can_act(&self) -> Result<(), ActionError> {
        match self.phase {
            Phase::Waiting => Err(ActionError::NoRound),
            Phase::Dealer => Err(ActionError::DealerTurn),
            Phase::Over => Err(ActionError::RoundOver),
            Phase::Aborted => Err(ActionError::Aborted),
            Phase::Players => {
                debug_assert!(!self.seats[self.current].done, "acting seat is already done");
                Ok(())
            }
        }
    }

    /// Draw from the shoe. Any failure aborts the round.
    fn draw(&mut self) -> Result<Card, SupplierError> {
        self.supplier.draw(self.shoe).inspect_err(|e| {
            self.phase = Phase::Aborted;
            self.deadline = None;
            log::error!("round {} aborted, draw failed: {e}", self.round);
        })
    }

    fn active_mut(&mut self) -> &mut PlayedHand {
        let seat = &mut self.seats[self.current];
        &mut seat.hands[seat.active]
    }

    fn arm_deadline(&mut self) {
        self.deadline = Some(self.clock.now() + self.rules.idle_timeout);
    }

    fn record(&mut self, verb: HistoryVerb, card: Option<Card>) {
        let entry = HistoryEntry {
            seat: Some(self.current),
            hand: self.current_hand_index(),
            verb,
            card,
        };
        log::debug!("seat {} hand {}: {} {:?}", self.current + 1, entry.hand + 1, verb.label(), card);
        self.history.push(entry);
    }

    fn finish_active(&mut self, finish: Finish) -> Result<(), RoundError> {
        let played = self.active_mut();
        debug_assert!(played.finish.is_none(), "hand finished twice");
        played.finish = Some(finish);
        let verb = match finish {
            Finish::Stood => Some(HistoryVerb::Stand),
            Finish::Bust => Some(HistoryVerb::Bust),
            Finish::Exhausted => Some(HistoryVerb::Exhausted),
            Finish::TimedOut => Some(HistoryVerb::TimedOut),
            Finish::Doubled | Finish::SplitAces => None,
        };
        if let Some(verb) = verb {
            self.record(verb, None);
        }
        self.next_hand()
    }

    /// Auto-finish the acting hand while it is bust, at 21, or full.
    fn settle(&mut self) -> Result<(), RoundError> {
        while self.phase == Phase::Players {
            let hand = &self.seats[self.current].hands[self.seats[self.current].active].hand;
            let finish = if hand.is_bust() {
                Finish::Bust
            } else if hand.value() == 21 || hand.len() >= self.rules.max_hand_cards {
                Finish::Exhausted
            } else {
                break;
            };
            self.finish_active(finish)?;
        }
        Ok(())
    }

    /// Move to the seat's next hand, or to the next seat that is not done.
    /// Once every seat is done the dealer plays and the round ends.
    fn next_hand(&mut self) -> Result<(), RoundError> {
        let seat = &mut self.seats[self.current];
        if seat.active + 1 < seat.hands.len() {
            seat.active += 1;
            self.arm_deadline();
            return Ok(());
        }
        seat.done = true;
        self.deadline = None;

        let next = (1..=SEATS).map(|step| (self.current + step) % SEATS).find(|&i| !self.seats[i].done);
        match next {
            Some(i) => {
                self.current = i;
                self.seats[i].active = 0;
                self.arm_deadline();
                Ok(())
            }
            None => {
                debug_assert!(self.seats.iter().all(|s| s.done));
                self.finish_round()
            }
        }
    }

    fn finish_round(&mut self) -> Result<(), RoundError> {
        self.phase = Phase::Dealer;
        self.play_dealer()?;
        let hands: Vec<Vec<Hand>> =
            self.seats.iter().map(|s| s.hands.iter().map(|h| h.hand.clone()).collect()).collect();
        self.winners = determine_winners(&hands, &self.dealer);
        self.phase = Phase::Over;
        log::info!("round {} over, dealer {}: {}", self.round, self.dealer.value(), self.winners.summary());
        Ok(())
    }

    fn play_dealer(&mut self) -> Result<(), RoundError> {
        let mut hand = std::mem::take(&mut self.dealer);
        let before = hand.len();
        let supplier = &mut self.supplier;
        let shoe = self.shoe;
        let res = dealer_play(&mut hand, &self.rules, || supplier.draw(shoe));
        let drawn: Vec<Card> = hand.cards()[before..].to_vec();
        self.dealer = hand;
        for card in drawn {
            self.history.push(HistoryEntry {
                seat: None,
                hand: 0,
                verb: HistoryVerb::DealerHit,
                card: Some(card),
            });
        }
        if let Err(e) = res {
            self.phase = Phase::Aborted;
            log::error!("round {} aborted, dealer draw failed: {e}", self.round);
            return Err(e.into());
        }
        self.history.push(HistoryEntry {
            seat: None,
            hand: 0,
            verb: HistoryVerb::DealerStand,
            card: None,
        });
        Ok(())
    }
}
