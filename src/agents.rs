//! Agents: pluggable seat controllers.
//!
//! `PlayerAgent` is the small trait a seat controller implements and
//! `AgentTable` decides which agent owns which seat. Frontends queue human
//! commands here and tick the table; bots play their seats from the strategy
//! table.

use crate::engine::TableEngine;
use crate::game::{Command, Phase, RoundError};
use crate::hand::{Hand, PairRule};
use crate::strategy::{recommend, Action, CardClass};
use core::fmt;
use std::time::{Duration, Instant};

/// Kinds of agents attached to seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum AgentKind {
    Human,
    Bot,
}

/// A seat controller that can act for a player when it is their turn.
pub trait PlayerAgent {
    /// Called when `seat` is the acting seat. Returns whether a command ran.
    fn on_turn(&mut self, engine: &mut dyn TableEngine, seat: usize) -> Result<bool, RoundError>;
    fn kind(&self) -> AgentKind {
        AgentKind::Human
    }
    /// Queue a command; agents that decide for themselves ignore it.
    fn receive(&mut self, _command: Command) -> bool {
        false
    }
}

mod bots;

pub use bots::{BotAgent, BotProfile, Difficulty};

/// Run `command` against `engine`.
pub fn execute(engine: &mut dyn TableEngine, command: Command) -> Result<(), RoundError> {
    match command {
        Command::Hit => engine.hit(),
        Command::Stand => engine.stand(),
        Command::Double => engine.double(),
        Command::Split => engine.split(),
        Command::Restart => engine.restart(),
    }
}

/// Turn a table recommendation into a command the engine accepts for `hand`.
///
/// A double on more than two cards hits; `DoubleThenStand` stands instead.
pub fn legal_command(action: Action, hand: &Hand, rule: PairRule) -> Command {
    let two_cards = hand.len() == 2;
    match action {
        Action::Hit => Command::Hit,
        Action::Stand => Command::Stand,
        Action::Double if two_cards => Command::Double,
        Action::Double => Command::Hit,
        Action::DoubleThenStand if two_cards => Command::Double,
        Action::DoubleThenStand => Command::Stand,
        Action::Split if hand.is_pair(rule) => Command::Split,
        Action::Split => Command::Hit,
    }
}

/// The table's recommendation for the hand awaiting a command.
pub fn hint(engine: &dyn TableEngine) -> Option<Action> {
    let hand = engine.active_hand()?;
    let up = engine.up_card()?;
    Some(recommend(hand, CardClass::from_rank(up.rank()), engine.rules().pair_rule))
}

/// Executes commands queued by a frontend when its seat is acting.
pub struct HumanAgent {
    pending: Option<Command>,
}

impl HumanAgent {
    pub fn new() -> Self {
        Self { pending: None }
    }
}

impl Default for HumanAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerAgent for HumanAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Human
    }
    fn receive(&mut self, command: Command) -> bool {
        if self.pending.is_some() {
            return false;
        }
        self.pending = Some(command);
        true
    }
    fn on_turn(&mut self, engine: &mut dyn TableEngine, seat: usize) -> Result<bool, RoundError> {
        if engine.phase() != Phase::Players {
            self.pending = None;
            return Ok(false);
        }
        if engine.current_seat() != seat {
            return Ok(false);
        }
        match self.pending.take() {
            Some(command) => execute(engine, command).map(|_| true),
            None => Ok(false),
        }
    }
}

/// One optional agent per seat, driven when its seat is acting.
pub struct AgentTable {
    seats: Vec<Option<Box<dyn PlayerAgent>>>,
    min_action_delay: Duration,
    next_action_at: Option<Instant>,
}

impl fmt::Debug for AgentTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags: String = self
            .seats
            .iter()
            .map(|a| match a.as_deref().map(|ag| ag.kind()) {
                Some(AgentKind::Bot) => 'B',
                Some(AgentKind::Human) => 'H',
                None => '-',
            })
            .collect();
        write!(f, "AgentTable({flags})")
    }
}

impl AgentTable {
    /// Create a table with `n` seats, all empty.
    pub fn for_seats(n: usize) -> Self {
        let mut seats = Vec::with_capacity(n);
        seats.resize_with(n, || None);
        Self { seats, min_action_delay: Duration::ZERO, next_action_at: None }
    }

    /// Assign an agent to a seat (or remove it with `None`).
    pub fn set_agent(&mut self, seat: usize, agent: Option<Box<dyn PlayerAgent>>) {
        if seat >= self.seats.len() {
            self.seats.resize_with(seat + 1, || None);
        }
        self.seats[seat] = agent;
    }

    pub fn agent_kind(&self, seat: usize) -> Option<AgentKind> {
        self.seats.get(seat).and_then(|a| a.as_deref().map(|ag| ag.kind()))
    }

    /// Queue a command for a seat's agent.
    pub fn receive(&mut self, seat: usize, command: Command) -> bool {
        if let Some(Some(agent)) = self.seats.get_mut(seat) {
            return agent.receive(command);
        }
        false
    }

    pub fn any_bots(&self) -> bool {
        self.seats.iter().filter_map(|a| a.as_deref()).any(|ag| ag.kind() == AgentKind::Bot)
    }

    /// Minimum delay between two bot commands anywhere at the table.
    pub fn set_min_action_delay_ms(&mut self, delay_ms: u64) {
        self.min_action_delay = Duration::from_millis(delay_ms);
    }

    /// Drive the agent at the acting seat, if any.
    pub fn on_turn(&mut self, engine: &mut dyn TableEngine) -> Result<bool, RoundError> {
        if engine.phase() != Phase::Players {
            return Ok(false);
        }
        let seat = engine.current_seat();
        let Some(Some(agent)) = self.seats.get_mut(seat) else {
            return Ok(false);
        };
        let now = Instant::now();
        let is_bot = agent.kind() == AgentKind::Bot;
        if is_bot && self.next_action_at.is_some_and(|next| now < next) {
            return Ok(false);
        }
        let acted = agent.on_turn(engine, seat)?;
        if acted && is_bot && !self.min_action_delay.is_zero() {
            self.next_action_at = Some(now + self.min_action_delay);
        }
        Ok(acted)
    }

    /// Remove all agents.
    pub fn clear(&mut self) {
        for a in &mut self.seats {
            *a = None;
        }
        self.next_action_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;
    use crate::clock::ManualClock;
    use crate::config::Rules;
    use crate::game::{Finish, Game};
    use crate::shoe::StackedSupplier;

    fn dealt(cards: &str) -> Game {
        let supplier = StackedSupplier::new(parse_cards(cards).unwrap());
        let mut g =
            Game::new(Rules::default(), Box::new(supplier), Box::new(ManualClock::new())).unwrap();
        g.deal_initial_cards().unwrap();
        g
    }

    // seat 0: 6h 5c (11), seats 1-3: 20, dealer Tc 6d
    const ELEVEN_VS_SIX: &str = "6h Ts Tc Td Tc 5c Ks Kc Kd 6d";

    #[test]
    fn human_runs_queued_command_on_its_turn() {
        let mut g = dealt(ELEVEN_VS_SIX);
        let mut table = AgentTable::for_seats(4);
        table.set_agent(0, Some(Box::new(HumanAgent::new())));
        assert!(table.receive(0, Command::Stand));
        assert!(table.on_turn(&mut g).unwrap());
        assert_eq!(g.current_seat(), 1);
        // nothing queued for seat 1
        assert!(!table.on_turn(&mut g).unwrap());
    }

    #[test]
    fn human_rejects_second_queued_command() {
        let mut human = HumanAgent::new();
        assert!(human.receive(Command::Hit));
        assert!(!human.receive(Command::Stand));
    }

    #[test]
    fn bot_doubles_eleven_against_six() {
        let mut g = dealt(&format!("{ELEVEN_VS_SIX} 9h"));
        let mut bot = BotAgent::new(BotProfile::for_difficulty(Difficulty::Hard).with_seed(1));
        assert_eq!(hint(&g), Some(Action::Double));
        assert!(bot.on_turn(&mut g, 0).unwrap());
        assert_eq!(g.seats()[0].hands()[0].finish(), Some(Finish::Doubled));
    }

    #[test]
    fn bot_ignores_other_seats() {
        let mut g = dealt(ELEVEN_VS_SIX);
        let mut bot = BotAgent::new(BotProfile::for_difficulty(Difficulty::Hard));
        assert!(!bot.on_turn(&mut g, 2).unwrap());
        assert_eq!(g.current_seat(), 0);
    }

    #[test]
    fn double_degrades_to_a_legal_command() {
        let three = Hand::from_cards(parse_cards("2h 3c 6d").unwrap());
        let two = Hand::from_cards(parse_cards("Ah 7c").unwrap());
        assert_eq!(legal_command(Action::Double, &three, PairRule::SameRank), Command::Hit);
        assert_eq!(legal_command(Action::DoubleThenStand, &three, PairRule::SameRank), Command::Stand);
        assert_eq!(legal_command(Action::DoubleThenStand, &two, PairRule::SameRank), Command::Double);
        assert_eq!(legal_command(Action::Split, &two, PairRule::SameRank), Command::Hit);
    }

    #[test]
    fn table_throttles_consecutive_bot_commands() {
        // seats 0 and 1 both hold 20 and stand
        let mut g = dealt("Th Ts 2c 2d 9c Kh Ks 3c 3d 8d");
        let mut table = AgentTable::for_seats(4);
        for seat in 0..2 {
            let profile = BotProfile::for_difficulty(Difficulty::Hard).with_seed(seat as u64);
            table.set_agent(seat, Some(Box::new(BotAgent::new(profile))));
        }
        table.set_min_action_delay_ms(60_000);
        assert!(table.on_turn(&mut g).unwrap());
        assert_eq!(g.current_seat(), 1);
        assert!(!table.on_turn(&mut g).unwrap(), "second bot waits out the delay");
        assert_eq!(g.current_seat(), 1);
    }
}
