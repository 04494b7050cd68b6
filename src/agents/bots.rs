use crate::config::ConfigError;
use crate::engine::TableEngine;
use crate::game::{Command, Phase, RoundError};
use crate::strategy::{recommend, CardClass};
use rand::{rngs::StdRng, Rng, RngCore, SeedableRng};
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use super::{execute, legal_command, AgentKind, PlayerAgent};

/// How often a bot strays from the strategy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Chance of ignoring the table on any one decision.
    pub fn mistake_rate(self) -> f64 {
        match self {
            Difficulty::Easy => 0.25,
            Difficulty::Medium => 0.08,
            Difficulty::Hard => 0.0,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ConfigError::Difficulty(s.to_string())),
        }
    }
}

/// A bot's mistake rate, thinking delay and randomness.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct BotProfile {
    pub difficulty: Difficulty,
    pub mistake_rate: f64,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub rng_seed: Option<u64>,
}

impl BotProfile {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            mistake_rate: difficulty.mistake_rate(),
            min_delay_ms: 0,
            max_delay_ms: 0,
            rng_seed: None,
        }
    }

    /// Set a deterministic RNG seed for reproducible decisions.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Think for a random time between `min_ms` and `max_ms` before acting.
    pub fn with_delay_ms(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.min_delay_ms = min_ms;
        self.max_delay_ms = max_ms.max(min_ms);
        self
    }
}

impl Default for BotProfile {
    fn default() -> Self {
        Self::for_difficulty(Difficulty::default())
    }
}

/// Plays its seat from the strategy table, with occasional mistakes.
pub struct BotAgent {
    profile: BotProfile,
    rng: StdRng,
    next_action_at: Option<Instant>,
}

impl BotAgent {
    pub fn new(profile: BotProfile) -> Self {
        let rng = match profile.rng_seed {
            Some(v) => StdRng::seed_from_u64(v),
            None => {
                let mut seed = [0u8; 32];
                rand::rng().fill_bytes(&mut seed);
                StdRng::from_seed(seed)
            }
        };
        Self { profile, rng, next_action_at: None }
    }

    pub fn profile(&self) -> &BotProfile {
        &self.profile
    }

    fn choose_delay_ms(&mut self) -> u64 {
        let min = self.profile.min_delay_ms;
        let max = self.profile.max_delay_ms.max(min);
        if max == min {
            min
        } else {
            self.rng.random_range(min..=max)
        }
    }

    fn decide(&mut self, engine: &dyn TableEngine) -> Option<Command> {
        let hand = engine.active_hand()?;
        let up = CardClass::from_rank(engine.up_card()?.rank());
        let rule = engine.rules().pair_rule;
        let command = legal_command(recommend(hand, up, rule), hand, rule);
        if self.rng.random::<f64>() >= self.profile.mistake_rate {
            return Some(command);
        }
        // a mistake is the plain opposite: stand where the table plays on
        let wrong = match command {
            Command::Stand => Command::Hit,
            _ => Command::Stand,
        };
        log::debug!("bot at seat {} plays {wrong:?} instead of {command:?}", engine.current_seat() + 1);
        Some(wrong)
    }
}

impl fmt::Debug for BotAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotAgent").field("profile", &self.profile).finish_non_exhaustive()
    }
}

impl PlayerAgent for BotAgent {
    fn kind(&self) -> AgentKind {
        AgentKind::Bot
    }
    fn on_turn(&mut self, engine: &mut dyn TableEngine, seat: usize) -> Result<bool, RoundError> {
        if engine.phase() != Phase::Players || engine.current_seat() != seat {
            return Ok(false);
        }
        let now = Instant::now();
        let delay = self.choose_delay_ms();
        if delay > 0 {
            match self.next_action_at {
                None => {
                    self.next_action_at = Some(now + Duration::from_millis(delay));
                    return Ok(false);
                }
                Some(next) if now < next => return Ok(false),
                Some(_) => {}
            }
        }
        self.next_action_at = None;

        let Some(command) = self.decide(engine) else {
            return Ok(false);
        };
        execute(engine, command).map(|_| true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;
    use crate::clock::ManualClock;
    use crate::config::Rules;
    use crate::game::Game;
    use crate::shoe::StackedSupplier;
    use std::thread;

    fn dealt(cards: &str) -> Game {
        let supplier = StackedSupplier::new(parse_cards(cards).unwrap());
        let mut g =
            Game::new(Rules::default(), Box::new(supplier), Box::new(ManualClock::new())).unwrap();
        g.deal_initial_cards().unwrap();
        g
    }

    #[test]
    fn delay_throttles_the_first_action() {
        let mut g = dealt("Th 2s 2c 2d 9c Kh 3s 3c 3d 8d");
        let profile = BotProfile::for_difficulty(Difficulty::Hard).with_seed(7).with_delay_ms(15, 15);
        let mut bot = BotAgent::new(profile);

        assert!(!bot.on_turn(&mut g, 0).unwrap());
        assert_eq!(g.current_seat(), 0, "no action before the delay");

        thread::sleep(Duration::from_millis(20));
        assert!(bot.on_turn(&mut g, 0).unwrap());
        assert_eq!(g.current_seat(), 1);
    }

    #[test]
    fn easy_bots_sometimes_stray() {
        // hard 20 vs 8: the table stands; over many seeds some easy bots hit
        let strays = (0..200u64)
            .filter(|&seed| {
                let g = dealt("Th 2s 2c 2d 9c Kh 3s 3c 3d 8d");
                let profile = BotProfile::for_difficulty(Difficulty::Easy).with_seed(seed);
                BotAgent::new(profile).decide(&g) == Some(Command::Hit)
            })
            .count();
        assert!(strays > 0 && strays < 200);
    }

    #[test]
    fn difficulty_parses() {
        for d in Difficulty::ALL {
            assert_eq!(d.label().parse::<Difficulty>().unwrap(), d);
        }
        assert!(matches!("expert".parse::<Difficulty>(), Err(ConfigError::Difficulty(_))));
    }
}
