//! Table rules and the settings the TUI menu and command line edit.

use crate::agents::Difficulty;
use crate::hand::PairRule;
use crate::shoe::LocalSupplier;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("unknown dealer rule '{0}' (expected strategy or hit-below-17)")]
    DealerRule(String),
    #[error("unknown pair rule '{0}' (expected same-rank or same-value)")]
    PairRule(String),
    #[error("unknown bot difficulty '{0}' (expected easy, medium or hard)")]
    Difficulty(String),
    #[error("at most {max} bot seats, got {got}")]
    TooManyBots { max: usize, got: usize },
}

/// How the dealer decides to stop drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum DealerRule {
    /// Follow the strategy table, including its stands below 17.
    #[default]
    Strategy,
    /// Follow the table but never stand below 17.
    HitBelowSeventeen,
}

impl DealerRule {
    pub fn label(self) -> &'static str {
        match self {
            DealerRule::Strategy => "strategy",
            DealerRule::HitBelowSeventeen => "hit-below-17",
        }
    }
}

impl fmt::Display for DealerRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DealerRule {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strategy" | "table" => Ok(DealerRule::Strategy),
            "hit-below-17" | "h17" => Ok(DealerRule::HitBelowSeventeen),
            _ => Err(ConfigError::DealerRule(s.to_string())),
        }
    }
}

/// Rules the round engine plays by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct Rules {
    /// How long a hand may sit without an action before it is stood.
    pub idle_timeout: Duration,
    pub dealer_rule: DealerRule,
    pub pair_rule: PairRule,
    /// A player hand holding this many cards is finished automatically.
    pub max_hand_cards: usize,
}

impl Rules {
    pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(5);
    pub const DEFAULT_MAX_HAND_CARDS: usize = 5;

    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn with_dealer_rule(mut self, rule: DealerRule) -> Self {
        self.dealer_rule = rule;
        self
    }

    pub fn with_pair_rule(mut self, rule: PairRule) -> Self {
        self.pair_rule = rule;
        self
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            idle_timeout: Self::DEFAULT_IDLE_TIMEOUT,
            dealer_rule: DealerRule::default(),
            pair_rule: PairRule::default(),
            max_hand_cards: Self::DEFAULT_MAX_HAND_CARDS,
        }
    }
}

/// Everything needed to set up a table: rules, shoe and which seats bots play.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct TableConfig {
    pub rules: Rules,
    pub decks: usize,
    pub seed: Option<u64>,
    /// Seats from the last one backwards are handed to bots.
    pub bots: usize,
    pub bot_delay_ms: u64,
    pub bot_difficulty: Difficulty,
}

impl TableConfig {
    pub const MAX_DECKS: usize = 8;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bots > crate::game::SEATS {
            return Err(ConfigError::TooManyBots { max: crate::game::SEATS, got: self.bots });
        }
        Ok(())
    }

    /// Seats played by a human (the first `SEATS - bots`).
    pub fn human_seats(&self) -> usize {
        crate::game::SEATS.saturating_sub(self.bots)
    }

    /// Build the in-process supplier described by `decks` and `seed`.
    pub fn supplier(&self) -> LocalSupplier {
        let decks = self.decks.clamp(1, Self::MAX_DECKS);
        match self.seed {
            Some(seed) => LocalSupplier::seeded(decks, seed),
            None => LocalSupplier::new(decks),
        }
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            rules: Rules::default(),
            decks: 1,
            seed: None,
            bots: 0,
            bot_delay_ms: 600,
            bot_difficulty: Difficulty::default(),
        }
    }
}
