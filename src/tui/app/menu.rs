use crate::agents::Difficulty;
use crate::config::{DealerRule, TableConfig};
use crate::game::SEATS;
use crate::hand::PairRule;
use std::time::Duration;

use super::{AppState, Scene};

#[derive(Debug, Clone, Copy)]
enum MenuItem {
    Decks,
    Bots,
    BotDifficulty,
    BotDelayMs,
    IdleTimeout,
    DealerRule,
    PairRule,
}

const MENU_ITEMS: [MenuItem; 7] = [
    MenuItem::Decks,
    MenuItem::Bots,
    MenuItem::BotDifficulty,
    MenuItem::BotDelayMs,
    MenuItem::IdleTimeout,
    MenuItem::DealerRule,
    MenuItem::PairRule,
];

const MAX_IDLE_SECS: u64 = 60;

fn cycle_difficulty(d: Difficulty, forward: bool) -> Difficulty {
    let all = Difficulty::ALL;
    let i = all.iter().position(|x| *x == d).unwrap_or(0);
    let next = if forward { (i + 1) % all.len() } else { (i + all.len() - 1) % all.len() };
    all[next]
}

impl MenuItem {
    fn display(self, cfg: &TableConfig) -> String {
        match self {
            MenuItem::Decks => format!("Decks: {}", cfg.decks),
            MenuItem::Bots => format!("Bot Seats: {} of {SEATS}", cfg.bots),
            MenuItem::BotDifficulty => format!("Bot Difficulty: {}", cfg.bot_difficulty),
            MenuItem::BotDelayMs => format!("Bot Delay (ms): {}", cfg.bot_delay_ms),
            MenuItem::IdleTimeout => {
                format!("Idle Timeout (s): {}", cfg.rules.idle_timeout.as_secs())
            }
            MenuItem::DealerRule => format!("Dealer Rule: {}", cfg.rules.dealer_rule),
            MenuItem::PairRule => format!("Pair Rule: {}", cfg.rules.pair_rule),
        }
    }

    fn step(self, cfg: &mut TableConfig, forward: bool) {
        match self {
            MenuItem::Decks => {
                cfg.decks = if forward {
                    (cfg.decks + 1).min(TableConfig::MAX_DECKS)
                } else {
                    cfg.decks.saturating_sub(1).max(1)
                };
            }
            MenuItem::Bots => {
                cfg.bots = if forward { (cfg.bots + 1).min(SEATS) } else { cfg.bots.saturating_sub(1) };
            }
            MenuItem::BotDifficulty => {
                cfg.bot_difficulty = cycle_difficulty(cfg.bot_difficulty, forward);
            }
            MenuItem::BotDelayMs => {
                cfg.bot_delay_ms = if forward {
                    cfg.bot_delay_ms.saturating_add(100)
                } else {
                    cfg.bot_delay_ms.saturating_sub(100)
                };
            }
            MenuItem::IdleTimeout => {
                let secs = cfg.rules.idle_timeout.as_secs();
                let secs = if forward { (secs + 1).min(MAX_IDLE_SECS) } else { secs.saturating_sub(1).max(1) };
                cfg.rules.idle_timeout = Duration::from_secs(secs);
            }
            MenuItem::DealerRule => {
                cfg.rules.dealer_rule = match cfg.rules.dealer_rule {
                    DealerRule::Strategy => DealerRule::HitBelowSeventeen,
                    DealerRule::HitBelowSeventeen => DealerRule::Strategy,
                };
            }
            MenuItem::PairRule => {
                cfg.rules.pair_rule = match cfg.rules.pair_rule {
                    PairRule::SameRank => PairRule::SameValue,
                    PairRule::SameValue => PairRule::SameRank,
                };
            }
        }
    }
}

impl AppState {
    pub fn menu_items_display(&self) -> Vec<String> {
        MENU_ITEMS.iter().map(|item| item.display(&self.cfg)).collect()
    }

    pub fn toggle_menu(&mut self) {
        self.close_overlays();
        match self.scene {
            Scene::Menu => self.cancel_menu(),
            Scene::Table => self.open_menu(),
        }
    }

    pub fn open_menu(&mut self) {
        self.close_overlays();
        self.menu_index = 0;
        self.cfg = self.config.clone();
        self.scene = Scene::Menu;
    }

    /// Build a fresh table from the edited settings and deal the first round.
    pub fn apply_menu(&mut self) {
        if let Err(err) = self.cfg.validate() {
            log::warn!("menu settings rejected: {err}");
            return;
        }
        self.config = self.cfg.clone();
        log::info!(
            "new table: {} deck(s), {} bot(s), dealer {}, pairs {}",
            self.config.decks,
            self.config.bots,
            self.config.rules.dealer_rule,
            self.config.rules.pair_rule
        );
        self.scene = Scene::Table;
        self.rebuild_table();
    }

    /// Back to the table unchanged. The acting hand gets a fresh idle
    /// timeout since it could not be played from the menu.
    pub fn cancel_menu(&mut self) {
        self.scene = Scene::Table;
        self.game.reset_idle();
    }

    pub fn menu_next(&mut self) {
        self.menu_index = (self.menu_index + 1) % MENU_ITEMS.len();
    }
    pub fn menu_prev(&mut self) {
        self.menu_index = (self.menu_index + MENU_ITEMS.len() - 1) % MENU_ITEMS.len();
    }
    pub fn menu_inc(&mut self) {
        let item = MENU_ITEMS[self.menu_index % MENU_ITEMS.len()];
        item.step(&mut self.cfg, true);
    }
    pub fn menu_dec(&mut self) {
        let item = MENU_ITEMS[self.menu_index % MENU_ITEMS.len()];
        item.step(&mut self.cfg, false);
    }
}
