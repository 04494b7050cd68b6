use crate::agents::{hint, AgentKind, AgentTable, BotAgent, BotProfile, HumanAgent};
use crate::clock::{Clock, MonotonicClock};
use crate::config::TableConfig;
use crate::game::{Command, Game, Phase, RoundError};
use crate::shoe::SupplierError;
use crate::tui::logger::LogBuffer;
use std::rc::Rc;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Scene {
    Menu,
    Table,
}

/// High-level input actions for the TUI controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum InputAction {
    MenuNext,
    MenuPrev,
    MenuInc,
    MenuDec,
    MenuApply,
    MenuCancel,
    ToggleMenu,
    ToggleHelp,
    ToggleHistory,
    ToggleLog,
    HistoryUp,
    HistoryDown,
    Hit,
    Stand,
    Double,
    Split,
    Restart,
}

#[derive(Debug)]
#[non_exhaustive]
pub struct AppState {
    pub scene: Scene,
    pub started: Instant,
    pub game: Game,
    pub agents: AgentTable,
    /// Settings the current table was built from.
    pub config: TableConfig,
    pub menu_index: usize,
    /// Settings being edited in the menu.
    pub cfg: TableConfig,
    clock: Rc<dyn Clock>,
    logs: LogBuffer,
    help_open: bool,
    history_open: bool,
    log_open: bool,
    history_offset: usize,
    action_error: Option<String>,
    action_error_at: Option<Instant>,
    fatal: Option<String>,
}

impl AppState {
    pub const HISTORY_PAGE_SIZE: usize = 20;
    const ACTION_ERROR_TTL: Duration = Duration::from_secs(3);

    pub fn new(config: TableConfig) -> Result<Self, SupplierError> {
        Self::with_clock(config, Rc::new(MonotonicClock))
    }

    /// Build the app around `clock`; every table it deals reads time from it.
    pub fn with_clock(config: TableConfig, clock: Rc<dyn Clock>) -> Result<Self, SupplierError> {
        let game = Self::build_game(&config, &clock)?;
        let agents = Self::build_agents(&config);
        Ok(Self {
            scene: Scene::Menu,
            started: Instant::now(),
            game,
            agents,
            cfg: config.clone(),
            config,
            menu_index: 0,
            clock,
            logs: LogBuffer::default(),
            help_open: false,
            history_open: false,
            log_open: false,
            history_offset: 0,
            action_error: None,
            action_error_at: None,
            fatal: None,
        })
    }

    /// Show records from an installed logger in the log overlay.
    pub fn set_log_buffer(&mut self, logs: LogBuffer) {
        self.logs = logs;
    }

    pub fn logs(&self) -> &LogBuffer {
        &self.logs
    }

    pub(crate) fn build_game(config: &TableConfig, clock: &Rc<dyn Clock>) -> Result<Game, SupplierError> {
        Game::new(config.rules, Box::new(config.supplier()), Box::new(Rc::clone(clock)))
    }

    /// Humans take the first seats, bots the rest.
    pub(crate) fn build_agents(config: &TableConfig) -> AgentTable {
        let seats = crate::game::SEATS;
        let humans = config.human_seats();
        let mut agents = AgentTable::for_seats(seats);
        agents.set_min_action_delay_ms(config.bot_delay_ms / 2);
        for seat in 0..seats {
            if seat < humans {
                agents.set_agent(seat, Some(Box::new(HumanAgent::new())));
                continue;
            }
            let mut profile = BotProfile::for_difficulty(config.bot_difficulty)
                .with_delay_ms(config.bot_delay_ms, config.bot_delay_ms);
            if let Some(seed) = config.seed {
                profile = profile.with_seed(seed.wrapping_add(seat as u64));
            }
            agents.set_agent(seat, Some(Box::new(BotAgent::new(profile))));
        }
        agents
    }

    pub(crate) fn rebuild_table(&mut self) {
        self.fatal = None;
        self.clear_action_error();
        self.history_offset = 0;
        match Self::build_game(&self.config, &self.clock) {
            Ok(game) => self.game = game,
            Err(err) => {
                self.record_error(err.into());
                return;
            }
        }
        self.agents = Self::build_agents(&self.config);
        self.restart();
    }

    pub fn help_open(&self) -> bool {
        self.help_open
    }

    pub fn history_open(&self) -> bool {
        self.history_open
    }

    pub fn log_open(&self) -> bool {
        self.log_open
    }

    pub fn history_offset(&self) -> usize {
        self.history_offset
    }

    pub fn action_error(&self) -> Option<&str> {
        self.action_error.as_deref()
    }

    /// Set once the card supplier fails; play stops until a restart deals again.
    pub fn fatal_error(&self) -> Option<&str> {
        self.fatal.as_deref()
    }

    pub(crate) fn close_overlays(&mut self) {
        self.help_open = false;
        self.history_open = false;
        self.log_open = false;
    }

    fn clear_action_error(&mut self) {
        self.action_error = None;
        self.action_error_at = None;
    }

    fn record_error(&mut self, err: RoundError) {
        if err.is_fatal() {
            log::error!("stopping play: {err}");
            self.fatal = Some(format!("Card supplier failed: {err}"));
            return;
        }
        self.action_error = Some(err.to_string());
        self.action_error_at = Some(Instant::now());
    }

    /// Label for a seat's controller, e.g. `You` or `Bot (hard)`.
    pub fn seat_label(&self, seat: usize) -> String {
        match self.agents.agent_kind(seat) {
            Some(AgentKind::Bot) => format!("Bot ({})", self.config.bot_difficulty),
            _ => "You".to_string(),
        }
    }

    fn human_to_act(&self) -> bool {
        self.scene == Scene::Table
            && self.fatal.is_none()
            && self.game.phase() == Phase::Players
            && self.agents.agent_kind(self.game.current_seat()) == Some(AgentKind::Human)
    }

    /// Strategy hint for the acting hand, shown only on human turns.
    pub fn hint_label(&self) -> Option<&'static str> {
        if !self.human_to_act() {
            return None;
        }
        hint(&self.game).map(|a| a.label())
    }

    fn queue_command(&mut self, command: Command) -> bool {
        if !self.human_to_act() {
            return false;
        }
        self.clear_action_error();
        self.agents.receive(self.game.current_seat(), command)
    }

    pub fn handle_input(&mut self, action: InputAction) -> bool {
        match action {
            InputAction::ToggleMenu => {
                self.toggle_menu();
                false
            }
            InputAction::ToggleHelp => {
                if self.scene == Scene::Table {
                    let open = !self.help_open;
                    self.close_overlays();
                    self.help_open = open;
                }
                false
            }
            InputAction::ToggleHistory => {
                if self.scene == Scene::Table {
                    let open = !self.history_open;
                    self.close_overlays();
                    self.history_offset = 0;
                    self.history_open = open;
                }
                false
            }
            InputAction::ToggleLog => {
                if self.scene == Scene::Table {
                    let open = !self.log_open;
                    self.close_overlays();
                    self.log_open = open;
                }
                false
            }
            InputAction::HistoryUp => {
                if self.scene == Scene::Table && self.history_open {
                    let max_offset =
                        self.game.history_len().saturating_sub(Self::HISTORY_PAGE_SIZE);
                    self.history_offset = (self.history_offset + 1).min(max_offset);
                }
                false
            }
            InputAction::HistoryDown => {
                if self.scene == Scene::Table && self.history_open && self.history_offset > 0 {
                    self.history_offset -= 1;
                }
                false
            }
            InputAction::MenuNext => {
                if self.scene == Scene::Menu {
                    self.menu_next();
                }
                false
            }
            InputAction::MenuPrev => {
                if self.scene == Scene::Menu {
                    self.menu_prev();
                }
                false
            }
            InputAction::MenuInc => {
                if self.scene == Scene::Menu {
                    self.menu_inc();
                }
                false
            }
            InputAction::MenuDec => {
                if self.scene == Scene::Menu {
                    self.menu_dec();
                }
                false
            }
            InputAction::MenuApply => {
                if self.scene == Scene::Menu {
                    self.apply_menu();
                }
                false
            }
            InputAction::MenuCancel => {
                if self.scene == Scene::Menu {
                    self.cancel_menu();
                }
                false
            }
            InputAction::Hit => self.queue_command(Command::Hit),
            InputAction::Stand => self.queue_command(Command::Stand),
            InputAction::Double => self.queue_command(Command::Double),
            InputAction::Split => self.queue_command(Command::Split),
            InputAction::Restart => {
                if self.scene == Scene::Table {
                    self.restart();
                }
                false
            }
        }
    }

    /// Deal the next round if the current one is over or was aborted.
    pub fn restart(&mut self) {
        if !matches!(self.game.phase(), Phase::Over | Phase::Waiting | Phase::Aborted) {
            return;
        }
        match self.game.restart() {
            Ok(()) => {
                self.fatal = None;
                self.history_offset = 0;
                self.clear_action_error();
            }
            Err(err) => self.record_error(err),
        }
    }

    /// Per-frame work: expire stale errors, run the idle timeout, drive bots.
    pub fn tick(&mut self) {
        if let Some(at) = self.action_error_at {
            if at.elapsed() >= Self::ACTION_ERROR_TTL {
                self.clear_action_error();
            }
        }
        if self.scene != Scene::Table || self.fatal.is_some() {
            return;
        }
        if let Err(err) = self.game.tick() {
            self.record_error(err);
            return;
        }
        self.agents_on_turn();
    }

    pub fn agents_on_turn(&mut self) {
        if self.scene != Scene::Table || self.fatal.is_some() {
            return;
        }
        match self.agents.on_turn(&mut self.game) {
            Ok(true) => self.clear_action_error(),
            Ok(false) => {}
            Err(err) => self.record_error(err),
        }
    }
}
