use blackjack_rs::agents::Difficulty;
use blackjack_rs::config::{DealerRule, TableConfig};
use blackjack_rs::hand::PairRule;
use blackjack_rs::tui::logger::TuiLogger;
use blackjack_rs::tui::{app::AppState, controller};
use clap::Parser;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::prelude::*;
use std::io::{self, IsTerminal, Stdout};
use std::time::Duration;

/// Four-seat Blackjack against a strategy-table dealer.
#[derive(Parser, Debug)]
#[command(name = "blackjack-rs", version, about)]
struct Cli {
    /// Seed the shoe shuffle (and bots) for a reproducible table
    #[arg(long)]
    seed: Option<u64>,

    /// Decks in the shoe
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..=8))]
    decks: u64,

    /// Seconds a hand may sit idle before it stands automatically
    #[arg(long, default_value_t = 5)]
    idle_timeout: u64,

    /// strategy | hit-below-17
    #[arg(long, default_value = "strategy")]
    dealer_rule: DealerRule,

    /// same-rank | same-value
    #[arg(long, default_value = "same-rank")]
    pair_rule: PairRule,

    /// Seats played by bots, counted from the last seat
    #[arg(long, default_value_t = 0)]
    bots: usize,

    /// easy | medium | hard
    #[arg(long, default_value = "medium")]
    bot_difficulty: Difficulty,

    /// Bot thinking time in milliseconds
    #[arg(long, default_value_t = 600)]
    bot_delay_ms: u64,

    /// Log engine decisions at debug level
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn table_config(&self) -> TableConfig {
        let mut cfg = TableConfig::default();
        cfg.rules = cfg
            .rules
            .with_idle_timeout(Duration::from_secs(self.idle_timeout.max(1)))
            .with_dealer_rule(self.dealer_rule)
            .with_pair_rule(self.pair_rule);
        cfg.decks = self.decks as usize;
        cfg.seed = self.seed;
        cfg.bots = self.bots;
        cfg.bot_difficulty = self.bot_difficulty;
        cfg.bot_delay_ms = self.bot_delay_ms;
        cfg
    }
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), crossterm::terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let config = cli.table_config();
    if let Err(err) = config.validate() {
        eprintln!("blackjack-rs: {err}");
        std::process::exit(2);
    }
    if !io::stdout().is_terminal() {
        println!(
            "blackjack-rs TUI requires a real terminal (TTY).\nRun in Terminal and press q to quit. Version: {}",
            blackjack_rs::VERSION
        );
        return Ok(());
    }

    let level = if cli.verbose { log::Level::Debug } else { log::Level::Info };
    let logs = TuiLogger::install(level).map_err(io::Error::other)?;

    let mut app = match AppState::new(config) {
        Ok(app) => app,
        Err(err) => {
            eprintln!("blackjack-rs: cannot start a table: {err}");
            std::process::exit(1);
        }
    };
    app.set_log_buffer(logs);

    let mut terminal = setup_terminal()?;
    let tick_rate = Duration::from_millis(100);
    let res = controller::run(&mut terminal, &mut app, tick_rate);

    // Always attempt to restore terminal
    restore_terminal(terminal)?;
    res
}
