use crate::tui::app::{AppState, InputAction, Scene};
use crate::tui::ui;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::prelude::{CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

pub fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut AppState,
    tick_rate: Duration,
) -> io::Result<()> {
    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(app, key.code) {
                    break;
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }
    Ok(())
}

/// Map a key to an input action. Returns true when the app should quit.
pub fn handle_key(app: &mut AppState, code: KeyCode) -> bool {
    match code {
        KeyCode::Char('?') => {
            let _ = app.handle_input(InputAction::ToggleHelp);
            return false;
        }
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            let _ = app.handle_input(InputAction::ToggleHistory);
            return false;
        }
        KeyCode::Char('l') | KeyCode::Char('L') => {
            let _ = app.handle_input(InputAction::ToggleLog);
            return false;
        }
        _ => {}
    }
    if app.help_open() || app.log_open() {
        if matches!(code, KeyCode::Esc) {
            app.close_overlays();
        }
        return false;
    }
    if app.history_open() {
        match code {
            KeyCode::Up => {
                let _ = app.handle_input(InputAction::HistoryUp);
            }
            KeyCode::Down => {
                let _ = app.handle_input(InputAction::HistoryDown);
            }
            KeyCode::Esc => {
                let _ = app.handle_input(InputAction::ToggleHistory);
            }
            _ => {}
        }
        return false;
    }

    match app.scene {
        Scene::Menu => match code {
            KeyCode::Up => {
                let _ = app.handle_input(InputAction::MenuPrev);
            }
            KeyCode::Down => {
                let _ = app.handle_input(InputAction::MenuNext);
            }
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Right => {
                let _ = app.handle_input(InputAction::MenuInc);
            }
            KeyCode::Char('-') | KeyCode::Char('_') | KeyCode::Left => {
                let _ = app.handle_input(InputAction::MenuDec);
            }
            KeyCode::Enter => {
                let _ = app.handle_input(InputAction::MenuApply);
            }
            KeyCode::Esc => {
                let _ = app.handle_input(InputAction::MenuCancel);
            }
            KeyCode::Char('m') | KeyCode::Char('M') => {
                let _ = app.handle_input(InputAction::ToggleMenu);
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => return true,
            _ => {}
        },
        Scene::Table => {
            let action = match code {
                KeyCode::Char('q') | KeyCode::Char('Q') => return true,
                KeyCode::Char('m') | KeyCode::Char('M') => InputAction::ToggleMenu,
                KeyCode::Char('h') | KeyCode::Char('H') => InputAction::Hit,
                KeyCode::Char('s') | KeyCode::Char('S') => InputAction::Stand,
                KeyCode::Char('d') | KeyCode::Char('D') => InputAction::Double,
                KeyCode::Char('p') | KeyCode::Char('P') => InputAction::Split,
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Char(' ') => {
                    InputAction::Restart
                }
                _ => return false,
            };
            if app.handle_input(action) {
                app.agents_on_turn();
            }
        }
    }
    false
}
