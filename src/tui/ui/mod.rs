mod layout;
mod menu;
mod table;

use crate::tui::app::{AppState, Scene};
use ratatui::prelude::Frame;

/// Draw the current scene, then at most one overlay on top of the table.
/// A supplier failure banner wins over everything else.
pub fn draw(f: &mut Frame, app: &AppState) {
    if app.scene == Scene::Menu {
        menu::draw_menu(f, app);
        return;
    }
    table::draw_table(f, app);
    if let Some(err) = app.fatal_error() {
        table::draw_fatal(f, err);
    } else if app.help_open() {
        table::draw_help(f);
    } else if app.history_open() {
        table::draw_history(f, app);
    } else if app.log_open() {
        table::draw_log(f, app);
    }
}
