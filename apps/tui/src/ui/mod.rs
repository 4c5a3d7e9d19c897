// UI module for realty_timeline
// Handles all UI rendering functions

pub mod screens;
pub mod widgets;

use crate::app::state::AppScreen;
use crate::app::App;
use ratatui::Frame;

pub fn ui(app: &App, f: &mut Frame<'_>) {
    screens::timeline::render_timeline(app, f);

    if app.screen == AppScreen::EventDetails {
        screens::details::render_details(app, f);
    }

    if app.show_help {
        screens::help::render_help(f);
    }
}
