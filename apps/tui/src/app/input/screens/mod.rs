use crate::app::state::{App, AppScreen, Focus};
use crossterm::event::KeyCode;

mod details;
mod help;
mod search;
mod sidebar;
mod timeline;

pub fn dispatch_input(app: &mut App, key: KeyCode) {
    if help::handle_help_toggle(app, key) {
        return;
    }

    // Typed characters belong to the query while the search box is open.
    if app.search_active {
        search::handle_search_input(app, key);
        return;
    }

    match app.screen {
        AppScreen::EventDetails => details::handle_details_input(app, key),
        AppScreen::Timeline => match app.focus {
            Focus::Sidebar => sidebar::handle_sidebar_input(app, key),
            Focus::Timeline => timeline::handle_timeline_input(app, key),
        },
    }
}
