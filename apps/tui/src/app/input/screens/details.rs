use crate::app::state::{App, AppScreen};
use crossterm::event::KeyCode;

pub fn handle_details_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace => {
            app.screen = AppScreen::Timeline;
        }
        KeyCode::Left => app.cycle_event(false),
        KeyCode::Right => app.cycle_event(true),
        KeyCode::Char('q') => {
            app.running = false;
        }
        _ => {}
    }
}
