use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_search_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char(c) => app.push_search_char(c),
        KeyCode::Backspace => app.pop_search_char(),
        KeyCode::Enter => {
            app.search_active = false;
            app.status_message = format!("{} matching events", app.visible_event_count());
        }
        KeyCode::Esc => app.clear_search(),
        _ => {}
    }
}
