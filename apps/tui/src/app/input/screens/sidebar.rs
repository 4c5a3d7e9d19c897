use crate::app::input::helpers::wrap_step;
use crate::app::state::{App, Focus, SidebarField};
use crossterm::event::KeyCode;
use realty_timeline::domain::CityId;

pub fn handle_sidebar_input(app: &mut App, key: KeyCode) {
    let fields = SidebarField::ALL.len();
    let field = SidebarField::ALL[app.sidebar_index % fields];

    match key {
        KeyCode::Up => {
            app.sidebar_index = wrap_step(app.sidebar_index, fields, false);
        }
        KeyCode::Down => {
            app.sidebar_index = wrap_step(app.sidebar_index, fields, true);
        }
        KeyCode::Left | KeyCode::Right => adjust(app, field, key == KeyCode::Right),
        KeyCode::Enter | KeyCode::Char(' ') => {
            if field == SidebarField::Compare {
                if let Some(city) = CityId::from_index(app.sidebar_city_index) {
                    app.toggle_compare_city(city);
                }
            }
        }
        KeyCode::Char('r') => app.reset_compare(),
        KeyCode::Tab | KeyCode::Esc => {
            app.focus = Focus::Timeline;
        }
        KeyCode::Char('q') => {
            app.running = false;
        }
        _ => {}
    }
}

fn adjust(app: &mut App, field: SidebarField, forward: bool) {
    match field {
        SidebarField::Start => app.shift_start(forward),
        SidebarField::End => app.shift_end(forward),
        SidebarField::MainCity => app.cycle_main_city(forward),
        SidebarField::Compare => {
            app.sidebar_city_index = wrap_step(app.sidebar_city_index, CityId::ALL.len(), forward);
        }
    }
}
