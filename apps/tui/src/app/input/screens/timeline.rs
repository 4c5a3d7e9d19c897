use crate::app::state::{App, Focus};
use crossterm::event::KeyCode;
use realty_timeline::domain::CityId;

const PAGE: isize = 4;

pub fn handle_timeline_input(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Up => app.select_prev_bucket(),
        KeyCode::Down => app.select_next_bucket(),
        KeyCode::PageUp => app.jump_buckets(-PAGE),
        KeyCode::PageDown => app.jump_buckets(PAGE),
        KeyCode::Home => app.jump_buckets(isize::MIN),
        KeyCode::End => app.jump_buckets(isize::MAX),
        KeyCode::Left => app.cycle_event(false),
        KeyCode::Right => app.cycle_event(true),
        KeyCode::Char('n') => app.select_next_populated(),
        KeyCode::Enter => app.open_details(),
        KeyCode::Tab => {
            app.sidebar_open = true;
            app.focus = Focus::Sidebar;
        }
        KeyCode::Char('[') => app.shift_start(false),
        KeyCode::Char(']') => app.shift_start(true),
        KeyCode::Char('{') => app.shift_end(false),
        KeyCode::Char('}') => app.shift_end(true),
        KeyCode::Char('m') => app.cycle_main_city(true),
        KeyCode::Char('M') => app.cycle_main_city(false),
        KeyCode::Char(digit @ '1'..='7') => {
            let index = digit as usize - '1' as usize;
            if let Some(city) = CityId::from_index(index) {
                app.toggle_compare_city(city);
            }
        }
        KeyCode::Char('r') => app.reset_compare(),
        KeyCode::Char('c') => app.chart_open = !app.chart_open,
        KeyCode::Char('p') => app.toggle_price_mode(),
        KeyCode::Char('s') => app.sidebar_open = !app.sidebar_open,
        KeyCode::Char('/') => app.start_search(),
        KeyCode::Esc => {
            if app.search_query.is_empty() {
                app.status_message.clear();
            } else {
                app.clear_search();
            }
        }
        KeyCode::Char('q') => {
            app.running = false;
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use realty_timeline::config::AppConfig;
    use realty_timeline::dataset::Dataset;

    fn app() -> App {
        App::new(&AppConfig::default(), Dataset::default())
    }

    #[test]
    fn digits_toggle_compare_cities() {
        let mut app = app();
        handle_timeline_input(&mut app, KeyCode::Char('7'));
        assert_eq!(app.selection.compare(), [CityId::Kaohsiung]);

        // 1 is the focus city and stays out of the compare list.
        handle_timeline_input(&mut app, KeyCode::Char('1'));
        assert_eq!(app.selection.compare(), [CityId::Kaohsiung]);

        handle_timeline_input(&mut app, KeyCode::Char('r'));
        assert!(!app.selection.has_compare());
    }

    #[test]
    fn brackets_move_window_edges() {
        let mut app = app();
        handle_timeline_input(&mut app, KeyCode::Char(']'));
        handle_timeline_input(&mut app, KeyCode::Char('{'));
        assert_eq!(app.start.display_label(), "2013 Q2");
        assert_eq!(app.end.display_label(), "2025 Q3");
        assert_eq!(app.buckets.len(), 50);
    }

    #[test]
    fn toggles_and_quit() {
        let mut app = app();
        handle_timeline_input(&mut app, KeyCode::Char('c'));
        handle_timeline_input(&mut app, KeyCode::Char('s'));
        assert!(!app.chart_open);
        assert!(!app.sidebar_open);

        handle_timeline_input(&mut app, KeyCode::Tab);
        assert!(app.sidebar_open);
        assert_eq!(app.focus, Focus::Sidebar);

        handle_timeline_input(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }
}
