use crate::app::state::App;
use crossterm::event::KeyCode;

pub fn handle_help_toggle(app: &mut App, key: KeyCode) -> bool {
    if key == KeyCode::F(1) {
        app.show_help = !app.show_help;
        return true;
    }

    if app.show_help {
        if matches!(key, KeyCode::Esc | KeyCode::Char('q')) {
            app.show_help = false;
        }
        return true;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use realty_timeline::config::AppConfig;
    use realty_timeline::dataset::Dataset;

    #[test]
    fn help_swallows_keys_until_closed() {
        let mut app = App::new(&AppConfig::default(), Dataset::default());
        assert!(handle_help_toggle(&mut app, KeyCode::F(1)));
        assert!(app.show_help);

        assert!(handle_help_toggle(&mut app, KeyCode::Char('m')));
        assert!(app.show_help);

        assert!(handle_help_toggle(&mut app, KeyCode::Esc));
        assert!(!app.show_help);
        assert!(!handle_help_toggle(&mut app, KeyCode::Char('m')));
    }
}
