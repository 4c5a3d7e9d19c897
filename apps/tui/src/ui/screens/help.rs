use crate::ui::widgets::popup::{bottom_line, centered_rect, ClearWidget};
use ratatui::layout::Alignment;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

const SECTIONS: [(&str, &[(&str, &str)]); 4] = [
    (
        "Timeline",
        &[
            ("↑/↓", "Previous / next quarter"),
            ("PgUp/PgDn", "Jump four quarters"),
            ("←/→", "Pick an event in the quarter"),
            ("n", "Next quarter with events"),
            ("Enter", "Event details"),
        ],
    ),
    (
        "Cities",
        &[
            ("m / M", "Cycle focus city"),
            ("1-7", "Toggle compare city (up to 3)"),
            ("r", "Reset compare cities"),
            ("Tab", "Settings sidebar"),
        ],
    ),
    (
        "Window & chart",
        &[
            ("[ / ]", "Move start quarter"),
            ("{ / }", "Move end quarter"),
            ("c", "Show / hide price chart"),
            ("p", "Median price / price index"),
            ("s", "Show / hide sidebar"),
        ],
    ),
    (
        "General",
        &[
            ("/", "Search titles and categories"),
            ("Esc", "Clear search / close popup"),
            ("F1", "Toggle this help"),
            ("q", "Quit"),
        ],
    ),
];

pub fn render_help(f: &mut Frame<'_>) {
    let popup_area = centered_rect(60, 80, f.area());
    f.render_widget(ClearWidget, popup_area);

    let help_block = Block::default()
        .title("== Help & Keyboard Shortcuts ==")
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let help_paragraph = Paragraph::new(Text::from(build_help_lines()))
        .block(help_block)
        .wrap(Wrap { trim: true });
    f.render_widget(help_paragraph, popup_area);

    let hint = Paragraph::new(TextLine::from(Span::styled(
        "Press F1 or Esc to close",
        Style::default().fg(Color::Gray),
    )))
    .alignment(Alignment::Center);
    f.render_widget(hint, bottom_line(popup_area));
}

fn build_help_lines() -> Vec<TextLine<'static>> {
    let mut lines = Vec::new();
    for (title, keys) in SECTIONS {
        lines.push(TextLine::from(Span::styled(
            title,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));
        for (key, action) in keys {
            lines.push(TextLine::from(vec![
                Span::styled(format!("  {key:<12}"), Style::default().fg(Color::Cyan)),
                Span::styled(*action, Style::default().fg(Color::White)),
            ]));
        }
        lines.push(TextLine::from(""));
    }
    lines
}
