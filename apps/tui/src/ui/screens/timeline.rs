use crate::app::{App, Focus, SidebarField};
use crate::ui::widgets::charts::render_price_chart;
use crate::ui::widgets::palette::city_color;
use crate::ui::widgets::quarters::render_quarters;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use realty_timeline::domain::{CityId, EventCity};
use realty_timeline::grouping::QuarterBucket;
use realty_timeline::period::Period;

const SIDEBAR_WIDTH: u16 = 30;
const CHART_HEIGHT: u16 = 14;

pub fn render_timeline(app: &App, f: &mut Frame<'_>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Viewing bar
            Constraint::Min(8),    // Sidebar + events
            Constraint::Length(3), // Status
            Constraint::Length(1), // Shortcuts hint
        ])
        .split(f.area().inner(Margin::new(1, 0)));

    render_viewing_bar(app, f, layout[0]);
    render_body(app, f, layout[1]);
    render_status_section(app, f, layout[2]);
    render_shortcuts(f, layout[3]);
}

fn render_viewing_bar(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("== Realty Timeline ==")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let main = app.selection.main();
    let mut spans = vec![
        Span::styled("Viewing ", Style::default().fg(Color::Gray)),
        Span::styled(
            main.label(),
            Style::default()
                .fg(city_color(EventCity::City(main)))
                .add_modifier(Modifier::BOLD),
        ),
    ];

    if app.selection.has_compare() {
        spans.push(Span::styled(" vs ", Style::default().fg(Color::Gray)));
        for (position, city) in app.selection.compare().iter().enumerate() {
            if position > 0 {
                spans.push(Span::styled(" / ", Style::default().fg(Color::Gray)));
            }
            spans.push(Span::styled(
                city.label(),
                Style::default().fg(city_color(EventCity::City(*city))),
            ));
        }
    }

    spans.push(Span::styled(
        format!(
            "   {} → {}",
            app.start.display_label(),
            app.end.display_label()
        ),
        Style::default().fg(Color::White),
    ));

    if app.search_active || !app.search_query.is_empty() {
        let cursor = if app.search_active { "_" } else { "" };
        spans.push(Span::styled(
            format!("   /{}{cursor}", app.search_query),
            Style::default().fg(Color::Yellow),
        ));
    }

    f.render_widget(Paragraph::new(TextLine::from(spans)).block(block), area);
}

fn render_body(app: &App, f: &mut Frame<'_>, area: Rect) {
    let (sidebar, content) = if app.sidebar_open {
        let split = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
            .split(area);
        (Some(split[0]), split[1])
    } else {
        (None, area)
    };

    if let Some(sidebar) = sidebar {
        render_sidebar(app, f, sidebar);
    }

    let drawer = if app.chart_open { CHART_HEIGHT } else { 1 };
    let split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(drawer)])
        .split(content);

    render_quarters(app, f, split[0]);

    if app.chart_open {
        render_price_chart(app, f, split[1]);
    } else {
        let collapsed = Paragraph::new(Span::styled(
            format!("▸ {} hidden, press c to open", app.price_mode.label()),
            Style::default().fg(Color::DarkGray),
        ));
        f.render_widget(collapsed, split[1]);
    }
}

fn render_sidebar(app: &App, f: &mut Frame<'_>, area: Rect) {
    let focused = app.focus == Focus::Sidebar;
    let border = if focused { Color::Yellow } else { Color::Cyan };
    let block = Block::default()
        .title(" Settings ")
        .title_style(Style::default().fg(border))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let mut lines = Vec::new();
    for (index, field) in SidebarField::ALL.into_iter().enumerate() {
        let selected = focused && index == app.sidebar_index;
        let value = match field {
            SidebarField::Start => app.start.display_label(),
            SidebarField::End => app.end.display_label(),
            SidebarField::MainCity => app.selection.main().label().to_string(),
            SidebarField::Compare => format!("{} selected", app.selection.compare().len()),
        };
        let style = if selected {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        lines.push(TextLine::from(vec![
            Span::styled(if selected { "> " } else { "  " }, style),
            Span::styled(format!("{:<13}", field.label()), style),
            Span::styled(value, Style::default().fg(Color::Gray)),
        ]));
    }

    lines.push(TextLine::from(""));
    let picking = focused && SidebarField::ALL[app.sidebar_index] == SidebarField::Compare;
    for (index, city) in CityId::ALL.into_iter().enumerate() {
        lines.push(city_toggle_line(app, city, index, picking));
    }

    lines.push(TextLine::from(""));
    lines.push(TextLine::from(Span::styled(
        format!(
            "{} events loaded, {} skipped",
            app.events.len(),
            app.dropped_records
        ),
        Style::default().fg(Color::DarkGray),
    )));
    if app.ambiguous_records > 0 {
        lines.push(TextLine::from(Span::styled(
            format!("{} with several city labels", app.ambiguous_records),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn city_toggle_line(app: &App, city: CityId, index: usize, picking: bool) -> TextLine<'static> {
    let is_main = city == app.selection.main();
    let marker = if is_main {
        "[*]"
    } else if app.selection.is_compared(city) {
        "[x]"
    } else {
        "[ ]"
    };
    let cursor = if picking && index == app.sidebar_city_index {
        "> "
    } else {
        "  "
    };

    let mut spans = vec![
        Span::styled(cursor, Style::default().fg(Color::Yellow)),
        Span::styled(format!("{} {marker} ", index + 1), Style::default().fg(Color::Gray)),
        Span::styled(
            city.label(),
            Style::default().fg(city_color(EventCity::City(city))),
        ),
    ];
    if is_main {
        spans.push(Span::styled(" (focus)", Style::default().fg(Color::DarkGray)));
    }
    TextLine::from(spans)
}

fn render_status_section(app: &App, f: &mut Frame<'_>, area: Rect) {
    let status_block = Block::default()
        .title(" Status ")
        .title_style(Style::default().fg(Color::Yellow))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    let status_text = if app.status_message.is_empty() {
        let quarter = app
            .current_bucket()
            .and_then(QuarterBucket::period)
            .map(Period::display_label)
            .unwrap_or_default();
        Text::from(Span::styled(
            format!("{quarter}  {} events in view", app.visible_event_count()),
            Style::default().fg(Color::Gray),
        ))
    } else {
        let style = if app.status_message.starts_with("At most")
            || app.status_message.contains("cannot")
        {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Green)
        };
        Text::from(Span::styled(app.status_message.as_str(), style))
    };

    let status_paragraph = Paragraph::new(status_text)
        .block(status_block)
        .wrap(Wrap { trim: true });
    f.render_widget(status_paragraph, area);
}

fn render_shortcuts(f: &mut Frame<'_>, area: Rect) {
    let key = Style::default().fg(Color::Cyan);
    let text = Style::default().fg(Color::Gray);
    let shortcuts = TextLine::from(vec![
        Span::styled("↑/↓", key),
        Span::styled(" quarter  ", text),
        Span::styled("Enter", key),
        Span::styled(" details  ", text),
        Span::styled("m", key),
        Span::styled(" focus  ", text),
        Span::styled("1-7", key),
        Span::styled(" compare  ", text),
        Span::styled("[ ] { }", key),
        Span::styled(" window  ", text),
        Span::styled("/", key),
        Span::styled(" search  ", text),
        Span::styled("F1", key),
        Span::styled(" help  ", text),
        Span::styled("q", key),
        Span::styled(" quit", text),
    ]);
    f.render_widget(Paragraph::new(shortcuts).alignment(Alignment::Center), area);
}
