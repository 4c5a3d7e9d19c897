use crate::app::{App, Focus};
use crate::ui::widgets::palette::city_color;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use ratatui::Frame;
use realty_timeline::domain::{EventCity, NATIONAL_CONFIG};
use realty_timeline::events::NormalizedEvent;
use realty_timeline::grouping::QuarterBucket;

pub fn render_quarters(app: &App, f: &mut Frame<'_>, area: Rect) {
    let border = if app.focus == Focus::Timeline {
        Color::Yellow
    } else {
        Color::Cyan
    };
    let block = Block::default()
        .title(format!(" Events ({}) ", app.visible_event_count()))
        .title_style(Style::default().fg(border).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    if app.buckets.is_empty() {
        let paragraph = Paragraph::new("No quarters in this window")
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }

    let header = Row::new(vec![
        Cell::from(NATIONAL_CONFIG.label),
        Cell::from(""),
        Cell::from(selection_heading(app)),
    ])
    .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
    .bottom_margin(1);

    let rows: Vec<Row<'_>> = app
        .buckets
        .iter()
        .enumerate()
        .map(|(index, bucket)| {
            let cursor = (index == app.selected_bucket).then_some(app.selected_event);
            bucket_row(bucket, cursor)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(38),
            Constraint::Length(6),
            Constraint::Percentage(62),
        ],
    )
    .header(header)
    .block(block)
    .column_spacing(1)
    .row_highlight_style(Style::default().bg(Color::Rgb(40, 40, 40)))
    .highlight_symbol(">");

    let mut state = TableState::default().with_selected(Some(app.selected_bucket));
    f.render_stateful_widget(table, area, &mut state);
}

fn selection_heading(app: &App) -> TextLine<'static> {
    let main = app.selection.main();
    let mut spans = vec![Span::styled(
        main.label(),
        Style::default().fg(city_color(EventCity::City(main))),
    )];

    for (position, city) in app.selection.compare().iter().enumerate() {
        spans.push(Span::raw(if position == 0 { " vs " } else { " / " }));
        spans.push(Span::styled(
            city.label(),
            Style::default().fg(city_color(EventCity::City(*city))),
        ));
    }

    TextLine::from(spans)
}

/// One table row per quarter. `cursor` is the highlighted event when this
/// row is selected, counted in national, main, compare order.
fn bucket_row(bucket: &QuarterBucket, cursor: Option<usize>) -> Row<'static> {
    let national_count = bucket.national_events.len();

    let left: Vec<TextLine<'static>> = bucket
        .national_events
        .iter()
        .enumerate()
        .map(|(index, event)| event_line(event, cursor == Some(index), false))
        .collect();

    let right: Vec<TextLine<'static>> = bucket
        .main_city_events
        .iter()
        .chain(&bucket.compare_events)
        .enumerate()
        .map(|(index, event)| {
            let is_compare = index >= bucket.main_city_events.len();
            event_line(event, cursor == Some(national_count + index), is_compare)
        })
        .collect();

    let axis = Text::from(vec![
        TextLine::from(Span::styled(
            bucket.year.to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        TextLine::from(Span::styled(
            bucket.quarter.clone(),
            Style::default().fg(Color::Gray),
        )),
    ]);

    Row::new(vec![
        Cell::from(Text::from(left)),
        Cell::from(axis),
        Cell::from(Text::from(right)),
    ])
    .height(row_height(bucket))
}

/// Tall enough for the longer event column, never below the two-line axis.
fn row_height(bucket: &QuarterBucket) -> u16 {
    let right = bucket.main_city_events.len() + bucket.compare_events.len();
    let lines = bucket.national_events.len().max(right).max(2);
    u16::try_from(lines).unwrap_or(u16::MAX)
}

fn event_line(event: &NormalizedEvent, selected: bool, show_city: bool) -> TextLine<'static> {
    let color = city_color(event.city);
    let title_style = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    };

    let mut spans = vec![Span::styled(
        if selected { "> " } else { "• " },
        Style::default().fg(color),
    )];
    if show_city {
        spans.push(Span::styled(
            format!("[{}] ", event.city.label()),
            Style::default().fg(color),
        ));
    }
    spans.push(Span::styled(event.title.clone(), title_style));
    if let Some(category) = event.category.as_ref().and_then(|c| c.primary()) {
        spans.push(Span::styled(
            format!(" ({category})"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    TextLine::from(spans)
}
