use crate::app::App;
use crate::ui::widgets::palette::area_color;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph};
use ratatui::Frame;
use realty_timeline::prices::{series, Area};

/// One plotted line.
pub struct ChartSeries {
    pub name: String,
    pub color: Color,
    pub data: Vec<(f64, f64)>,
}

impl ChartSeries {
    /// Missing quarters come through as zero and are left out of the line.
    pub fn new(name: impl Into<String>, color: Color, data: Vec<(f64, f64)>) -> Self {
        Self {
            name: name.into(),
            color,
            data: data.into_iter().filter(|(_, y)| *y > 0.0).collect(),
        }
    }
}

pub fn render_price_chart(app: &App, f: &mut Frame<'_>, area: Rect) {
    let points = app.price_points();
    let mode = app.price_mode;
    let title = if mode.unit().is_empty() {
        format!(" {} ", mode.label())
    } else {
        format!(" {} ({}) ", mode.label(), mode.unit())
    };

    let areas = std::iter::once(Area::Nation).chain(app.selection.order().into_iter().map(Area::City));
    let lines: Vec<ChartSeries> = areas
        .map(|area| ChartSeries::new(area.label(), area_color(area), series(&points, area)))
        .collect();

    let labels: Vec<String> = points.iter().map(|point| point.quarter.clone()).collect();
    render_line_chart(f, area, &title, &lines, &labels);
}

/// Draws `lines` over `x_labels.len()` quarters, or a placeholder when
/// nothing has a value.
pub fn render_line_chart(
    f: &mut Frame<'_>,
    area: Rect,
    title: &str,
    lines: &[ChartSeries],
    x_labels: &[String],
) {
    let block = Block::default()
        .title(Span::styled(
            title.to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    if lines.iter().all(|line| line.data.is_empty()) {
        let paragraph = Paragraph::new("No price data for this window")
            .block(block)
            .alignment(Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }

    let datasets: Vec<Dataset<'_>> = lines
        .iter()
        .filter(|line| !line.data.is_empty())
        .map(|line| {
            Dataset::default()
                .name(line.name.clone())
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(line.color))
                .data(&line.data)
        })
        .collect();

    let [y_min, y_max] = y_bounds(lines);
    let y_mid = (y_min + y_max) / 2.0;
    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds(x_bounds(x_labels.len()))
                .labels(axis_labels(x_labels)),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::raw(format!("{y_min:.0}")),
                    Span::raw(format!("{y_mid:.0}")),
                    Span::raw(format!("{y_max:.0}")),
                ]),
        );

    f.render_widget(chart, area);
}

#[allow(clippy::cast_precision_loss)]
fn x_bounds(count: usize) -> [f64; 2] {
    [0.0, count.saturating_sub(1).max(1) as f64]
}

/// First, middle and last quarter.
fn axis_labels(labels: &[String]) -> Vec<Span<'static>> {
    match labels {
        [] => Vec::new(),
        [only] => vec![Span::raw(only.clone())],
        [first, .., last] => vec![
            Span::raw(first.clone()),
            Span::raw(labels[labels.len() / 2].clone()),
            Span::raw(last.clone()),
        ],
    }
}

fn y_bounds(lines: &[ChartSeries]) -> [f64; 2] {
    let values = lines.iter().flat_map(|line| line.data.iter().map(|(_, y)| *y));
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| {
        (lo.min(y), hi.max(y))
    });

    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    if (max - min).abs() < f64::EPSILON {
        return [(min - 1.0).max(0.0), max + 1.0];
    }

    let pad = (max - min) * 0.05;
    [(min - pad).max(0.0), max + pad]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_values_are_dropped_from_lines() {
        let line = ChartSeries::new("台北市", Color::Blue, vec![(0.0, 0.0), (1.0, 52.0)]);
        assert_eq!(line.data, vec![(1.0, 52.0)]);
    }

    #[test]
    fn y_bounds_pad_range() {
        let lines = [
            ChartSeries::new("a", Color::Gray, vec![(0.0, 100.0), (1.0, 200.0)]),
            ChartSeries::new("b", Color::Gray, vec![]),
        ];
        let [low, high] = y_bounds(&lines);
        assert!((low - 95.0).abs() < 1e-9);
        assert!((high - 205.0).abs() < 1e-9);
        assert_eq!(y_bounds(&[]), [0.0, 1.0]);
    }

    #[test]
    fn axis_labels_pick_ends_and_middle() {
        let labels: Vec<String> = ["2013 Q1", "2013 Q2", "2013 Q3", "2013 Q4"]
            .map(str::to_string)
            .to_vec();
        let spans = axis_labels(&labels);
        let text: Vec<&str> = spans.iter().map(|span| span.content.as_ref()).collect();
        assert_eq!(text, ["2013 Q1", "2013 Q3", "2013 Q4"]);
        assert_eq!(x_bounds(1), [0.0, 1.0]);
    }
}
