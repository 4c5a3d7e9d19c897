use crate::app::App;
use crate::ui::widgets::charts::{render_line_chart, ChartSeries};
use crate::ui::widgets::palette::{area_color, city_color};
use crate::ui::widgets::popup::{bottom_line, centered_rect, ClearWidget};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line as TextLine, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use realty_timeline::events::NormalizedEvent;
use realty_timeline::prices::Area;
use scraper::{ElementRef, Html, Node};

const BLOCK_ELEMENTS: [&str; 18] = [
    "address", "article", "blockquote", "div", "dl", "dt", "dd", "h1", "h2", "h3", "h4", "h5",
    "h6", "li", "ol", "p", "tr", "ul",
];
const SKIPPED_ELEMENTS: [&str; 3] = ["script", "style", "template"];

pub fn render_details(app: &App, f: &mut Frame<'_>) {
    let Some(event) = app.current_event() else {
        return;
    };

    let popup_area = centered_rect(76, 80, f.area());
    f.render_widget(ClearWidget, popup_area);

    let color = city_color(event.city);
    let block = Block::default()
        .title(format!(" {} ", event.city.label()))
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));
    f.render_widget(block, popup_area);

    let inner = popup_area.inner(Margin::new(2, 1));
    let split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(6),
            Constraint::Length(12),
            Constraint::Length(1),
        ])
        .split(inner);

    let paragraph = Paragraph::new(Text::from(detail_lines(event)))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, split[0]);

    render_impact(app, f, split[1]);

    let hint = Paragraph::new(TextLine::from(Span::styled(
        "←/→ other events this quarter · Esc to close",
        Style::default().fg(Color::Gray),
    )))
    .alignment(Alignment::Center);
    f.render_widget(hint, bottom_line(popup_area));
}

fn detail_lines(event: &NormalizedEvent) -> Vec<TextLine<'static>> {
    let mut lines = vec![
        TextLine::from(Span::styled(
            event.title.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        TextLine::from(vec![
            Span::styled(
                format!("{} {}", event.year, event.quarter),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled("  ·  ", Style::default().fg(Color::Gray)),
            Span::styled(
                event.city.label(),
                Style::default().fg(city_color(event.city)),
            ),
        ]),
    ];

    if let Some(category) = &event.category {
        lines.push(TextLine::from(vec![
            Span::styled("Category: ", Style::default().fg(Color::Gray)),
            Span::styled(category.joined(), Style::default().fg(Color::Magenta)),
        ]));
    }

    lines.push(TextLine::from(""));
    match event.description.as_deref().map(plain_text) {
        Some(text) if !text.is_empty() => {
            lines.extend(text.lines().map(|line| TextLine::from(line.to_string())));
        }
        _ => lines.push(TextLine::from(Span::styled(
            "No description",
            Style::default().fg(Color::DarkGray),
        ))),
    }

    lines
}

/// Focus-city prices around the event quarter.
fn render_impact(app: &App, f: &mut Frame<'_>, area: Rect) {
    let window = app.impact_series();
    let city = Area::City(app.selection.main());

    #[allow(clippy::cast_precision_loss)]
    let data: Vec<(f64, f64)> = window
        .iter()
        .enumerate()
        .map(|(index, (_, value))| (index as f64, *value))
        .collect();
    let labels: Vec<String> = window.into_iter().map(|(quarter, _)| quarter).collect();

    let title = format!(" {} price around this event (萬) ", city.label());
    let lines = [ChartSeries::new(city.label(), area_color(city), data)];
    render_line_chart(f, area, &title, &lines, &labels);
}

/// Flattens detail HTML into terminal lines. Block elements and `<br>` start
/// a new line; everything else is inline.
pub fn plain_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut lines = Vec::new();
    let mut current = String::new();

    collect_text(fragment.root_element(), &mut lines, &mut current);
    flush_line(&mut lines, &mut current);

    lines.join("\n")
}

fn collect_text(element: ElementRef<'_>, lines: &mut Vec<String>, current: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => current.push_str(text),
            Node::Element(tag) => {
                let name = tag.name();
                if SKIPPED_ELEMENTS.contains(&name) {
                    continue;
                }
                if name == "br" {
                    flush_line(lines, current);
                    continue;
                }

                let Some(inner) = ElementRef::wrap(child) else {
                    continue;
                };
                let block = BLOCK_ELEMENTS.contains(&name);
                if block {
                    flush_line(lines, current);
                }
                collect_text(inner, lines, current);
                if block {
                    flush_line(lines, current);
                }
            }
            _ => {}
        }
    }
}

/// Pushes the pending line with whitespace collapsed, skipping blank ones.
fn flush_line(lines: &mut Vec<String>, current: &mut String) {
    let line = current.split_whitespace().collect::<Vec<_>>().join(" ");
    if !line.is_empty() {
        lines.push(line);
    }
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paragraphs_become_lines() {
        let html = "<p>央行<b>升息</b>半碼</p>\n<p>  房貸利率\n 調升 </p>";
        assert_eq!(plain_text(html), "央行升息半碼\n房貸利率 調升");
    }

    #[test]
    fn bare_text_is_kept() {
        assert_eq!(plain_text("實價登錄 <i>上路</i>"), "實價登錄 上路");
        assert_eq!(plain_text(""), "");
    }

    #[test]
    fn nested_blocks_print_once() {
        assert_eq!(plain_text("<blockquote><p>引用</p></blockquote>"), "引用");
        assert_eq!(plain_text("<ul><li><p>一</p></li><li>二</li></ul>"), "一\n二");
        assert_eq!(plain_text("<div><h2>標題</h2>內文</div>"), "標題\n內文");
    }

    #[test]
    fn text_around_blocks_is_kept() {
        assert_eq!(plain_text("<p>前言</p>後續說明"), "前言\n後續說明");
        assert_eq!(plain_text("開頭<p>中段</p>"), "開頭\n中段");
    }

    #[test]
    fn line_breaks_split_lines() {
        assert_eq!(plain_text("第一行<br>第二行"), "第一行\n第二行");
        assert_eq!(plain_text("<p>甲<br/>乙</p>"), "甲\n乙");
        assert_eq!(plain_text("<script>alert(1)</script>正文"), "正文");
    }

    #[test]
    fn list_items_are_separate_lines() {
        let html = "<ul><li>第一點</li><li>第二點</li></ul>";
        assert_eq!(plain_text(html), "第一點\n第二點");
    }
}
