use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use realty_timeline::domain::{city_name, CityId};
use realty_timeline::events::NormalizedEvent;
use realty_timeline::grouping::QuarterBucket;
use serde::Serialize;
use std::fmt::Write as _;
use std::io::Stdout;
use std::time::Duration;

use crate::app::{handle_input, App};
use crate::ui;

/// Print the timeline without starting the UI
pub fn run_headless(app: &App, json: bool) -> Result<()> {
    if json {
        let export = build_headless_export(app);
        println!("{}", serde_json::to_string_pretty(&export)?);
    } else {
        print!("{}", render_headless_text(app));
    }

    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HeadlessExport<'a> {
    generated_at: String,
    start: String,
    end: String,
    main_city: CityId,
    compare_cities: &'a [CityId],
    search: Option<&'a str>,
    total_events: usize,
    dropped_records: usize,
    ambiguous_records: usize,
    buckets: &'a [QuarterBucket],
}

fn build_headless_export(app: &App) -> HeadlessExport<'_> {
    HeadlessExport {
        generated_at: chrono::Utc::now().to_rfc3339(),
        start: app.start.to_string(),
        end: app.end.to_string(),
        main_city: app.selection.main(),
        compare_cities: app.selection.compare(),
        search: Some(app.search_query.as_str()).filter(|query| !query.is_empty()),
        total_events: app.visible_event_count(),
        dropped_records: app.dropped_records,
        ambiguous_records: app.ambiguous_records,
        buckets: &app.buckets,
    }
}

fn render_headless_text(app: &App) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "\nRealty Timeline");
    let _ = writeln!(out, "===============");
    let compare: Vec<&str> = app
        .selection
        .compare()
        .iter()
        .map(|city| city_name(city.as_str()))
        .collect();
    let _ = writeln!(
        out,
        "Window: {} → {}",
        app.start.display_label(),
        app.end.display_label()
    );
    let _ = writeln!(
        out,
        "Focus city: {}",
        city_name(app.selection.main().as_str())
    );
    if !compare.is_empty() {
        let _ = writeln!(out, "Compare: {}", compare.join(" / "));
    }
    if !app.search_query.is_empty() {
        let _ = writeln!(out, "Search: {}", app.search_query);
    }
    let _ = writeln!(
        out,
        "Events: {} ({} records skipped)",
        app.visible_event_count(),
        app.dropped_records
    );

    for bucket in app.buckets.iter().filter(|bucket| !bucket.is_empty()) {
        let _ = writeln!(out, "\n{} {}", bucket.year, bucket.quarter);
        for event in bucket.iter_events() {
            let _ = writeln!(out, "- {}", headless_line(event));
        }
    }

    out
}

fn headless_line(event: &NormalizedEvent) -> String {
    let mut line = format!("[{}] {}", event.city.label(), event.title);
    if let Some(category) = &event.category {
        let _ = write!(line, " ({})", category.joined());
    }
    line
}

/// Run the main application event loop
pub fn run(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    while app.running {
        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(color_eyre::eyre::eyre!("Terminal draw error: {e}"));
        }

        if matches!(
            event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    handle_input(app, key.code);
                }
                Ok(Event::Resize(width, height)) => {
                    tracing::debug!(width, height, "terminal resized");
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(error = %e, "failed to read terminal event");
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use realty_timeline::config::AppConfig;
    use realty_timeline::dataset::Dataset;
    use realty_timeline::events::normalize_dataset;
    use realty_timeline::period::Period;
    use serde_json::json;

    fn app() -> App {
        let events = normalize_dataset(&json!({
            "nation": [
                { "Quarter": "2014_Q1", "Label": "房地合一稅上路", "Category": "稅制" }
            ],
            "cities": [
                { "Quarter": "2014_Q1", "TaipeiLabel": "捷運松山線通車" },
                { "Quarter": "2014_Q3", "TainanLabel": "南科擴廠" },
                { "Quarter": "2014_Q2" }
            ]
        }));
        let mut config = AppConfig {
            start: Period { year: 2014, quarter: 1 },
            end: Period { year: 2014, quarter: 4 },
            ..AppConfig::default()
        };
        config.selection.toggle_compare(CityId::Tainan);
        App::new(
            &config,
            Dataset {
                events,
                prices: Vec::new(),
            },
        )
    }

    #[test]
    fn text_lists_populated_quarters_in_order() {
        let text = render_headless_text(&app());
        assert!(text.contains("Window: 2014 Q1 → 2014 Q4"));
        assert!(text.contains("Focus city: 台北市"));
        assert!(text.contains("Compare: 台南市"));
        assert!(text.contains("Events: 3 (1 records skipped)"));

        let national = text.find("[全國/歷史] 房地合一稅上路 (稅制)");
        let main = text.find("[台北市] 捷運松山線通車");
        let compare = text.find("[台南市] 南科擴廠");
        assert!(national.is_some() && main.is_some() && compare.is_some());
        assert!(national < main && main < compare);
        assert!(!text.contains("2014 Q2"));
    }

    #[test]
    fn json_export_carries_every_bucket() -> Result<(), serde_json::Error> {
        let app = app();
        let value = serde_json::to_value(build_headless_export(&app))?;

        assert_eq!(value["start"], "2014_Q1");
        assert_eq!(value["mainCity"], "taipei");
        assert_eq!(value["compareCities"], json!(["tainan"]));
        assert_eq!(value["search"], serde_json::Value::Null);
        assert_eq!(value["totalEvents"], 3);
        assert_eq!(value["buckets"].as_array().map(Vec::len), Some(4));
        assert_eq!(value["buckets"][2]["compareEvents"][0]["title"], "南科擴廠");
        assert!(value["generatedAt"].as_str().is_some_and(|s| !s.is_empty()));
        Ok(())
    }
}
