//! Narrowing the full event list down to what the dashboard shows.

use crate::domain::CityId;
use crate::events::NormalizedEvent;
use crate::period::Period;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// Events inside `[start, end]` that are national or belong to a city in
/// `order`. Undated events never match.
pub fn filter_view<'a>(
    events: &'a [NormalizedEvent],
    start: Period,
    end: Period,
    order: &[CityId],
) -> Vec<&'a NormalizedEvent> {
    let window = start.ordinal()..=end.ordinal();

    events
        .iter()
        .filter(|event| {
            event
                .period()
                .is_some_and(|period| window.contains(&period.ordinal()))
        })
        .filter(|event| {
            event.is_national || event.city.city().is_some_and(|city| order.contains(&city))
        })
        .collect()
}

/// Fuzzy search over titles and categories, best match first.
///
/// A blank query keeps every event in its original order.
pub fn search_events<'a>(events: &[&'a NormalizedEvent], query: &str) -> Vec<&'a NormalizedEvent> {
    let query = query.trim();
    if query.is_empty() {
        return events.to_vec();
    }

    let matcher = SkimMatcherV2::default();
    let mut scored: Vec<(i64, usize, &'a NormalizedEvent)> = events
        .iter()
        .enumerate()
        .filter_map(|(index, event)| {
            let title = matcher.fuzzy_match(&event.title, query);
            let category = event
                .category
                .as_ref()
                .and_then(|category| matcher.fuzzy_match(&category.joined(), query));
            title.max(category).map(|score| (score, index, *event))
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
    scored.into_iter().map(|(_, _, event)| event).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EventCity;
    use crate::events::Category;

    fn event(period: &str, city: EventCity, title: &str) -> NormalizedEvent {
        let (year, quarter) = period.split_once('_').unwrap_or(("0", ""));
        NormalizedEvent {
            year: year.parse().unwrap_or(0),
            quarter: quarter.to_string(),
            city,
            title: title.to_string(),
            category: None,
            is_national: city.is_national(),
            description: None,
        }
    }

    fn period(year: i32, quarter: u8) -> Period {
        Period { year, quarter }
    }

    #[test]
    fn keeps_window_and_selected_cities() {
        let events = vec![
            event("2014_Q1", EventCity::National, "nation"),
            event("2014_Q2", EventCity::City(CityId::Taipei), "main"),
            event("2014_Q2", EventCity::City(CityId::Tainan), "compare"),
            event("2014_Q2", EventCity::City(CityId::Hsinchu), "unselected"),
            event("2016_Q1", EventCity::City(CityId::Taipei), "late"),
            event("0_", EventCity::National, "undated"),
        ];

        let view = filter_view(
            &events,
            period(2014, 1),
            period(2015, 4),
            &[CityId::Taipei, CityId::Tainan],
        );
        let titles: Vec<&str> = view.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["nation", "main", "compare"]);
    }

    #[test]
    fn search_ranks_matches_and_skips_misses() {
        let mut tagged = event("2015_Q1", EventCity::National, "央行升息");
        tagged.category = Some(Category::One("政策".to_string()));
        let events = vec![
            event("2014_Q2", EventCity::City(CityId::Taipei), "捷運通車"),
            tagged,
            event("2016_Q1", EventCity::City(CityId::Taipei), "捷運環狀線"),
        ];
        let refs: Vec<&NormalizedEvent> = events.iter().collect();

        let hits = search_events(&refs, "捷運");
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|e| e.title.contains("捷運")));

        let by_category = search_events(&refs, "政策");
        assert_eq!(by_category.len(), 1);
        assert_eq!(by_category[0].title, "央行升息");

        assert_eq!(search_events(&refs, "  ").len(), 3);
        assert!(search_events(&refs, "zzz").is_empty());
    }
}
