//! Quarter buckets for the timeline list.

use crate::domain::{CityId, EventCity};
use crate::events::NormalizedEvent;
use crate::period::{catalog, Period, PeriodError};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Rank given to cities missing from the caller's order. Sorts last.
pub const UNRANKED: usize = usize::MAX;

/// Events of one quarter, split by role relative to the selected cities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuarterBucket {
    pub year: i32,
    pub quarter: String,
    pub national_events: Vec<NormalizedEvent>,
    pub main_city_events: Vec<NormalizedEvent>,
    pub compare_events: Vec<NormalizedEvent>,
}

impl QuarterBucket {
    fn empty(period: Period) -> Self {
        Self {
            year: period.year,
            quarter: period.label(),
            national_events: Vec::new(),
            main_city_events: Vec::new(),
            compare_events: Vec::new(),
        }
    }

    pub fn period(&self) -> Option<Period> {
        Period::from_parts(self.year, &self.quarter)
    }

    pub fn event_count(&self) -> usize {
        self.national_events.len() + self.main_city_events.len() + self.compare_events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.event_count() == 0
    }

    /// National, then main, then compare events.
    pub fn iter_events(&self) -> impl Iterator<Item = &NormalizedEvent> {
        self.national_events
            .iter()
            .chain(&self.main_city_events)
            .chain(&self.compare_events)
    }
}

/// Position of each city in the caller's display order.
#[derive(Debug, Clone, Default)]
pub struct CityPriority {
    ranks: HashMap<CityId, usize>,
}

impl CityPriority {
    /// Earlier entries win if a city is listed twice.
    pub fn new(order: &[CityId]) -> Self {
        let mut ranks = HashMap::with_capacity(order.len());
        for (index, city) in order.iter().enumerate() {
            ranks.entry(*city).or_insert(index);
        }
        Self { ranks }
    }

    pub fn rank(&self, city: EventCity) -> usize {
        city.city()
            .and_then(|city| self.ranks.get(&city).copied())
            .unwrap_or(UNRANKED)
    }
}

/// Groups events into per-quarter buckets for `[start_period, end_period]`.
///
/// Period strings must look like `2013_Q1`. A window that ends before it
/// starts yields no buckets.
pub fn group_by_quarter(
    events: &[NormalizedEvent],
    start_period: &str,
    end_period: &str,
    cities_order: &[CityId],
) -> Result<Vec<QuarterBucket>, PeriodError> {
    let start = Period::parse(start_period)?;
    let end = Period::parse(end_period)?;
    Ok(group_by_period(events, start, end, cities_order))
}

/// [`group_by_quarter`] over already-parsed periods.
///
/// One bucket exists for every catalog quarter inside the window, whether or
/// not any event falls in it. `cities_order[0]` is the main city.
pub fn group_by_period(
    events: &[NormalizedEvent],
    start: Period,
    end: Period,
    cities_order: &[CityId],
) -> Vec<QuarterBucket> {
    let (start_ordinal, end_ordinal) = (start.ordinal(), end.ordinal());

    let mut buckets: BTreeMap<Period, QuarterBucket> = catalog()
        .filter(|period| (start_ordinal..=end_ordinal).contains(&period.ordinal()))
        .map(|period| (period, QuarterBucket::empty(period)))
        .collect();

    let main_city = cities_order.first().copied();

    for event in events {
        let Some(bucket) = event.period().and_then(|period| buckets.get_mut(&period)) else {
            continue;
        };

        if event.is_national {
            bucket.national_events.push(event.clone());
        } else if main_city.is_some() && event.city.city() == main_city {
            bucket.main_city_events.push(event.clone());
        } else {
            bucket.compare_events.push(event.clone());
        }
    }

    let priority = CityPriority::new(cities_order);
    for bucket in buckets.values_mut() {
        bucket
            .compare_events
            .sort_by_key(|event| priority.rank(event.city));
    }

    buckets.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(year: i32, quarter: &str, city: EventCity, title: &str) -> NormalizedEvent {
        NormalizedEvent {
            year,
            quarter: quarter.to_string(),
            city,
            title: title.to_string(),
            category: None,
            is_national: city.is_national(),
            description: None,
        }
    }

    fn city(id: CityId) -> EventCity {
        EventCity::City(id)
    }

    #[test]
    fn window_gets_every_quarter_even_when_empty() -> Result<(), PeriodError> {
        let buckets = group_by_quarter(&[], "2013_Q1", "2013_Q4", &[CityId::Taipei])?;
        let keys: Vec<(i32, &str)> = buckets
            .iter()
            .map(|b| (b.year, b.quarter.as_str()))
            .collect();
        assert_eq!(keys, [(2013, "Q1"), (2013, "Q2"), (2013, "Q3"), (2013, "Q4")]);
        assert!(buckets.iter().all(QuarterBucket::is_empty));
        Ok(())
    }

    #[test]
    fn bucket_count_matches_window_and_is_capped_to_catalog() -> Result<(), PeriodError> {
        assert_eq!(group_by_quarter(&[], "2013_Q1", "2025_Q4", &[])?.len(), 52);
        assert_eq!(group_by_quarter(&[], "2014_Q3", "2016_Q2", &[])?.len(), 8);
        assert_eq!(group_by_quarter(&[], "2010_Q1", "2013_Q2", &[])?.len(), 2);
        assert_eq!(group_by_quarter(&[], "2025_Q3", "2030_Q1", &[])?.len(), 2);
        assert!(group_by_quarter(&[], "2016_Q1", "2015_Q4", &[])?.is_empty());
        Ok(())
    }

    #[test]
    fn compare_city_lands_in_compare_events() -> Result<(), PeriodError> {
        let events = vec![
            event(2013, "Q2", city(CityId::Tainan), "南科"),
            event(2013, "Q2", city(CityId::Taipei), "北捷"),
            event(2013, "Q2", EventCity::National, "奢侈稅"),
        ];
        let buckets = group_by_quarter(
            &events,
            "2013_Q1",
            "2013_Q4",
            &[CityId::Taipei, CityId::Tainan],
        )?;

        assert_eq!(buckets.len(), 4);
        let q2 = &buckets[1];
        assert_eq!((q2.year, q2.quarter.as_str()), (2013, "Q2"));
        assert_eq!(q2.compare_events, vec![events[0].clone()]);
        assert_eq!(q2.main_city_events, vec![events[1].clone()]);
        assert_eq!(q2.national_events, vec![events[2].clone()]);
        Ok(())
    }

    #[test]
    fn events_outside_window_are_excluded() -> Result<(), PeriodError> {
        let events = vec![
            event(2012, "Q4", EventCity::National, "too early"),
            event(2013, "Q1", EventCity::National, "inside"),
            event(2014, "Q1", city(CityId::Taipei), "too late"),
            event(0, "", EventCity::National, "undated"),
        ];
        let buckets = group_by_quarter(&events, "2013_Q1", "2013_Q4", &[CityId::Taipei])?;

        let titles: Vec<&str> = buckets
            .iter()
            .flat_map(QuarterBucket::iter_events)
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(titles, ["inside"]);
        Ok(())
    }

    #[test]
    fn partitions_are_exclusive() -> Result<(), PeriodError> {
        let mut events = Vec::new();
        for (index, id) in CityId::ALL.into_iter().enumerate() {
            events.push(event(2018, "Q3", city(id), &format!("city-{index}")));
        }
        events.push(event(2018, "Q3", EventCity::National, "nation"));

        let order = [CityId::Taichung, CityId::Taipei, CityId::Kaohsiung];
        let buckets = group_by_quarter(&events, "2018_Q1", "2018_Q4", &order)?;

        let mut seen = 0;
        for bucket in &buckets {
            assert!(bucket.national_events.iter().all(|e| e.is_national));
            assert!(bucket
                .main_city_events
                .iter()
                .all(|e| !e.is_national && e.city == city(CityId::Taichung)));
            assert!(bucket
                .compare_events
                .iter()
                .all(|e| !e.is_national && e.city != city(CityId::Taichung)));
            seen += bucket.event_count();
        }
        assert_eq!(seen, events.len());
        Ok(())
    }

    #[test]
    fn compare_events_follow_caller_order_with_unknown_last() -> Result<(), PeriodError> {
        let events = vec![
            event(2020, "Q1", city(CityId::Hsinchu), "unlisted"),
            event(2020, "Q1", city(CityId::Kaohsiung), "k1"),
            event(2020, "Q1", city(CityId::Taoyuan), "t1"),
            event(2020, "Q1", city(CityId::Kaohsiung), "k2"),
            event(2020, "Q1", city(CityId::Taoyuan), "t2"),
        ];
        let order = [CityId::Taipei, CityId::Taoyuan, CityId::Kaohsiung];
        let buckets = group_by_quarter(&events, "2020_Q1", "2020_Q1", &order)?;

        let titles: Vec<&str> = buckets[0]
            .compare_events
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(titles, ["t1", "t2", "k1", "k2", "unlisted"]);
        Ok(())
    }

    #[test]
    fn empty_order_sends_city_events_to_compare() {
        let events = vec![event(2013, "Q1", city(CityId::Taipei), "x")];
        let buckets = group_by_period(
            &events,
            Period { year: 2013, quarter: 1 },
            Period { year: 2013, quarter: 1 },
            &[],
        );
        assert_eq!(buckets[0].compare_events.len(), 1);
        assert!(buckets[0].main_city_events.is_empty());
    }

    #[test]
    fn malformed_window_fails_loudly() {
        let result = group_by_quarter(&[], "2013-Q1", "2013_Q4", &[CityId::Taipei]);
        assert_eq!(
            result,
            Err(PeriodError::InvalidPeriodFormat("2013-Q1".to_string()))
        );
    }

    #[test]
    fn priority_rank_uses_first_position() {
        let priority = CityPriority::new(&[CityId::Tainan, CityId::Taipei, CityId::Tainan]);
        assert_eq!(priority.rank(city(CityId::Tainan)), 0);
        assert_eq!(priority.rank(city(CityId::Taipei)), 1);
        assert_eq!(priority.rank(city(CityId::Hsinchu)), UNRANKED);
        assert_eq!(priority.rank(EventCity::National), UNRANKED);
    }
}
