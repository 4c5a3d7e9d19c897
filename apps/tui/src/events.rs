//! Normalization of raw per-city event records.
//!
//! Source lists do not share a schema. Each record announces its city by
//! which title field it populates (`TaipeiLabel`, `KaohsiungLabel`, ...), and
//! national events use the generic `Label`. Records are turned into
//! [`NormalizedEvent`]s once at load time.

use crate::domain::{CityId, EventCity};
use crate::period::Period;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Generic title fields, checked after every per-city field.
const NATIONAL_FIELDS: [&str; 2] = ["Label", "NationalLabel"];

/// Per-city title fields in the order they are tested. First match wins.
const CITY_LABEL_FIELDS: [(&str, CityId); 7] = [
    (CityId::Taipei.label_field(), CityId::Taipei),
    (CityId::NewTaipei.label_field(), CityId::NewTaipei),
    (CityId::Taoyuan.label_field(), CityId::Taoyuan),
    (CityId::Hsinchu.label_field(), CityId::Hsinchu),
    (CityId::Taichung.label_field(), CityId::Taichung),
    (CityId::Tainan.label_field(), CityId::Tainan),
    (CityId::Kaohsiung.label_field(), CityId::Kaohsiung),
];

/// `Category` is either one tag or a list of tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Category {
    One(String),
    Many(Vec<String>),
}

impl Category {
    pub fn values(&self) -> Vec<&str> {
        match self {
            Self::One(value) => vec![value.as_str()],
            Self::Many(values) => values.iter().map(String::as_str).collect(),
        }
    }

    pub fn primary(&self) -> Option<&str> {
        self.values().into_iter().next()
    }

    /// Tags joined for display, `"政策 / 交通"`.
    pub fn joined(&self) -> String {
        self.values().join(" / ")
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(tag) if !tag.is_empty() => Some(Self::One(tag.clone())),
            Value::Array(items) => {
                let tags: Vec<String> = items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect();
                if tags.is_empty() {
                    None
                } else {
                    Some(Self::Many(tags))
                }
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEvent {
    pub year: i32,
    pub quarter: String,
    pub city: EventCity,
    pub title: String,
    pub category: Option<Category>,
    pub is_national: bool,
    /// Raw HTML from the source `Detail` field. Not sanitized here.
    pub description: Option<String>,
}

impl NormalizedEvent {
    /// Typed period, or `None` when the source quarter was malformed.
    pub fn period(&self) -> Option<Period> {
        Period::from_parts(self.year, &self.quarter)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("record is not an object")]
    NotAnObject,
    #[error("record has no populated title field")]
    MissingTitle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedRecord {
    pub index: usize,
    pub reason: RecordError,
}

/// A record that populated more than one per-city title field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousRecord {
    pub index: usize,
    pub fields: Vec<&'static str>,
    pub resolved: CityId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub events: Vec<NormalizedEvent>,
    pub dropped: Vec<DroppedRecord>,
    pub ambiguous: Vec<AmbiguousRecord>,
}

/// Normalizes a list of raw records, silently dropping bad ones.
///
/// Accepts a flat array or an array of arrays (one per source list). Any other
/// top-level shape logs an error and yields no events.
pub fn normalize(raw: &Value) -> Vec<NormalizedEvent> {
    normalize_with_report(raw).events
}

/// Like [`normalize`], also reporting what was dropped or flagged and why.
/// Indices refer to positions in the flattened input.
pub fn normalize_with_report(raw: &Value) -> NormalizeReport {
    let Value::Array(items) = raw else {
        tracing::error!(input = %shape_of(raw), "normalize received a non-array event list");
        return NormalizeReport::default();
    };

    let mut report = NormalizeReport::default();
    for (index, record) in flatten(items).into_iter().enumerate() {
        if let Some(fields) = ambiguous_fields(record) {
            let resolved = CITY_LABEL_FIELDS
                .iter()
                .find(|(field, _)| fields.contains(field))
                .map(|(_, city)| *city);
            if let Some(resolved) = resolved {
                tracing::warn!(index, ?fields, city = %resolved, "record carries several city labels");
                report.ambiguous.push(AmbiguousRecord {
                    index,
                    fields,
                    resolved,
                });
            }
        }

        match parse_record(record) {
            Ok(event) => report.events.push(event),
            Err(reason) => {
                tracing::debug!(index, %reason, "dropping event record");
                report.dropped.push(DroppedRecord { index, reason });
            }
        }
    }

    tracing::debug!(
        kept = report.events.len(),
        dropped = report.dropped.len(),
        "normalized event records"
    );
    report
}

/// Normalizes the bundled dataset, which is either an array or an object
/// whose values are the per-source record lists.
pub fn normalize_dataset(raw: &Value) -> NormalizeReport {
    match raw {
        Value::Object(lists) => {
            let merged = Value::Array(lists.values().cloned().collect());
            normalize_with_report(&merged)
        }
        other => normalize_with_report(other),
    }
}

/// Parses one raw record into an event.
pub fn parse_record(record: &Value) -> Result<NormalizedEvent, RecordError> {
    let Value::Object(fields) = record else {
        return Err(RecordError::NotAnObject);
    };

    let (year, quarter) = split_quarter(fields.get("Quarter"));
    let (city, title) = resolve_title(fields).ok_or(RecordError::MissingTitle)?;

    Ok(NormalizedEvent {
        year,
        quarter,
        city,
        title,
        category: fields.get("Category").and_then(Category::from_value),
        is_national: city.is_national(),
        description: text_field(fields, "Detail").map(str::to_string),
    })
}

fn flatten(items: &[Value]) -> Vec<&Value> {
    items
        .iter()
        .flat_map(|item| match item {
            Value::Array(inner) => inner.iter().collect::<Vec<_>>(),
            other => vec![other],
        })
        .collect()
}

/// `"2014_Q2"` -> `(2014, "Q2")`. Missing pieces become `0` / `""`.
fn split_quarter(value: Option<&Value>) -> (i32, String) {
    let Some(raw) = value.and_then(Value::as_str).filter(|s| !s.is_empty()) else {
        return (0, String::new());
    };

    let mut parts = raw.split('_');
    let year = parts.next().map_or(0, leading_int);
    let quarter = parts.next().unwrap_or_default().to_string();
    (year, quarter)
}

fn leading_int(value: &str) -> i32 {
    let trimmed = value.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().unwrap_or(0)
}

fn resolve_title(fields: &Map<String, Value>) -> Option<(EventCity, String)> {
    for (field, city) in CITY_LABEL_FIELDS {
        if let Some(title) = text_field(fields, field) {
            return Some((EventCity::City(city), title.to_string()));
        }
    }

    NATIONAL_FIELDS
        .iter()
        .find_map(|field| text_field(fields, field))
        .map(|title| (EventCity::National, title.to_string()))
}

fn ambiguous_fields(record: &Value) -> Option<Vec<&'static str>> {
    let Value::Object(fields) = record else {
        return None;
    };
    let populated: Vec<&'static str> = CITY_LABEL_FIELDS
        .iter()
        .map(|(field, _)| *field)
        .filter(|field| text_field(fields, field).is_some())
        .collect();
    (populated.len() > 1).then_some(populated)
}

/// A field counts as present only when it holds a non-empty string.
fn text_field<'a>(fields: &'a Map<String, Value>, name: &str) -> Option<&'a str> {
    fields
        .get(name)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

fn shape_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn city_label_sets_city_and_title() -> Result<(), RecordError> {
        let event = parse_record(&json!({
            "Quarter": "2014_Q2",
            "TaipeiLabel": "捷運通車",
            "Category": "交通"
        }))?;

        assert_eq!(event.year, 2014);
        assert_eq!(event.quarter, "Q2");
        assert_eq!(event.city, EventCity::City(CityId::Taipei));
        assert_eq!(event.title, "捷運通車");
        assert!(!event.is_national);
        assert_eq!(event.category, Some(Category::One("交通".to_string())));
        assert_eq!(event.description, None);
        Ok(())
    }

    #[test]
    fn generic_label_is_national() -> Result<(), RecordError> {
        let event = parse_record(&json!({ "Quarter": "2015_Q1", "Label": "央行升息" }))?;

        assert_eq!(event.year, 2015);
        assert_eq!(event.quarter, "Q1");
        assert_eq!(event.city, EventCity::National);
        assert_eq!(event.title, "央行升息");
        assert!(event.is_national);
        Ok(())
    }

    #[test]
    fn national_label_field_is_accepted() -> Result<(), RecordError> {
        let event = parse_record(&json!({ "Quarter": "2016_Q3", "NationalLabel": "房地合一" }))?;
        assert!(event.is_national);
        assert_eq!(event.title, "房地合一");
        Ok(())
    }

    #[test]
    fn missing_title_is_rejected() {
        assert_eq!(
            parse_record(&json!({ "Quarter": "2015_Q1", "Detail": "<p>x</p>" })),
            Err(RecordError::MissingTitle)
        );
        assert_eq!(
            parse_record(&json!({ "Quarter": "2015_Q1", "TainanLabel": "" })),
            Err(RecordError::MissingTitle)
        );
        assert_eq!(parse_record(&json!("2015_Q1")), Err(RecordError::NotAnObject));
    }

    #[test]
    fn malformed_quarter_defaults_without_failing() -> Result<(), RecordError> {
        let missing = parse_record(&json!({ "Label": "無季度" }))?;
        assert_eq!((missing.year, missing.quarter.as_str()), (0, ""));
        assert_eq!(missing.period(), None);

        let odd = parse_record(&json!({ "Quarter": "sometime", "Label": "奇怪" }))?;
        assert_eq!((odd.year, odd.quarter.as_str()), (0, ""));
        Ok(())
    }

    #[test]
    fn detail_and_list_category_pass_through() -> Result<(), RecordError> {
        let event = parse_record(&json!({
            "Quarter": "2020_Q4",
            "KaohsiungLabel": "台積電設廠",
            "Category": ["產業", "政策"],
            "Detail": "<b>楠梓</b>園區"
        }))?;

        assert_eq!(event.description.as_deref(), Some("<b>楠梓</b>園區"));
        let category = event.category.as_ref().map(Category::joined);
        assert_eq!(category.as_deref(), Some("產業 / 政策"));
        assert_eq!(event.category.as_ref().and_then(Category::primary), Some("產業"));
        Ok(())
    }

    #[test]
    fn category_keeps_only_present_string_tags() -> Result<(), RecordError> {
        let mixed = parse_record(&json!({
            "Quarter": "2021_Q1",
            "Label": "升息",
            "Category": [1, "政策", null]
        }))?;
        assert_eq!(mixed.category, Some(Category::Many(vec!["政策".to_string()])));

        for blank in [json!(""), json!([]), json!([2, false]), json!(7)] {
            let event = parse_record(&json!({
                "Quarter": "2021_Q1",
                "Label": "升息",
                "Category": blank
            }))?;
            assert_eq!(event.category, None);
        }
        Ok(())
    }

    #[test]
    fn first_city_field_wins_and_is_flagged() {
        let report = normalize_with_report(&json!([{
            "Quarter": "2019_Q1",
            "TainanLabel": "南科擴建",
            "NewTaipeiLabel": "環狀線"
        }]));

        assert_eq!(report.events.len(), 1);
        assert_eq!(report.events[0].city, EventCity::City(CityId::NewTaipei));
        assert_eq!(report.events[0].title, "環狀線");
        assert_eq!(
            report.ambiguous,
            vec![AmbiguousRecord {
                index: 0,
                fields: vec!["NewTaipeiLabel", "TainanLabel"],
                resolved: CityId::NewTaipei,
            }]
        );
    }

    #[test]
    fn nested_lists_are_flattened_once() {
        let nested = json!([
            [{ "Quarter": "2013_Q1", "TaipeiLabel": "a" }],
            [{ "Quarter": "2013_Q2", "TainanLabel": "b" }, { "Quarter": "2013_Q3" }],
            { "Quarter": "2013_Q4", "Label": "c" }
        ]);
        let report = normalize_with_report(&nested);

        let titles: Vec<&str> = report.events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, ["a", "b", "c"]);
        assert_eq!(
            report.dropped,
            vec![DroppedRecord {
                index: 2,
                reason: RecordError::MissingTitle,
            }]
        );
    }

    #[test]
    fn non_array_input_yields_nothing() {
        assert!(normalize(&json!({ "Quarter": "2013_Q1", "Label": "x" })).is_empty());
        assert!(normalize(&json!(null)).is_empty());
        assert!(normalize(&json!("events")).is_empty());
    }

    #[test]
    fn dataset_object_values_are_merged() {
        let report = normalize_dataset(&json!({
            "national": [{ "Quarter": "2013_Q1", "Label": "n" }],
            "taipei": [{ "Quarter": "2013_Q1", "TaipeiLabel": "t" }]
        }));
        assert_eq!(report.events.len(), 2);
    }

    #[test]
    fn normalizing_twice_is_identical() {
        let raw = json!([
            { "Quarter": "2013_Q1", "TaipeiLabel": "a", "Category": "交通" },
            { "Quarter": "2014_Q3", "Label": "b" },
            null,
            7
        ]);
        assert_eq!(normalize(&raw), normalize(&raw));
        assert_eq!(normalize(&raw).len(), 2);
    }

    #[test]
    fn events_serialize_with_source_keys() -> Result<(), serde_json::Error> {
        let events = normalize(&json!([{ "Quarter": "2015_Q1", "Label": "央行升息" }]));
        let value = serde_json::to_value(&events)?;
        assert_eq!(value[0]["city"], "oldLabel");
        assert_eq!(value[0]["isNational"], true);
        Ok(())
    }
}
