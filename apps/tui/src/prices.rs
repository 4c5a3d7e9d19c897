//! Quarterly median price / index series per city.

use crate::domain::CityId;
use crate::period::{quarter_value, Period};
use serde::{Deserialize, Serialize};

/// Price values are stored in NT$; the chart shows 萬 (10 000).
pub const PRICE_DIVISOR: f64 = 10_000.0;

/// Quarters plotted before and after an event in its detail view, counted in
/// ordinal steps.
pub const IMPACT_BEFORE: i64 = 6;
pub const IMPACT_AFTER: i64 = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct AreaValue {
    #[serde(default)]
    pub all: Option<f64>,
}

/// One quarter of the price (or index) dataset.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PriceRecord {
    pub quarter: String,
    #[serde(default)]
    pub nation: Option<AreaValue>,
    #[serde(default)]
    pub taipei: Option<AreaValue>,
    #[serde(default)]
    pub new_taipei: Option<AreaValue>,
    #[serde(default)]
    pub taoyuan: Option<AreaValue>,
    #[serde(default)]
    pub hsinchu: Option<AreaValue>,
    #[serde(default)]
    pub taichung: Option<AreaValue>,
    #[serde(default)]
    pub tainan: Option<AreaValue>,
    #[serde(default)]
    pub kaohsiung: Option<AreaValue>,
}

impl PriceRecord {
    pub fn area(&self, area: Area) -> Option<AreaValue> {
        match area {
            Area::Nation => self.nation,
            Area::City(CityId::Taipei) => self.taipei,
            Area::City(CityId::NewTaipei) => self.new_taipei,
            Area::City(CityId::Taoyuan) => self.taoyuan,
            Area::City(CityId::Hsinchu) => self.hsinchu,
            Area::City(CityId::Taichung) => self.taichung,
            Area::City(CityId::Tainan) => self.tainan,
            Area::City(CityId::Kaohsiung) => self.kaohsiung,
        }
    }

    /// Value for `area` converted for `mode`, `0.0` when absent or zero.
    pub fn value(&self, area: Area, mode: PriceMode) -> f64 {
        match self.area(area).and_then(|value| value.all) {
            Some(raw) if raw != 0.0 => mode.convert(raw),
            _ => 0.0,
        }
    }

    pub fn ordinal(&self) -> i64 {
        quarter_value(&self.quarter)
    }
}

/// Series the chart can plot: the national aggregate or one city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Area {
    Nation,
    City(CityId),
}

impl Area {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Nation => "全國",
            Self::City(city) => city.label(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriceMode {
    #[default]
    Price,
    Index,
}

impl PriceMode {
    pub fn convert(self, raw: f64) -> f64 {
        match self {
            Self::Price => raw / PRICE_DIVISOR,
            Self::Index => raw,
        }
    }

    pub const fn unit(self) -> &'static str {
        match self {
            Self::Price => "萬",
            Self::Index => "",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Price => "Median price",
            Self::Index => "Price index",
        }
    }

    pub const fn toggle(self) -> Self {
        match self {
            Self::Price => Self::Index,
            Self::Index => Self::Price,
        }
    }
}

/// A chart row: every area's value for one quarter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricePoint {
    pub quarter: String,
    pub nation: f64,
    pub cities: Vec<(CityId, f64)>,
}

impl PricePoint {
    pub fn city(&self, city: CityId) -> f64 {
        self.cities
            .iter()
            .find(|(id, _)| *id == city)
            .map_or(0.0, |(_, value)| *value)
    }

    pub fn area(&self, area: Area) -> f64 {
        match area {
            Area::Nation => self.nation,
            Area::City(city) => self.city(city),
        }
    }
}

/// Rows for every record inside `[start, end]`, in dataset order.
pub fn price_points(
    records: &[PriceRecord],
    mode: PriceMode,
    start: Period,
    end: Period,
) -> Vec<PricePoint> {
    let window = start.ordinal()..=end.ordinal();

    records
        .iter()
        .filter(|record| window.contains(&record.ordinal()))
        .map(|record| PricePoint {
            quarter: record.quarter.replacen('_', " ", 1),
            nation: record.value(Area::Nation, mode),
            cities: CityId::ALL
                .into_iter()
                .map(|city| (city, record.value(Area::City(city), mode)))
                .collect(),
        })
        .collect()
}

/// `(x, y)` pairs for one area, `x` being the row index. Ready for a chart
/// dataset.
#[allow(clippy::cast_precision_loss)]
pub fn series(points: &[PricePoint], area: Area) -> Vec<(f64, f64)> {
    points
        .iter()
        .enumerate()
        .map(|(index, point)| (index as f64, point.area(area)))
        .collect()
}

/// Price series for `area` around an event, matching quarters whose ordinal
/// lies in `[event - IMPACT_BEFORE, event + IMPACT_AFTER]`.
pub fn impact_window(records: &[PriceRecord], area: Area, event: Period) -> Vec<(String, f64)> {
    let center = event.ordinal();
    let window = (center - IMPACT_BEFORE)..=(center + IMPACT_AFTER);

    records
        .iter()
        .filter(|record| window.contains(&record.ordinal()))
        .map(|record| {
            (
                record.quarter.replacen('_', " ", 1),
                record.value(area, PriceMode::Price),
            )
        })
        .collect()
}
