use crate::events::{normalize_dataset, NormalizeReport};
use crate::prices::PriceRecord;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Everything the dashboard renders from.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub events: NormalizeReport,
    pub prices: Vec<PriceRecord>,
}

/// Reads and normalizes the event asset. Bad records are dropped and listed
/// in the returned report.
pub fn load_events(path: impl AsRef<Path>) -> Result<NormalizeReport, DatasetError> {
    let raw: Value = read_json(path.as_ref())?;
    let report = normalize_dataset(&raw);
    tracing::info!(
        path = %path.as_ref().display(),
        events = report.events.len(),
        dropped = report.dropped.len(),
        ambiguous = report.ambiguous.len(),
        "loaded event dataset"
    );
    Ok(report)
}

pub fn load_prices(path: impl AsRef<Path>) -> Result<Vec<PriceRecord>, DatasetError> {
    let records: Vec<PriceRecord> = read_json(path.as_ref())?;
    tracing::info!(path = %path.as_ref().display(), quarters = records.len(), "loaded price dataset");
    Ok(records)
}

/// Loads both assets. A missing or broken price file only costs the chart.
pub fn load_dataset(events: &Path, prices: &Path) -> Result<Dataset, DatasetError> {
    let events = load_events(events)?;
    let prices = load_prices(prices).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "continuing without price data");
        Vec::new()
    });
    Ok(Dataset { events, prices })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, DatasetError> {
    let contents = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| DatasetError::Json {
        path: path.to_path_buf(),
        source,
    })
}
