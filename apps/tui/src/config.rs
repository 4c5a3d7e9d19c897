use crate::domain::CityId;
use crate::period::{Period, CATALOG_END, CATALOG_START};
use crate::selection::{CitySelection, SelectionError};
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var}: {source}")]
    Period {
        var: &'static str,
        #[source]
        source: crate::period::PeriodError,
    },
    #[error("selection: {0}")]
    Selection(#[from] SelectionError),
}

/// Runtime settings, resolved from `.env` and the process environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub events_path: PathBuf,
    pub prices_path: PathBuf,
    pub selection: CitySelection,
    pub start: Period,
    pub end: Period,
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            events_path: PathBuf::from("./data/events.json"),
            prices_path: PathBuf::from("./data/prices.json"),
            selection: CitySelection::default(),
            start: CATALOG_START,
            end: CATALOG_END,
            debug: false,
        }
    }
}

/// Initializes the application configuration
pub fn init_app_config() -> Result<AppConfig, ConfigError> {
    // Load environment variables from .env file
    dotenv().ok();
    from_lookup(|key| env::var(key).ok())
}

/// Builds the configuration from any key lookup, so tests need not touch the
/// process environment.
pub fn from_lookup<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = AppConfig::default();
    let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    let events_path = non_empty("EVENTS_FILE").map_or(defaults.events_path, PathBuf::from);
    let prices_path = non_empty("PRICES_FILE").map_or(defaults.prices_path, PathBuf::from);

    let main = non_empty("MAIN_CITY").unwrap_or_else(|| CityId::Taipei.as_str().to_string());
    let compare: Vec<String> = non_empty("COMPARE_CITIES")
        .map(|list| {
            list.split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    let selection = CitySelection::from_ids(&main, &compare)?;

    let start = period_var(&non_empty, "START_PERIOD", defaults.start)?;
    let end = period_var(&non_empty, "END_PERIOD", defaults.end)?;

    let debug = non_empty("DEBUG").is_some_and(|value| value != "0" && value != "false");

    Ok(AppConfig {
        events_path,
        prices_path,
        selection,
        start,
        end,
        debug,
    })
}

fn period_var<F>(lookup: &F, var: &'static str, fallback: Period) -> Result<Period, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(var).map_or(Ok(fallback), |raw| {
        Period::parse(raw.trim()).map_err(|source| ConfigError::Period { var, source })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_cover_full_catalog() -> Result<(), ConfigError> {
        let config = config_from(&[])?;
        assert_eq!(config.start, CATALOG_START);
        assert_eq!(config.end, CATALOG_END);
        assert_eq!(config.selection.order(), vec![CityId::Taipei]);
        assert_eq!(config.events_path, PathBuf::from("./data/events.json"));
        assert!(!config.debug);
        Ok(())
    }

    #[test]
    fn env_values_override_defaults() -> Result<(), ConfigError> {
        let config = config_from(&[
            ("EVENTS_FILE", "/tmp/e.json"),
            ("MAIN_CITY", "kaohsiung"),
            ("COMPARE_CITIES", "tainan, taichung"),
            ("START_PERIOD", "2018_Q1"),
            ("END_PERIOD", "2020_Q4"),
            ("DEBUG", "1"),
        ])?;
        assert_eq!(config.events_path, PathBuf::from("/tmp/e.json"));
        assert_eq!(
            config.selection.order(),
            vec![CityId::Kaohsiung, CityId::Tainan, CityId::Taichung]
        );
        assert_eq!(config.start, Period { year: 2018, quarter: 1 });
        assert_eq!(config.end, Period { year: 2020, quarter: 4 });
        assert!(config.debug);
        Ok(())
    }

    #[test]
    fn bad_period_names_the_variable() {
        let err = config_from(&[("START_PERIOD", "2018-Q1")]).err();
        assert!(matches!(err, Some(ConfigError::Period { var: "START_PERIOD", .. })));
    }
}
