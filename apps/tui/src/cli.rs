use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "realty_timeline",
    version,
    about = "Real-estate market events against quarterly prices, city by city"
)]
pub struct CliArgs {
    /// Print the quarter timeline and exit
    #[arg(long)]
    pub headless: bool,

    /// Print headless output as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override the event dataset path
    #[arg(long, value_name = "PATH")]
    pub events: Option<String>,

    /// Override the price dataset path
    #[arg(long, value_name = "PATH")]
    pub prices: Option<String>,

    /// Focus city (e.g. taipei, newTaipei, 高雄市)
    #[arg(long = "main", value_name = "CITY")]
    pub main_city: Option<String>,

    /// City to compare against, up to three times
    #[arg(long = "compare", value_name = "CITY")]
    pub compare: Vec<String>,

    /// First quarter of the window, e.g. 2013_Q1
    #[arg(long, value_name = "PERIOD")]
    pub start: Option<String>,

    /// Last quarter of the window, e.g. 2025_Q4
    #[arg(long, value_name = "PERIOD")]
    pub end: Option<String>,

    /// Only keep events whose title or category matches
    #[arg(long, value_name = "QUERY")]
    pub search: Option<String>,
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(path) = &self.events {
            std::env::set_var("EVENTS_FILE", path);
        }
        if let Some(path) = &self.prices {
            std::env::set_var("PRICES_FILE", path);
        }
        if let Some(city) = &self.main_city {
            std::env::set_var("MAIN_CITY", city);
        }
        if !self.compare.is_empty() {
            std::env::set_var("COMPARE_CITIES", self.compare.join(","));
        }
        if let Some(period) = &self.start {
            std::env::set_var("START_PERIOD", period);
        }
        if let Some(period) = &self.end {
            std::env::set_var("END_PERIOD", period);
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }
}
