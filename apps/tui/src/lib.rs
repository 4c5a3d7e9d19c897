// Export our modules for use in binaries and tests
pub mod config;
pub mod dataset;
pub mod domain;
pub mod events;
pub mod grouping;
pub mod period;
pub mod prices;
pub mod selection;
pub mod view;

pub use domain::{CityId, EventCity};
pub use events::{normalize, NormalizedEvent};
pub use grouping::{group_by_quarter, QuarterBucket};
pub use period::{Period, PeriodError};
pub use selection::CitySelection;
