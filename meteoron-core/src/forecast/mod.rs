//! Forecast data: weather-code table and the forecast cache
//!
//! One [`ForecastDay`] at a time, owned by the cache, stamped with the
//! calendar day it is valid for. Stale data is displayed until overwritten,
//! never silently dropped.

pub mod cache;
pub mod codes;

pub use cache::{ForecastCache, ForecastDay};
pub use codes::icon_for_code;

/// Maximum number of weather codes kept from one forecast response
pub const MAX_FORECAST_CODES: usize = 8;
