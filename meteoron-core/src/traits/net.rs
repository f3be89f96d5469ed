//! Network boundaries: connectivity, forecast service, network time

use heapless::Vec;

use crate::config::Location;
use crate::forecast::MAX_FORECAST_CODES;

/// Errors that can occur talking to a network service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NetworkError {
    /// Name resolution failed
    Dns,
    /// TCP/UDP connection could not be established
    Connect,
    /// The request timed out
    Timeout,
    /// The response was missing or malformed
    Protocol,
}

/// Result of one connectivity establishment attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionOutcome {
    /// Link is up with the given IPv4 address
    Connected([u8; 4]),
    /// No usable credentials; the attempt was not made
    NoCredentials,
    /// The join retry budget was exhausted
    TimedOut,
}

/// Wireless link establishment
///
/// The bounded join retry (31 attempts, fixed backoff, status-LED flash
/// per attempt) lives behind this boundary; the orchestration only sees
/// the tri-state outcome.
#[allow(async_fn_in_trait)]
pub trait Connectivity {
    async fn establish(&mut self) -> ConnectionOutcome;
}

/// Remote forecast service
#[allow(async_fn_in_trait)]
pub trait ForecastSource {
    /// Fetch the daily weather-code sequence for the given location.
    ///
    /// An empty, absent or unparseable `daily.weather_code` list is a
    /// [`NetworkError::Protocol`] failure, not an empty success.
    async fn fetch(
        &mut self,
        location: &Location,
        forecast_days: u8,
    ) -> Result<Vec<u16, MAX_FORECAST_CODES>, NetworkError>;
}

/// Network time service
#[allow(async_fn_in_trait)]
pub trait TimeSource {
    /// Current UTC time as Unix seconds
    async fn now_utc(&mut self) -> Result<i64, NetworkError>;
}
