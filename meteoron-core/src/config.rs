//! Station configuration
//!
//! One typed configuration struct with compiled-in defaults. There is no
//! persistent settings store; the only runtime-supplied configuration is
//! the embedded credentials file (see [`crate::credentials`]).

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum length of an IANA timezone name
pub const MAX_TIMEZONE_LEN: usize = 32;

/// Forecast query location
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Location {
    /// Latitude in decimal degrees
    pub latitude: f32,
    /// Longitude in decimal degrees
    pub longitude: f32,
    /// IANA timezone name passed through to the forecast service
    pub timezone: String<MAX_TIMEZONE_LEN>,
}

/// Station configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StationConfig {
    /// Forecast query location
    pub location: Location,
    /// Fixed local-time offset from UTC in seconds
    pub utc_offset_secs: i32,
    /// Minimum spacing between network refresh attempts in seconds
    pub sync_interval_secs: u64,
    /// Number of forecast days requested from the service
    pub forecast_days: u8,
    /// Site correction added to the raw pressure reading before the
    /// hPa -> mmHg conversion (sea-level adjustment for the install site)
    pub pressure_correction_hpa: f32,
}

impl Default for StationConfig {
    fn default() -> Self {
        let mut timezone = String::new();
        let _ = timezone.push_str("Europe/Kyiv");
        Self {
            location: Location {
                latitude: 49.844433,
                longitude: 24.026222,
                timezone,
            },
            utc_offset_secs: 2 * 3600,
            sync_interval_secs: crate::sync::SYNC_INTERVAL_SECS,
            forecast_days: 1,
            pressure_correction_hpa: 47.0,
        }
    }
}
