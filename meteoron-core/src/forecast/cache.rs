//! Forecast cache
//!
//! Holds the last successfully fetched forecast and the calendar day it is
//! valid for. Overwritten wholesale on the next successful fetch, never
//! merged or mutated in place. The station task is the only owner, so no
//! locking is involved.

use heapless::Vec;

use super::MAX_FORECAST_CODES;
use crate::clock::CalendarDate;

/// One day's forecast: an ordered sequence of WMO weather codes
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ForecastDay {
    /// Calendar day the forecast is valid for
    pub valid_for: CalendarDate,
    /// Weather codes in service order
    pub codes: Vec<u16, MAX_FORECAST_CODES>,
}

/// Cache of the last successful forecast fetch
#[derive(Debug, Default)]
pub struct ForecastCache {
    cached: Option<ForecastDay>,
}

impl ForecastCache {
    pub const fn new() -> Self {
        Self { cached: None }
    }

    /// The cached forecast, fresh or stale
    pub fn get(&self) -> Option<&ForecastDay> {
        self.cached.as_ref()
    }

    /// Replace the cached forecast
    pub fn put(&mut self, day: ForecastDay) {
        self.cached = Some(day);
    }

    /// True iff the cached forecast is valid for the given day
    pub fn is_fresh(&self, today: CalendarDate) -> bool {
        self.cached
            .as_ref()
            .map(|day| day.valid_for == today)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(year: u16, month: u8, d: u8, codes: &[u16]) -> ForecastDay {
        let mut vec = Vec::new();
        for code in codes {
            let _ = vec.push(*code);
        }
        ForecastDay {
            valid_for: CalendarDate {
                year,
                month,
                day: d,
            },
            codes: vec,
        }
    }

    #[test]
    fn test_empty_cache_is_never_fresh() {
        let cache = ForecastCache::new();
        let today = CalendarDate {
            year: 2025,
            month: 2,
            day: 23,
        };
        assert!(cache.get().is_none());
        assert!(!cache.is_fresh(today));
    }

    #[test]
    fn test_fresh_after_put_for_today() {
        let mut cache = ForecastCache::new();
        cache.put(day(2025, 2, 23, &[0, 45]));

        let today = CalendarDate {
            year: 2025,
            month: 2,
            day: 23,
        };
        assert!(cache.is_fresh(today));
    }

    #[test]
    fn test_stale_once_today_advances() {
        let mut cache = ForecastCache::new();
        cache.put(day(2025, 2, 23, &[0]));

        let tomorrow = CalendarDate {
            year: 2025,
            month: 2,
            day: 24,
        };
        assert!(!cache.is_fresh(tomorrow));
        // Stale data stays available until overwritten
        assert_eq!(cache.get().unwrap().valid_for.day, 23);
    }

    #[test]
    fn test_put_overwrites_wholesale() {
        let mut cache = ForecastCache::new();
        cache.put(day(2025, 2, 23, &[0, 45]));
        cache.put(day(2025, 2, 24, &[95]));

        let cached = cache.get().unwrap();
        assert_eq!(cached.valid_for.day, 24);
        assert_eq!(cached.codes.as_slice(), &[95]);
    }
}
