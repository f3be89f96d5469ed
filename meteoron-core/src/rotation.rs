//! Display rotation state machine
//!
//! The rotation is an explicit enumerated state with a pure transition
//! function; dwell durations are policy attached to each slot, not sleeps
//! buried in the sequencing. This keeps the cycle order unit-testable
//! without real time.
//!
//! Fixed cyclic order per outer iteration:
//!
//! ```text
//! OutdoorTemp -> IndoorTemp -> Humidity -> Pressure
//!     -> [SyncCheck]            (only when a refresh attempt is due)
//!     -> [Forecast 0..n]        (only when the cache is fresh)
//!     -> Clock -> (cycle ends)
//! ```

/// Hold time for each measurement frame
pub const MEASUREMENT_DWELL_SECS: u32 = 10;
/// Hold time for each forecast frame
pub const FORECAST_DWELL_SECS: u32 = 5;
/// The clock's own refresh cadence; ends the cycle
pub const CLOCK_DWELL_SECS: u32 = 60;
/// One-time splash hold before the rotation starts
pub const SPLASH_DWELL_SECS: u32 = 15;
/// Transient hold for the "connected" indicator during sync
pub const CONNECTED_DWELL_SECS: u32 = 3;
/// Transient hold for the "disconnected" indicator during sync
pub const DISCONNECTED_DWELL_SECS: u32 = 10;
/// Back-off after a cycle that rendered nothing (wedged display bus)
pub const CYCLE_RETRY_BACKOFF_SECS: u32 = 5;

/// Per-cycle conditions the transition function consults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CycleInputs {
    /// A network refresh attempt is due
    pub sync_due: bool,
    /// The forecast cache is valid for today
    pub forecast_fresh: bool,
    /// Number of cached codes that map to an icon
    pub forecast_frames: u8,
}

/// One display slot in the rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Slot {
    OutdoorTemp,
    IndoorTemp,
    Humidity,
    Pressure,
    /// Network refresh protocol; renders only transient status indicators
    SyncCheck,
    /// One frame of the forecast sub-sequence
    Forecast { index: u8 },
    Clock,
}

impl Slot {
    /// The slot every cycle starts with
    pub const fn first() -> Self {
        Slot::OutdoorTemp
    }

    /// Advance to the next slot; `None` ends the cycle
    pub fn next(self, inputs: &CycleInputs) -> Option<Slot> {
        use Slot::*;

        match self {
            OutdoorTemp => Some(IndoorTemp),
            IndoorTemp => Some(Humidity),
            Humidity => Some(Pressure),
            Pressure => {
                if inputs.sync_due {
                    Some(SyncCheck)
                } else {
                    Some(Self::forecast_or_clock(inputs))
                }
            }
            SyncCheck => Some(Self::forecast_or_clock(inputs)),
            Forecast { index } => {
                let next = index + 1;
                if next < inputs.forecast_frames {
                    Some(Forecast { index: next })
                } else {
                    Some(Clock)
                }
            }
            Clock => None,
        }
    }

    fn forecast_or_clock(inputs: &CycleInputs) -> Slot {
        if inputs.forecast_fresh && inputs.forecast_frames > 0 {
            Slot::Forecast { index: 0 }
        } else {
            Slot::Clock
        }
    }

    /// How long the slot's frame stays on screen
    ///
    /// `SyncCheck` holds nothing itself; its transient indicators carry
    /// their own dwells inside the refresh protocol.
    pub fn dwell_secs(&self) -> u32 {
        match self {
            Slot::OutdoorTemp | Slot::IndoorTemp | Slot::Humidity | Slot::Pressure => {
                MEASUREMENT_DWELL_SECS
            }
            Slot::SyncCheck => 0,
            Slot::Forecast { .. } => FORECAST_DWELL_SECS,
            Slot::Clock => CLOCK_DWELL_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::Vec;

    fn walk(inputs: CycleInputs) -> Vec<Slot, 16> {
        let mut slots = Vec::new();
        let mut slot = Some(Slot::first());
        while let Some(current) = slot {
            let _ = slots.push(current);
            slot = current.next(&inputs);
        }
        slots
    }

    #[test]
    fn test_plain_cycle_order() {
        let slots = walk(CycleInputs::default());
        assert_eq!(
            slots.as_slice(),
            &[
                Slot::OutdoorTemp,
                Slot::IndoorTemp,
                Slot::Humidity,
                Slot::Pressure,
                Slot::Clock,
            ]
        );
    }

    #[test]
    fn test_sync_check_entered_only_when_due() {
        let slots = walk(CycleInputs {
            sync_due: true,
            ..Default::default()
        });
        assert_eq!(
            slots.as_slice(),
            &[
                Slot::OutdoorTemp,
                Slot::IndoorTemp,
                Slot::Humidity,
                Slot::Pressure,
                Slot::SyncCheck,
                Slot::Clock,
            ]
        );
    }

    #[test]
    fn test_forecast_subsequence_when_fresh() {
        let slots = walk(CycleInputs {
            sync_due: false,
            forecast_fresh: true,
            forecast_frames: 2,
        });
        assert_eq!(
            slots.as_slice(),
            &[
                Slot::OutdoorTemp,
                Slot::IndoorTemp,
                Slot::Humidity,
                Slot::Pressure,
                Slot::Forecast { index: 0 },
                Slot::Forecast { index: 1 },
                Slot::Clock,
            ]
        );
    }

    #[test]
    fn test_fresh_but_all_codes_unmapped_skips_forecast() {
        // Fresh cache whose codes all failed to map: no forecast frames
        let slots = walk(CycleInputs {
            sync_due: false,
            forecast_fresh: true,
            forecast_frames: 0,
        });
        assert!(!slots.iter().any(|s| matches!(s, Slot::Forecast { .. })));
    }

    #[test]
    fn test_sync_then_forecast_in_one_cycle() {
        let slots = walk(CycleInputs {
            sync_due: true,
            forecast_fresh: true,
            forecast_frames: 1,
        });
        assert_eq!(
            slots.as_slice(),
            &[
                Slot::OutdoorTemp,
                Slot::IndoorTemp,
                Slot::Humidity,
                Slot::Pressure,
                Slot::SyncCheck,
                Slot::Forecast { index: 0 },
                Slot::Clock,
            ]
        );
    }

    #[test]
    fn test_dwell_policy() {
        assert_eq!(Slot::OutdoorTemp.dwell_secs(), 10);
        assert_eq!(Slot::Pressure.dwell_secs(), 10);
        assert_eq!(Slot::Forecast { index: 0 }.dwell_secs(), 5);
        assert_eq!(Slot::SyncCheck.dwell_secs(), 0);
        assert_eq!(Slot::Clock.dwell_secs(), 60);
    }
}
