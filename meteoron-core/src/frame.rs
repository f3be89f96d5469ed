//! Display frames
//!
//! A [`Frame`] is the complete description of one screen the renderer can
//! show. The core never touches pixels; it only selects frames and hands
//! them to the [`Renderer`](crate::traits::Renderer) boundary.

use heapless::String;

/// Maximum length of a rendered value label ("1084mm", "Error", ...)
pub const MAX_LABEL_LEN: usize = 12;

/// A rendered value label
pub type Label = String<MAX_LABEL_LEN>;

/// Icon identifiers the renderer knows how to draw
///
/// Each maps to one embedded bitmap asset on the firmware side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Icon {
    // Measurement icons (25x25)
    OutdoorTemp,
    IndoorTemp,
    Humidity,
    Pressure,
    // Weather forecast icons (55x55)
    Sun,
    Clouds,
    Overcast,
    Fog,
    Drizzle,
    Rain,
    Snow,
    ShowersViolent,
    // Status bitmaps (63x63)
    WifiConnected,
    WifiDisconnected,
    ForecastBanner,
}

/// One screen of output
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Frame {
    /// Startup logo, shown once before the rotation begins
    Splash,
    /// Measurement slot: icon plus a value label (or the "Error" label)
    Reading { icon: Icon, label: Label },
    /// Bare status bitmap (Wi-Fi indicators, forecast banner)
    Status(Icon),
    /// One forecast frame: weather icon plus the fixed forecast caption
    Forecast { icon: Icon },
    /// Clock slot, rendered as HH:MM
    Clock { hour: u8, minute: u8 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_capacity_fits_widest_values() {
        // Widest realistic outputs must fit the label type
        for s in ["-40C", "100%", "1084mm", "Error"] {
            let label: Label = Label::try_from(s).unwrap();
            assert_eq!(label.as_str(), s);
        }
    }
}
