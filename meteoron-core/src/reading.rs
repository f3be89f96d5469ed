//! Measurement readings and unit conversion
//!
//! Each rotation slot produces one [`Reading`]: the sensor value is read
//! once, converted and rounded here, and carried to the renderer as a
//! ready-made label. A failed read becomes `value: None` and renders as
//! the literal "Error" label instead of a number.

use core::fmt::Write;

use crate::frame::{Frame, Icon, Label};
use crate::traits::SensorError;

/// hPa to mmHg conversion factor
pub const MMHG_PER_HPA: f32 = 0.7500616827;

/// Label shown in place of a value when the read failed
pub const ERROR_LABEL: &str = "Error";

/// The four measurement kinds in rotation order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Quantity {
    OutdoorTemp,
    IndoorTemp,
    Humidity,
    Pressure,
}

impl Quantity {
    /// Display icon for this measurement
    pub fn icon(&self) -> Icon {
        match self {
            Quantity::OutdoorTemp => Icon::OutdoorTemp,
            Quantity::IndoorTemp => Icon::IndoorTemp,
            Quantity::Humidity => Icon::Humidity,
            Quantity::Pressure => Icon::Pressure,
        }
    }

    /// Unit suffix appended directly to the value
    pub fn unit(&self) -> &'static str {
        match self {
            Quantity::OutdoorTemp | Quantity::IndoorTemp => "C",
            Quantity::Humidity => "%",
            Quantity::Pressure => "mm",
        }
    }
}

/// One measurement, produced fresh each cycle and never persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Reading {
    pub quantity: Quantity,
    /// Rounded display value; `None` means the read failed
    pub value: Option<i32>,
    pub unit: &'static str,
}

/// Round to the nearest integer, halves away from zero
fn round_to_nearest(x: f32) -> i32 {
    if x >= 0.0 {
        (x + 0.5) as i32
    } else {
        (x - 0.5) as i32
    }
}

/// Convert a raw hPa reading to whole mmHg
///
/// The site correction is applied first, the corrected value rounded to
/// whole hPa, then scaled and rounded to the nearest millimeter. Standard
/// pressure (1013.25 hPa, no correction) lands on exactly 760 mm.
pub fn hpa_to_mmhg(hpa: f32, correction_hpa: f32) -> i32 {
    let corrected = round_to_nearest(hpa + correction_hpa);
    round_to_nearest(corrected as f32 * MMHG_PER_HPA)
}

impl Reading {
    /// Temperature reading in whole degrees Celsius
    pub fn from_celsius(quantity: Quantity, sample: Result<f32, SensorError>) -> Self {
        Self::from_sample(quantity, sample.map(round_to_nearest))
    }

    /// Humidity reading in whole percent
    pub fn from_humidity(sample: Result<f32, SensorError>) -> Self {
        Self::from_sample(Quantity::Humidity, sample.map(round_to_nearest))
    }

    /// Pressure reading in whole mmHg, site-corrected
    pub fn from_pressure(sample: Result<f32, SensorError>, correction_hpa: f32) -> Self {
        Self::from_sample(
            Quantity::Pressure,
            sample.map(|hpa| hpa_to_mmhg(hpa, correction_hpa)),
        )
    }

    fn from_sample(quantity: Quantity, sample: Result<i32, SensorError>) -> Self {
        let value = match sample {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("{} read failed: {}", quantity, err);
                None
            }
        };
        Self {
            quantity,
            value,
            unit: quantity.unit(),
        }
    }

    /// Display label: value plus unit suffix, or the "Error" label
    pub fn label(&self) -> Label {
        let mut label = Label::new();
        match self.value {
            Some(value) => {
                // The widest value/unit combination fits MAX_LABEL_LEN
                let _ = write!(label, "{}{}", value, self.unit);
            }
            None => {
                let _ = label.push_str(ERROR_LABEL);
            }
        }
        label
    }

    /// The frame this reading renders as
    pub fn frame(&self) -> Frame {
        Frame::Reading {
            icon: self.quantity.icon(),
            label: self.label(),
        }
    }
}
