//! Sensor drivers

pub mod ds18x20;
pub mod onewire;

pub use ds18x20::{Ds18x20, CONVERSION_TIME_MS};
pub use onewire::{BusPin, OneWire};
