//! Measurement source boundary

/// Errors that can occur while reading a sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Bus transaction failed (I2C/1-Wire error)
    Bus,
    /// No device answered on the bus
    NoDevice,
    /// Checksum mismatch on the returned data
    Crc,
    /// Reading outside the sensor's plausible range
    OutOfRange,
}

/// The station's fixed set of environment measurements
///
/// Each read is independently fallible; a failure degrades exactly one
/// display slot to the "Error" label and never affects the others.
/// Reads are async because some sensors need a conversion wait (the
/// DS18x20 takes 750 ms per conversion).
#[allow(async_fn_in_trait)]
pub trait EnvironmentSensors {
    /// Outdoor temperature in degrees Celsius
    async fn read_outdoor_temp(&mut self) -> Result<f32, SensorError>;

    /// Indoor temperature in degrees Celsius
    async fn read_indoor_temp(&mut self) -> Result<f32, SensorError>;

    /// Relative humidity in percent
    async fn read_humidity(&mut self) -> Result<f32, SensorError>;

    /// Barometric pressure in hPa, uncorrected
    async fn read_pressure_hpa(&mut self) -> Result<f32, SensorError>;
}
