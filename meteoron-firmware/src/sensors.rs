//! Sensor composition
//!
//! Binds the boundary trait to the board: the DS18x20 outdoor probe on
//! its 1-Wire pin and the BME280 indoor sensor on I2C1. The DS18x20
//! conversion wait is awaited here so the executor keeps the radio and
//! network stack running underneath it.

use bme280_rs::{Bme280, Configuration, Oversampling, Sample, SensorMode};
use defmt::warn;
use embassy_rp::gpio::{Flex, Pull};
use embassy_time::{Delay, Timer};
use embedded_hal::i2c::I2c;

use meteoron_core::traits::{EnvironmentSensors, SensorError};
use meteoron_drivers::sensor::{BusPin, Ds18x20, OneWire, CONVERSION_TIME_MS};

/// The 1-Wire data pin, driven open-drain style with the RP2040's
/// input/output direction switch and internal pull-up
pub struct OneWirePin<'d> {
    pin: Flex<'d>,
}

impl<'d> OneWirePin<'d> {
    pub fn new(mut pin: Flex<'d>) -> Self {
        pin.set_pull(Pull::Up);
        // Latch the output register low once; direction does the rest
        pin.set_low();
        pin.set_as_input();
        Self { pin }
    }
}

impl BusPin for OneWirePin<'_> {
    fn drive_low(&mut self) {
        self.pin.set_as_output();
    }

    fn release(&mut self) {
        self.pin.set_as_input();
    }

    fn is_high(&mut self) -> bool {
        self.pin.is_high()
    }
}

/// The station's composed sensor set
pub struct StationSensors<'d, I2C> {
    outdoor: Ds18x20<OneWirePin<'d>, Delay>,
    indoor: Bme280<I2C, Delay>,
}

impl<'d, I2C: I2c> StationSensors<'d, I2C> {
    /// Build the sensor set. BME280 init failure is not fatal: the
    /// affected slots degrade to the "Error" label and the bus is retried
    /// on every read.
    pub fn new(onewire_pin: Flex<'d>, i2c: I2C) -> Self {
        let bus = OneWire::new(OneWirePin::new(onewire_pin), Delay);

        let mut indoor = Bme280::new(i2c, Delay);
        let sampling = Configuration::default()
            .with_temperature_oversampling(Oversampling::Oversample1)
            .with_pressure_oversampling(Oversampling::Oversample1)
            .with_humidity_oversampling(Oversampling::Oversample1)
            .with_sensor_mode(SensorMode::Normal);

        match indoor.init().and_then(|_| indoor.set_sampling_configuration(sampling)) {
            Ok(()) => {}
            Err(_) => warn!("BME280 init failed, indoor readings will error"),
        }

        Self {
            outdoor: Ds18x20::new(bus),
            indoor,
        }
    }

    fn sample(&mut self) -> Result<Sample, SensorError> {
        self.indoor.read_sample().map_err(|_| SensorError::Bus)
    }
}

impl<I2C: I2c> EnvironmentSensors for StationSensors<'_, I2C> {
    async fn read_outdoor_temp(&mut self) -> Result<f32, SensorError> {
        self.outdoor.start_conversion()?;
        Timer::after_millis(CONVERSION_TIME_MS as u64).await;
        let centi = self.outdoor.read_centi_celsius()?;
        Ok(centi as f32 / 100.0)
    }

    async fn read_indoor_temp(&mut self) -> Result<f32, SensorError> {
        self.sample()?.temperature.ok_or(SensorError::OutOfRange)
    }

    async fn read_humidity(&mut self) -> Result<f32, SensorError> {
        self.sample()?.humidity.ok_or(SensorError::OutOfRange)
    }

    async fn read_pressure_hpa(&mut self) -> Result<f32, SensorError> {
        self.sample()?
            .pressure
            .map(|pa| pa / 100.0)
            .ok_or(SensorError::OutOfRange)
    }
}
