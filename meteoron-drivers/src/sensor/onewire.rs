//! Bit-banged 1-Wire bus
//!
//! Standard-speed 1-Wire master over a single open-drain wired pin with a
//! pull-up. Bit timing uses a blocking microsecond delay; the long
//! conversion waits of individual devices are handled by their drivers,
//! not here.

use embedded_hal::delay::DelayNs;
use meteoron_core::traits::SensorError;

/// Platform abstraction for the 1-Wire data pin
///
/// The pin is wired open-drain: driving low pulls the bus down,
/// releasing lets the pull-up raise it.
pub trait BusPin {
    /// Actively pull the bus low
    fn drive_low(&mut self);

    /// Release the bus to the pull-up
    fn release(&mut self);

    /// Sample the bus level
    fn is_high(&mut self) -> bool;
}

/// 1-Wire bus master
pub struct OneWire<P, D> {
    pin: P,
    delay: D,
}

impl<P: BusPin, D: DelayNs> OneWire<P, D> {
    pub fn new(pin: P, delay: D) -> Self {
        Self { pin, delay }
    }

    /// Reset the bus and check for a presence pulse
    ///
    /// Returns [`SensorError::NoDevice`] when nothing answers.
    pub fn reset(&mut self) -> Result<(), SensorError> {
        self.pin.drive_low();
        self.delay.delay_us(480);
        self.pin.release();
        self.delay.delay_us(70);

        // A present device holds the bus low during the presence window
        let present = !self.pin.is_high();
        self.delay.delay_us(410);

        if present {
            Ok(())
        } else {
            Err(SensorError::NoDevice)
        }
    }

    /// Write one byte, LSB first
    pub fn write_byte(&mut self, byte: u8) {
        for bit in 0..8 {
            self.write_bit(byte & (1 << bit) != 0);
        }
    }

    /// Read one byte, LSB first
    pub fn read_byte(&mut self) -> u8 {
        let mut byte = 0;
        for bit in 0..8 {
            if self.read_bit() {
                byte |= 1 << bit;
            }
        }
        byte
    }

    fn write_bit(&mut self, bit: bool) {
        if bit {
            // Write-1: short low pulse, then let the pull-up hold the slot
            self.pin.drive_low();
            self.delay.delay_us(6);
            self.pin.release();
            self.delay.delay_us(64);
        } else {
            // Write-0: hold low for the whole slot
            self.pin.drive_low();
            self.delay.delay_us(60);
            self.pin.release();
            self.delay.delay_us(10);
        }
    }

    fn read_bit(&mut self) -> bool {
        self.pin.drive_low();
        self.delay.delay_us(6);
        self.pin.release();
        self.delay.delay_us(9);

        // Sample inside the master read window
        let bit = self.pin.is_high();
        self.delay.delay_us(55);
        bit
    }
}
