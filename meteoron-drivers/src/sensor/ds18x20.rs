//! DS18x20 temperature probe
//!
//! The outdoor sensor: a single probe on its own 1-Wire bus, addressed
//! with Skip ROM. A measurement is two phases - start the conversion,
//! wait out [`CONVERSION_TIME_MS`], then read the scratchpad back. The
//! wait is the caller's (the firmware awaits it so the executor keeps
//! running); this driver only does bus work.

use embedded_hal::delay::DelayNs;
use meteoron_core::traits::SensorError;

use super::onewire::{BusPin, OneWire};

const CMD_SKIP_ROM: u8 = 0xCC;
const CMD_CONVERT_T: u8 = 0x44;
const CMD_READ_SCRATCHPAD: u8 = 0xBE;

/// Worst-case 12-bit conversion time
pub const CONVERSION_TIME_MS: u32 = 750;

/// DS18x20 driver over a dedicated 1-Wire bus
pub struct Ds18x20<P, D> {
    bus: OneWire<P, D>,
}

impl<P: BusPin, D: DelayNs> Ds18x20<P, D> {
    pub fn new(bus: OneWire<P, D>) -> Self {
        Self { bus }
    }

    /// Kick off a temperature conversion
    pub fn start_conversion(&mut self) -> Result<(), SensorError> {
        self.bus.reset()?;
        self.bus.write_byte(CMD_SKIP_ROM);
        self.bus.write_byte(CMD_CONVERT_T);
        Ok(())
    }

    /// Read back the last conversion in centi-degrees Celsius
    ///
    /// Call at least [`CONVERSION_TIME_MS`] after `start_conversion`.
    pub fn read_centi_celsius(&mut self) -> Result<i32, SensorError> {
        self.bus.reset()?;
        self.bus.write_byte(CMD_SKIP_ROM);
        self.bus.write_byte(CMD_READ_SCRATCHPAD);

        let mut scratchpad = [0u8; 9];
        for byte in scratchpad.iter_mut() {
            *byte = self.bus.read_byte();
        }

        decode_scratchpad(&scratchpad)
    }
}

/// Decode a 9-byte scratchpad: CRC check, then the 1/16-degree raw value
pub fn decode_scratchpad(scratchpad: &[u8; 9]) -> Result<i32, SensorError> {
    if crc8(&scratchpad[..8]) != scratchpad[8] {
        return Err(SensorError::Crc);
    }

    let raw = i16::from_le_bytes([scratchpad[0], scratchpad[1]]);
    Ok(centi_celsius_from_raw(raw))
}

/// Raw 1/16-degree reading to centi-degrees: raw * 100 / 16
fn centi_celsius_from_raw(raw: i16) -> i32 {
    raw as i32 * 25 / 4
}

/// Dallas/Maxim CRC-8 (polynomial 0x31 reflected, init 0)
fn crc8(data: &[u8]) -> u8 {
    let mut crc: u8 = 0;
    for byte in data {
        let mut byte = *byte;
        for _ in 0..8 {
            let mix = (crc ^ byte) & 0x01;
            crc >>= 1;
            if mix != 0 {
                crc ^= 0x8C;
            }
            byte >>= 1;
        }
    }
    crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc8_check_value() {
        // Standard CRC-8/MAXIM check value
        assert_eq!(crc8(b"123456789"), 0xA1);
    }

    #[test]
    fn test_crc8_single_byte() {
        assert_eq!(crc8(&[0x01]), 0x5E);
        assert_eq!(crc8(&[]), 0x00);
    }

    #[test]
    fn test_raw_conversion() {
        // +25.0625 C = 0x0191 at 12-bit resolution
        assert_eq!(centi_celsius_from_raw(0x0191), 2506);
        // -5.5 C = 0xFFA8
        assert_eq!(centi_celsius_from_raw(-88), -550);
        assert_eq!(centi_celsius_from_raw(0), 0);
    }

    fn scratchpad_with_crc(lsb: u8, msb: u8) -> [u8; 9] {
        let mut scratchpad = [lsb, msb, 0x4B, 0x46, 0x7F, 0xFF, 0x0C, 0x10, 0];
        scratchpad[8] = crc8(&scratchpad[..8]);
        scratchpad
    }

    #[test]
    fn test_decode_scratchpad() {
        let scratchpad = scratchpad_with_crc(0x91, 0x01);
        assert_eq!(decode_scratchpad(&scratchpad), Ok(2506));

        // Negative reading: raw = -88 = 0xFFA8
        let scratchpad = scratchpad_with_crc(0xA8, 0xFF);
        assert_eq!(decode_scratchpad(&scratchpad), Ok(-550));
    }

    #[test]
    fn test_decode_rejects_corrupt_crc() {
        let mut scratchpad = scratchpad_with_crc(0x91, 0x01);
        scratchpad[0] ^= 0x40;
        assert_eq!(decode_scratchpad(&scratchpad), Err(SensorError::Crc));
    }
}
