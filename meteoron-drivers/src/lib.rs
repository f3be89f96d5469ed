//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the sensor boundary
//! for hardware the board-agnostic core never sees directly:
//!
//! - Bit-banged 1-Wire bus over a platform pin trait
//! - DS18x20 temperature probe (the outdoor sensor)
//!
//! The indoor BME280 is driven by an ecosystem crate and composed with
//! these drivers in the firmware.

#![no_std]
#![deny(unsafe_code)]

pub mod sensor;
