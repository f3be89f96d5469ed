//! Display boundary

use crate::frame::Frame;

/// Errors that can occur pushing a frame to the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderError {
    /// Display bus transaction failed
    Bus,
    /// A bitmap asset was missing or corrupt
    Asset,
}

/// Something that can show a [`Frame`] on the fixed 128x64 panel
pub trait Renderer {
    fn show(&mut self, frame: &Frame) -> Result<(), RenderError>;
}
