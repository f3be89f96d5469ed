//! SSD1306 frame renderer
//!
//! Maps each core [`Frame`] to the panel layout: measurement icons sit
//! high-center with the value below, weather icons carry the forecast
//! caption, status bitmaps and the splash are centered. A missing icon
//! asset degrades a measurement frame to its label; for frames that are
//! nothing but a bitmap it is a render error.

use core::fmt::Write as _;

use defmt::warn;
use embedded_graphics::image::{Image, ImageRaw};
use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};
use embedded_hal::i2c::I2c;
use heapless::String;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306};

use meteoron_core::assets::Bitmap;
use meteoron_core::frame::Frame;
use meteoron_core::traits::{RenderError, Renderer};

use crate::assets;

const WIDTH: i32 = 128;
const HEIGHT: i32 = 64;

/// Caption drawn next to the forecast icon ("tomorrow")
const FORECAST_CAPTION: &str = "3ABTPA";

/// Vertical offset of the 25x25 measurement icons
const READING_ICON_Y: i32 = 2;
/// Baseline-top of the measurement value text
const READING_TEXT_Y: i32 = 36;
/// Baseline-top of the clock digits
const CLOCK_TEXT_Y: i32 = 22;

type Oled<I2C> =
    Ssd1306<I2CInterface<I2C>, DisplaySize128x64, BufferedGraphicsMode<DisplaySize128x64>>;

/// The station's 128x64 OLED
pub struct OledRenderer<I2C> {
    display: Oled<I2C>,
}

impl<I2C: I2c> OledRenderer<I2C> {
    pub fn new(i2c: I2C) -> Self {
        let interface = I2CDisplayInterface::new(i2c);
        let display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        Self { display }
    }

    /// Bring the panel up; frames are retried every slot, so a failure
    /// here is logged by the caller rather than fatal
    pub fn init(&mut self) -> Result<(), RenderError> {
        self.display.init().map_err(|_| RenderError::Bus)
    }

    fn blit(&mut self, bitmap: Bitmap<'_>, top_left: Point) -> Result<(), RenderError> {
        let raw = ImageRaw::<BinaryColor>::new(bitmap.data, bitmap.width);
        Image::new(&raw, top_left)
            .draw(&mut self.display)
            .map_err(|_| RenderError::Bus)
    }

    fn blit_centered(&mut self, bitmap: Bitmap<'_>) -> Result<(), RenderError> {
        let top_left = Point::new(
            (WIDTH - bitmap.width as i32) / 2,
            (HEIGHT - bitmap.height as i32) / 2,
        );
        self.blit(bitmap, top_left)
    }

    fn text(&mut self, text: &str, font: &MonoFont<'_>, top_left: Point) -> Result<(), RenderError> {
        let style = MonoTextStyle::new(font, BinaryColor::On);
        Text::with_baseline(text, top_left, style, Baseline::Top)
            .draw(&mut self.display)
            .map(|_| ())
            .map_err(|_| RenderError::Bus)
    }

    fn text_centered(&mut self, text: &str, font: &MonoFont<'_>, y: i32) -> Result<(), RenderError> {
        let text_width = text.len() as i32 * font.character_size.width as i32;
        self.text(text, font, Point::new((WIDTH - text_width) / 2, y))
    }
}

impl<I2C: I2c> Renderer for OledRenderer<I2C> {
    fn show(&mut self, frame: &Frame) -> Result<(), RenderError> {
        self.display.clear_buffer();

        match frame {
            Frame::Splash => {
                let bitmap = assets::logo().map_err(|_| RenderError::Asset)?;
                self.blit_centered(bitmap)?;
            }
            Frame::Reading { icon, label } => {
                // The value is the point of the frame; a lost icon asset
                // only costs the picture
                match assets::icon(*icon) {
                    Ok(bitmap) => {
                        let x = (WIDTH - bitmap.width as i32) / 2;
                        self.blit(bitmap, Point::new(x, READING_ICON_Y))?;
                    }
                    Err(err) => warn!("icon asset unavailable: {}", err),
                }
                self.text_centered(label.as_str(), &FONT_10X20, READING_TEXT_Y)?;
            }
            Frame::Status(icon) => {
                let bitmap = assets::icon(*icon).map_err(|_| RenderError::Asset)?;
                self.blit_centered(bitmap)?;
            }
            Frame::Forecast { icon } => {
                self.text(FORECAST_CAPTION, &FONT_6X10, Point::new(1, 39))?;
                let bitmap = assets::icon(*icon).map_err(|_| RenderError::Asset)?;
                let top_left = Point::new((WIDTH - bitmap.width as i32) / 2, 12);
                self.blit(bitmap, top_left)?;
            }
            Frame::Clock { hour, minute } => {
                let mut digits: String<8> = String::new();
                let _ = write!(digits, "{:02}:{:02}", hour, minute);
                self.text_centered(digits.as_str(), &FONT_10X20, CLOCK_TEXT_Y)?;
            }
        }

        self.display.flush().map_err(|_| RenderError::Bus)
    }
}
