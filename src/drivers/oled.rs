//! SSD1306 128×64 OLED status display.
//!
//! [`render_frame`] draws a [`DisplayFrame`] onto any monochrome
//! `embedded-graphics` target, one 6×10 text line per 16 px row. The
//! target build wraps a buffered-graphics SSD1306 on I²C; the host build
//! draws into an in-memory framebuffer.

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

use crate::app::ports::DisplayPort;
use crate::display::DisplayFrame;

pub const WIDTH: u32 = 128;
pub const HEIGHT: u32 = 64;
const LINE_PITCH: i32 = 16;

/// Clear `target` and draw every line of `frame`.
pub fn render_frame<D>(target: &mut D, frame: &DisplayFrame) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    let style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    target.clear(BinaryColor::Off)?;
    for (row, line) in frame.lines().enumerate() {
        Text::with_baseline(line, Point::new(0, row as i32 * LINE_PITCH), style, Baseline::Top)
            .draw(target)?;
    }
    Ok(())
}

// ── ESP-IDF: SSD1306 over I²C ─────────────────────────────────

#[cfg(target_os = "espidf")]
mod target {
    use esp_idf_hal::i2c::I2cDriver;
    use log::{info, warn};
    use ssd1306::mode::BufferedGraphicsMode;
    use ssd1306::prelude::*;
    use ssd1306::{I2CDisplayInterface, Ssd1306};

    use super::{DisplayFrame, DisplayPort, render_frame};
    use crate::error::Error;

    type Panel = Ssd1306<
        I2CInterface<I2cDriver<'static>>,
        DisplaySize128x64,
        BufferedGraphicsMode<DisplaySize128x64>,
    >;

    pub struct OledDisplay {
        panel: Panel,
        failures: u32,
    }

    impl OledDisplay {
        pub fn new(i2c: I2cDriver<'static>) -> Result<Self, Error> {
            let interface = I2CDisplayInterface::new(i2c);
            let mut panel = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
                .into_buffered_graphics_mode();
            panel.init().map_err(|_| Error::Init("ssd1306 init"))?;
            info!("OLED: SSD1306 128x64 ready");
            Ok(Self { panel, failures: 0 })
        }
    }

    impl DisplayPort for OledDisplay {
        fn render(&mut self, frame: &DisplayFrame) {
            let drawn = render_frame(&mut self.panel, frame).is_ok() && self.panel.flush().is_ok();
            if !drawn {
                self.failures = self.failures.saturating_add(1);
                // A flaky I²C bus would otherwise flood the console.
                if self.failures.is_power_of_two() {
                    warn!("OLED: draw failed ({} total)", self.failures);
                }
            }
        }
    }
}

#[cfg(target_os = "espidf")]
pub use target::OledDisplay;

// ── Host: in-memory framebuffer ───────────────────────────────

/// Framebuffer stand-in for the panel. Keeps the last frame for asserts.
pub struct SimDisplay {
    pixels: [[bool; WIDTH as usize]; HEIGHT as usize],
    last: Option<DisplayFrame>,
    renders: u32,
}

impl Default for SimDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl SimDisplay {
    pub fn new() -> Self {
        Self {
            pixels: [[false; WIDTH as usize]; HEIGHT as usize],
            last: None,
            renders: 0,
        }
    }

    pub fn last_frame(&self) -> Option<&DisplayFrame> {
        self.last.as_ref()
    }

    pub fn renders(&self) -> u32 {
        self.renders
    }

    pub fn lit_pixels(&self) -> usize {
        self.pixels.iter().flatten().filter(|p| **p).count()
    }
}

impl OriginDimensions for SimDisplay {
    fn size(&self) -> Size {
        Size::new(WIDTH, HEIGHT)
    }
}

impl DrawTarget for SimDisplay {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (usize::try_from(point.x), usize::try_from(point.y)) else {
                continue;
            };
            if let Some(px) = self.pixels.get_mut(y).and_then(|row| row.get_mut(x)) {
                *px = color.is_on();
            }
        }
        Ok(())
    }
}

impl DisplayPort for SimDisplay {
    fn render(&mut self, frame: &DisplayFrame) {
        let Ok(()) = render_frame(self, frame);
        self.last = Some(frame.clone());
        self.renders += 1;
    }
}
