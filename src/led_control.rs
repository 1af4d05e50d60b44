use crate::BoardError;
use log::warn;
use smart_leds::{RGB8, SmartLedsWrite};

/// Colour shown while the indicator is on
pub const LED_ON_COLOR: RGB8 = RGB8 {
    r: 255,
    g: 255,
    b: 255,
};

/// Colour shown while the indicator is off
pub const LED_OFF_COLOR: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

/// Single-pixel indicator driven through a smart LED writer
///
/// The commanded state is tracked here; the pixel itself is never read back.
pub struct IndicatorLed<W>
where
    W: SmartLedsWrite<Color = RGB8>,
{
    writer: W,
    on: bool,
}

impl<W> IndicatorLed<W>
where
    W: SmartLedsWrite<Color = RGB8>,
{
    /// Create a new indicator, commanded off
    pub fn new(writer: W) -> Self {
        Self { writer, on: false }
    }

    /// Clear the pixel before first use
    ///
    /// The WS2812 does not reliably latch the very first frame after power-up,
    /// so the clear is sent twice.
    pub fn init(&mut self) {
        for _ in 0..2 {
            self.forward_color(LED_OFF_COLOR).ok(); // Silent error handling
        }
        self.on = false;
    }

    /// Command the indicator on or off and commit the frame
    pub fn set_state(&mut self, on: bool) {
        let color = if on { LED_ON_COLOR } else { LED_OFF_COLOR };
        self.forward_color(color).ok(); // Silent error handling
        self.on = on;
    }

    /// Last commanded state
    pub fn state(&self) -> bool {
        self.on
    }

    /// Give the writer back
    pub fn release(self) -> W {
        self.writer
    }

    /// Forward one colour to the pixel hardware
    fn forward_color(&mut self, color: RGB8) -> Result<(), BoardError> {
        self.writer.write([color]).map_err(|_| {
            warn!("[LED] Failed to transmit pixel data");
            BoardError::LedError
        })
    }
}
