mod configurator;
mod driver;
mod status;
mod waveform;
mod wire_bits;

use crate::{registers::Registers, Color, Config};

pub use status::PwmStatus;
pub use waveform::{Waveform, WAVEFORM_WORDS};
pub use wire_bits::{WireBits, BITS_PER_LED};

/// A WS2812 Neopixel LED Strip driver based on the Raspberry Pi's PWM serializer
#[derive(Debug)]
pub struct Ws2812Driver {
    config: Config,
    leds: Box<[Color]>,
    waveform: Waveform,
    registers: Option<Registers>,
}
