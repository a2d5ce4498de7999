#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

/// Bit manipulation on single words.
pub mod bits;
/// Platform and driver configuration.
pub mod config;
/// Memory mapped peripheral registers.
pub mod registers;

mod errors;
mod pixel;
mod pwm;

pub use config::Config;
pub use errors::{MapError, PixelError, TransmitError};
pub use pixel::{Color, Pixel};
pub use pwm::{PwmStatus, Waveform, WireBits, Ws2812Driver, BITS_PER_LED, WAVEFORM_WORDS};
