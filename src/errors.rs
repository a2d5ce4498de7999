use std::{io, path::PathBuf};

use snafu::prelude::*;

use crate::pwm::PwmStatus;

/// Errors while mapping the peripheral registers.
///
/// All of these mean the process can't drive the hardware at all
/// (missing privileges, wrong board, not running on a Raspberry Pi);
/// retrying without fixing the environment will not help.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum MapError {
    /// The physical memory device could not be opened.
    #[snafu(display("Unable to open {}", path.display()))]
    OpenMemoryDevice {
        /// Path of the memory device.
        path: PathBuf,
        /// The underlying IO error.
        source: io::Error,
    },
    /// A register block could not be mapped.
    #[snafu(display("Unable to map register block at {base:#010x}"))]
    MapRegisterBlock {
        /// Physical address of the block.
        base: u64,
        /// The underlying IO error.
        source: io::Error,
    },
    /// Backing memory for a detached register block could not be allocated.
    #[snafu(display("Unable to allocate register block"))]
    AllocateBlock {
        /// The underlying IO error.
        source: io::Error,
    },
}

/// Errors of the [Ws2812Driver::set_pixel](crate::Ws2812Driver::set_pixel) function
#[derive(Debug, Snafu, PartialEq, Eq)]
#[snafu(visibility(pub(crate)))]
pub enum PixelError {
    /// The pixel index is beyond the end of the LED chain.
    #[snafu(display("Unable to set pixel {index} (don't have that many LEDs, chain length is {len})"))]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The length of the LED chain.
        len: usize,
    },
}

/// Errors reported by [Ws2812Driver::check_transmit_errors](crate::Ws2812Driver::check_transmit_errors)
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum TransmitError {
    /// The hardware was never initialized, nothing was transmitted.
    NotInitialized,
    /// The PWM peripheral raised error flags.
    #[snafu(display("PWM peripheral reported errors: {status}"))]
    Peripheral {
        /// The status register at the time of the check.
        status: PwmStatus,
    },
}
