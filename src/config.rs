use std::{path::PathBuf, thread, time::Duration};

use crate::registers::gpio::AltFunction;

/// Physical addresses of the peripherals on one SoC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    /// Start of the peripheral address space.
    pub peripheral_base: u64,
    /// Offset of the GPIO controller.
    pub gpio_offset: u64,
    /// Offset of the PWM controller.
    pub pwm_offset: u64,
    /// Offset of the clock manager.
    pub clock_offset: u64,
    /// Offset of the DMA controller.
    pub dma_offset: u64,
}

impl Platform {
    const fn with_base(peripheral_base: u64) -> Self {
        Self {
            peripheral_base,
            gpio_offset: 0x20_0000,
            pwm_offset: 0x20_c000,
            clock_offset: 0x10_1000,
            dma_offset: 0x00_7000,
        }
    }

    /// Raspberry Pi 1 and Zero.
    pub const BCM2835: Self = Self::with_base(0x2000_0000);
    /// Raspberry Pi 2.
    pub const BCM2836: Self = Self::with_base(0x3f00_0000);
    /// Raspberry Pi 3.
    pub const BCM2837: Self = Self::with_base(0x3f00_0000);
    /// Raspberry Pi 4.
    pub const BCM2711: Self = Self::with_base(0xfe00_0000);

    /// Physical address of the GPIO controller.
    pub const fn gpio_base(&self) -> u64 {
        self.peripheral_base + self.gpio_offset
    }

    /// Physical address of the PWM controller.
    pub const fn pwm_base(&self) -> u64 {
        self.peripheral_base + self.pwm_offset
    }

    /// Physical address of the clock manager.
    pub const fn clock_base(&self) -> u64 {
        self.peripheral_base + self.clock_offset
    }

    /// Physical address of the DMA controller.
    pub const fn dma_base(&self) -> u64 {
        self.peripheral_base + self.dma_offset
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::BCM2837
    }
}

/// The clock that feeds the PWM clock divider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ClockSource {
    /// The crystal oscillator.
    Oscillator = 1,
    /// PLLA. Does not seem to work.
    PllA = 4,
    /// PLLC. Can be slowed down when the system is under heavy load.
    PllC = 5,
    /// PLLD.
    PllD = 6,
}

impl ClockSource {
    /// The value of the `SRC` field.
    pub const fn bits(self) -> u32 {
        self as u32
    }
}

/// Divisor between the clock source and the serializer bit clock.
///
/// The fractional part is quantized to a range of 0-1024;
/// a divisor of 400.5 is `integer: 400, fractional: 512`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockDivisor {
    /// The integer part, at most 12 bits.
    pub integer: u16,
    /// The fractional part, `0..=1024`.
    pub fractional: u16,
}

impl ClockDivisor {
    /// Largest value the fractional part can take.
    pub const FRACTION_SCALE: u16 = 1024;
    /// Largest integer part the divider register accepts.
    pub const MAX_INTEGER: u16 = 0xfff;

    /// Creates a divisor, saturating both parts to what the hardware accepts.
    pub const fn new(integer: u16, fractional: u16) -> Self {
        let integer = if integer > Self::MAX_INTEGER {
            Self::MAX_INTEGER
        } else {
            integer
        };
        let fractional = if fractional > Self::FRACTION_SCALE {
            Self::FRACTION_SCALE
        } else {
            fractional
        };
        Self {
            integer,
            fractional,
        }
    }

    /// The divisor that derives `target_hz` from a `source_hz` clock.
    pub fn from_rates(source_hz: u32, target_hz: u32) -> Self {
        let target_hz = target_hz.max(1);
        let integer = source_hz / target_hz;
        let remainder = u64::from(source_hz % target_hz);
        let fractional = remainder * u64::from(Self::FRACTION_SCALE) / u64::from(target_hz);

        Self::new(
            u16::try_from(integer).unwrap_or(Self::MAX_INTEGER),
            fractional as u16,
        )
    }
}

/// Fixed delays used instead of waiting for hardware ready flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Pause after every configuration register write.
    pub settle: Duration,
    /// Pause after every word pushed into the FIFO.
    pub fifo_write: Duration,
    /// If set, poll the FIFO full flag before each push instead of sleeping
    /// for [`fifo_write`](Self::fifo_write) afterwards. When the flag doesn't
    /// clear within the timeout, the fixed delay is used.
    pub fifo_poll_timeout: Option<Duration>,
}

impl Timing {
    /// No delays at all. Only useful without real hardware.
    pub const NONE: Self = Self {
        settle: Duration::ZERO,
        fifo_write: Duration::ZERO,
        fifo_poll_timeout: None,
    };

    pub(crate) fn settle(&self) {
        sleep(self.settle);
    }

    pub(crate) fn fifo_write_delay(&self) {
        sleep(self.fifo_write);
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(1),
            fifo_write: Duration::from_millis(1),
            fifo_poll_timeout: None,
        }
    }
}

fn sleep(duration: Duration) {
    if !duration.is_zero() {
        thread::sleep(duration);
    }
}

/// Configuration of a [Ws2812Driver](crate::Ws2812Driver).
///
/// The default matches a Raspberry Pi 3 with the strip on GPIO 18.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Peripheral addresses.
    pub platform: Platform,
    /// The memory device the registers get mapped from.
    pub memory_device: PathBuf,
    /// The GPIO pin the strip is connected to.
    pub pin: u8,
    /// The alternate function that routes PWM channel 1 to [`pin`](Self::pin).
    pub pin_function: AltFunction,
    /// The clock feeding the PWM peripheral.
    pub clock_source: ClockSource,
    /// The divisor applied to [`clock_source`](Self::clock_source).
    pub clock_divisor: ClockDivisor,
    /// Delays between register accesses.
    pub timing: Timing,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            platform: Platform::default(),
            memory_device: PathBuf::from("/dev/mem"),
            pin: 18,
            pin_function: AltFunction::Alt5,
            clock_source: ClockSource::PllC,
            clock_divisor: ClockDivisor::new(400, 0),
            timing: Timing::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_addresses() {
        let platform = Platform::BCM2837;
        assert_eq!(platform.gpio_base(), 0x3f20_0000);
        assert_eq!(platform.pwm_base(), 0x3f20_c000);
        assert_eq!(platform.clock_base(), 0x3f10_1000);
        assert_eq!(platform.dma_base(), 0x3f00_7000);
        assert_eq!(Platform::BCM2711.pwm_base(), 0xfe20_c000);
    }

    #[test]
    fn divisor_from_rates() {
        assert_eq!(
            ClockDivisor::from_rates(1_000_000_000, 2_500_000),
            ClockDivisor::new(400, 0)
        );
        // 500 MHz / 1.2 MHz = 416.666...
        assert_eq!(
            ClockDivisor::from_rates(500_000_000, 1_200_000),
            ClockDivisor::new(416, 682)
        );
    }

    #[test]
    fn divisor_saturates() {
        assert_eq!(ClockDivisor::new(5000, 2000), ClockDivisor::new(4095, 1024));
        assert_eq!(ClockDivisor::from_rates(u32::MAX, 1).integer, 4095);
    }
}
