use std::fmt;

use crate::registers::pwm::STA;

/// Decoded PWM status register, channel 1 view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PwmStatus {
    /// The FIFO is full.
    pub fifo_full: bool,
    /// The FIFO is empty.
    pub fifo_empty: bool,
    /// A word was written into the full FIFO.
    pub fifo_write_error: bool,
    /// A word was read from the empty FIFO.
    pub fifo_read_error: bool,
    /// The serializer ran out of data while transmitting.
    pub gap: bool,
    /// The peripheral bus reported an error.
    pub bus_error: bool,
    /// Channel 1 is transmitting.
    pub transmitting: bool,
}

impl PwmStatus {
    /// Decodes the raw value of the status register.
    pub fn from_bits(bits: u32) -> Self {
        let flag = |mask: u32| bits & mask != 0;
        Self {
            fifo_full: flag(STA::FULL1::mask),
            fifo_empty: flag(STA::EMPT1::mask),
            fifo_write_error: flag(STA::WERR1::mask),
            fifo_read_error: flag(STA::RERR1::mask),
            gap: flag(STA::GAPO1::mask),
            bus_error: flag(STA::BERR::mask),
            transmitting: flag(STA::STA1::mask),
        }
    }

    /// Whether any of the error flags is raised.
    pub fn has_errors(&self) -> bool {
        self.fifo_write_error || self.fifo_read_error || self.gap || self.bus_error
    }
}

impl fmt::Display for PwmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags = [
            (self.fifo_full, "FULL1"),
            (self.fifo_empty, "EMPT1"),
            (self.fifo_write_error, "WERR1"),
            (self.fifo_read_error, "RERR1"),
            (self.gap, "GAPO1"),
            (self.bus_error, "BERR"),
            (self.transmitting, "STA1"),
        ];

        let mut raised = flags.iter().filter(|(set, _)| *set).map(|(_, name)| *name);
        match raised.next() {
            None => write!(f, "-"),
            Some(first) => {
                write!(f, "{first}")?;
                raised.try_for_each(|name| write!(f, " {name}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode() {
        let status = PwmStatus::from_bits(0b10_0000_0010);
        assert!(status.fifo_empty);
        assert!(status.transmitting);
        assert!(!status.has_errors());
        assert_eq!(status.to_string(), "EMPT1 STA1");

        let status = PwmStatus::from_bits(0b1_0001_0100);
        assert!(status.fifo_write_error);
        assert!(status.gap);
        assert!(status.bus_error);
        assert!(status.has_errors());
        assert_eq!(status.to_string(), "WERR1 GAPO1 BERR");
    }

    #[test]
    fn nothing_raised() {
        assert_eq!(PwmStatus::default().to_string(), "-");
        assert_eq!(PwmStatus::from_bits(0), PwmStatus::default());
    }
}
