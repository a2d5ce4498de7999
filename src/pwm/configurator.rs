use ral_registers::{modify_reg, write_reg};

use crate::{
    config::{ClockDivisor, ClockSource, Timing},
    registers::{
        clock,
        gpio::{self, FunctionSelect},
        pwm, Registers,
    },
};

/// Bits the serializer sends per FIFO word; neither padded nor truncated.
pub const SERIALIZER_RANGE: u32 = u32::BITS;

/// Performs the individual steps of the PWM bring-up.
///
/// There is no ready flag reliable enough to poll, so every register write
/// is followed by the configured settle delay.
pub struct PwmConfigurator<'a> {
    registers: &'a Registers,
    timing: &'a Timing,
}

impl<'a> PwmConfigurator<'a> {
    pub fn new(registers: &'a Registers, timing: &'a Timing) -> Self {
        Self { registers, timing }
    }

    pub fn route_pin(&self, pin: u8, function: impl Into<FunctionSelect>) {
        let function = function.into();
        log::debug!("GPIO {} function select: {:?}", pin, function);
        gpio::set_function(&self.registers.gpio, pin, function);
    }

    /// Stopping the clock and waiting for the busy flag doesn't work, so the clock is killed.
    pub fn kill_clock(&self) {
        write_reg!(clock, self.registers.clock, PWMCTL, PASSWD: PASSWD_MAGIC, KILL: KILL_1);
        self.timing.settle();
    }

    pub fn disable_dma(&self) {
        modify_reg!(pwm, self.registers.pwm, DMAC, ENAB: ENAB_0);
        self.timing.settle();
    }

    pub fn set_clock_divisor(&self, divisor: ClockDivisor) {
        log::debug!(
            "PWM clock divisor: {} + {}/{}",
            divisor.integer,
            divisor.fractional,
            ClockDivisor::FRACTION_SCALE
        );
        write_reg!(
            clock,
            self.registers.clock,
            PWMDIV,
            PASSWD: PASSWD_MAGIC,
            DIVI: u32::from(divisor.integer),
            DIVF: u32::from(divisor.fractional)
        );
        self.timing.settle();
    }

    pub fn start_clock(&self, source: ClockSource) {
        log::debug!("PWM clock source: {:?}", source);
        write_reg!(
            clock,
            self.registers.clock,
            PWMCTL,
            PASSWD: PASSWD_MAGIC,
            ENAB: ENAB_1,
            SRC: source.bits()
        );
        self.timing.settle();
    }

    /// Clears the whole control register, which also disables the output.
    pub fn reset_control(&self) {
        write_reg!(pwm, self.registers.pwm, CTL, 0);
        self.timing.settle();
    }

    pub fn set_range(&self, bits: u32) {
        write_reg!(pwm, self.registers.pwm, RNG1, bits);
        self.timing.settle();
    }

    /// Error flags are cleared by writing ones to them.
    pub fn clear_errors(&self) {
        write_reg!(
            pwm,
            self.registers.pwm,
            STA,
            WERR1: WERR1_1,
            RERR1: RERR1_1,
            GAPO1: GAPO1_1,
            BERR: BERR_1
        );
        self.timing.settle();
    }

    /// Serializer mode, fed from the FIFO, no repeat, normal polarity, low when silent.
    ///
    /// The output stays disabled.
    pub fn select_serializer(&self) {
        write_reg!(
            pwm,
            self.registers.pwm,
            CTL,
            MODE1: MODE1_1,
            RPTL1: RPTL1_0,
            SBIT1: SBIT1_0,
            POLA1: POLA1_0,
            USEF1: USEF1_1
        );
        self.timing.settle();
    }
}
