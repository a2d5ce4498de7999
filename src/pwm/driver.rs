use std::time::{Duration, Instant};

use ral_registers::{modify_reg, read_reg, write_reg};
use snafu::prelude::*;

use super::{
    configurator::{PwmConfigurator, SERIALIZER_RANGE},
    PwmStatus, Waveform, Ws2812Driver,
};
use crate::{
    errors::{self, IndexOutOfRangeSnafu, NotInitializedSnafu, PeripheralSnafu},
    registers::{pwm, MemoryDevice, Registers},
    Color, Config, Pixel,
};

impl Ws2812Driver {
    /// Creates a driver for a chain of `num_leds` LEDs, with the default [Config].
    ///
    /// All LEDs start out black. No hardware is touched until
    /// [init_hardware](Self::init_hardware) is called.
    ///
    /// # Panics
    ///
    /// Panics if the wire bits of `num_leds` LEDs don't fit into the
    /// FIFO, see [Waveform::MAX_LEDS].
    pub fn new(num_leds: usize) -> Self {
        Self::with_config(num_leds, Config::default())
    }

    /// Creates a driver for a chain of `num_leds` LEDs.
    ///
    /// # Panics
    ///
    /// Panics if the wire bits of `num_leds` LEDs don't fit into the
    /// FIFO, see [Waveform::MAX_LEDS].
    pub fn with_config(num_leds: usize, config: Config) -> Self {
        assert!(
            num_leds <= <Waveform>::MAX_LEDS,
            "{} LEDs requested, but only {} fit into the PWM FIFO",
            num_leds,
            <Waveform>::MAX_LEDS
        );

        Self {
            config,
            leds: vec![Color::BLACK; num_leds].into_boxed_slice(),
            waveform: Waveform::new(),
            registers: None,
        }
    }

    /// The configuration the driver was created with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The length of the LED chain.
    pub fn len(&self) -> usize {
        self.leds.len()
    }

    /// Whether the LED chain is empty.
    pub fn is_empty(&self) -> bool {
        self.leds.is_empty()
    }

    /// Whether [init_hardware](Self::init_hardware) ran.
    pub fn is_initialized(&self) -> bool {
        self.registers.is_some()
    }

    /// Maps the peripheral registers and sets up clock and PWM serializer.
    ///
    /// Intended to be called once, before the first [show](Self::show).
    /// Requires read-write access to the memory device, so usually root privileges.
    ///
    /// Configuration mistakes (wrong platform, wrong clock) are not detected;
    /// they result in a wrong waveform on the pin.
    pub fn init_hardware(&mut self) -> Result<(), errors::MapError> {
        let device = MemoryDevice::new(&self.config.memory_device);
        let registers = Registers::map(&device, &self.config.platform)?;

        self.init_hardware_with(registers);
        Ok(())
    }

    /// Sets up clock and PWM serializer on already mapped registers.
    pub fn init_hardware_with(&mut self, registers: Registers) {
        let config = &self.config;

        log::debug!("Initializing PWM serializer.");
        log::debug!("    LEDs: {}", self.leds.len());
        log::debug!("    Output pin: GPIO {}", config.pin);
        log::debug!(
            "    DMA channels enabled: {:#06x}",
            registers.dma.ENABLE.read()
        );

        let setup = PwmConfigurator::new(&registers, &config.timing);
        setup.route_pin(config.pin, config.pin_function);
        setup.kill_clock();
        setup.disable_dma();
        setup.set_clock_divisor(config.clock_divisor);
        setup.start_clock(config.clock_source);
        setup.reset_control();
        setup.set_range(SERIALIZER_RANGE);
        setup.clear_errors();
        setup.select_serializer();

        self.registers = Some(registers);
    }

    /// Sets all LEDs to black.
    pub fn clear_led_buffer(&mut self) {
        self.leds.fill(Color::BLACK);
    }

    /// Sets the color of one LED.
    ///
    /// Takes effect with the next [show](Self::show).
    pub fn set_pixel(&mut self, index: usize, pixel: impl Pixel) -> Result<(), errors::PixelError> {
        let len = self.leds.len();
        let led = self
            .leds
            .get_mut(index)
            .context(IndexOutOfRangeSnafu { index, len })?;

        *led = pixel.into_color();
        Ok(())
    }

    /// Sets the color of one LED.
    ///
    /// Returns `false` and leaves all LEDs untouched if `index` is beyond the chain.
    /// Takes effect with the next [show](Self::show).
    pub fn set_pixel_color(&mut self, index: usize, r: u8, g: u8, b: u8) -> bool {
        match self.set_pixel(index, Color::new(r, g, b)) {
            Ok(()) => true,
            Err(err) => {
                log::warn!("{}", err);
                false
            }
        }
    }

    /// The LED buffer.
    pub fn pixels(&self) -> &[Color] {
        &self.leds
    }

    /// The waveform of the last [show](Self::show), before bit reversal.
    pub fn waveform(&self) -> &Waveform {
        &self.waveform
    }

    /// Writes the LED buffer to the strip.
    ///
    /// Returns as soon as the waveform is in the FIFO; the serializer drains it
    /// on its own, which takes roughly 30 µs per LED.
    pub fn show(&mut self) {
        // Somebody else might have reconfigured the peripheral
        if let Some(registers) = &self.registers {
            PwmConfigurator::new(registers, &self.config.timing).select_serializer();
        }

        self.waveform.encode(&self.leds);
        log::trace!("Waveform: {:08x?}", self.waveform.words());

        let Some(registers) = &self.registers else {
            log::warn!("Hardware not initialized; waveform not transmitted.");
            return;
        };

        Self::stop_output(registers);
        self.config.timing.settle();

        Self::clear_fifo(registers);
        self.config.timing.settle();

        for word in self.waveform.fifo_words() {
            self.push_fifo(registers, word);
        }

        Self::start_output(registers);
    }

    /// The mapped registers, once the hardware is initialized.
    pub fn registers(&self) -> Option<&Registers> {
        self.registers.as_ref()
    }

    /// The current PWM status, if the hardware is initialized.
    pub fn status(&self) -> Option<PwmStatus> {
        self.registers
            .as_ref()
            .map(|registers| PwmStatus::from_bits(registers.pwm.STA.read()))
    }

    /// Reports and clears error flags the PWM peripheral raised since the last check.
    pub fn check_transmit_errors(&self) -> Result<(), errors::TransmitError> {
        let registers = self.registers.as_ref().context(NotInitializedSnafu)?;

        let status = PwmStatus::from_bits(registers.pwm.STA.read());
        if status.has_errors() {
            log::error!("PWM peripheral reported errors: {}", status);
            PwmConfigurator::new(registers, &self.config.timing).clear_errors();
            return PeripheralSnafu { status }.fail();
        }

        Ok(())
    }

    fn stop_output(registers: &Registers) {
        modify_reg!(pwm, registers.pwm, CTL, PWEN1: PWEN1_0);
    }

    fn start_output(registers: &Registers) {
        modify_reg!(pwm, registers.pwm, CTL, PWEN1: PWEN1_1);
    }

    fn clear_fifo(registers: &Registers) {
        modify_reg!(pwm, registers.pwm, CTL, CLRF1: CLRF1_1);
    }

    fn fifo_full(registers: &Registers) -> bool {
        read_reg!(pwm, registers.pwm, STA, FULL1 == FULL1_1)
    }

    fn wait_fifo_not_full(registers: &Registers, timeout: Duration) -> bool {
        let start = Instant::now();
        while Self::fifo_full(registers) {
            if start.elapsed() >= timeout {
                return false;
            }
            std::hint::spin_loop();
        }
        true
    }

    fn push_fifo(&self, registers: &Registers, word: u32) {
        let timing = &self.config.timing;

        if let Some(timeout) = timing.fifo_poll_timeout {
            if Self::wait_fifo_not_full(registers, timeout) {
                write_reg!(pwm, registers.pwm, FIF1, word);
                return;
            }
            log::debug!("PWM FIFO still full after {:?}, using fixed delay.", timeout);
        }

        write_reg!(pwm, registers.pwm, FIF1, word);
        timing.fifo_write_delay();
    }
}
