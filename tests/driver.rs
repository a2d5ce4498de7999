use std::time::Duration;

use ws2812_pwm::{
    config::Timing,
    registers::{gpio, Registers},
    Color, Config, TransmitError, Waveform, WireBits, Ws2812Driver,
};

fn config() -> Config {
    Config {
        timing: Timing::NONE,
        ..Config::default()
    }
}

fn detached_driver(num_leds: usize) -> Ws2812Driver {
    let mut driver = Ws2812Driver::with_config(num_leds, config());
    driver.init_hardware_with(Registers::detached().unwrap());
    driver
}

fn wire_bits(color: Color) -> Vec<bool> {
    WireBits::new([color]).collect()
}

#[test]
fn hardware_bring_up() {
    let driver = detached_driver(1);
    let registers = driver.registers().unwrap();

    assert_eq!(gpio::function(&registers.gpio, 18), 0b010);
    assert_eq!(registers.clock.PWMCTL.read(), 0x5a00_0015);
    assert_eq!(registers.clock.PWMDIV.read(), 0x5a00_0000 | (400 << 12));
    assert_eq!(registers.pwm.DMAC.read() >> 31, 0);
    assert_eq!(registers.pwm.RNG1.read(), 32);
    assert_eq!(registers.pwm.CTL.read(), 0b10_0010);
}

#[test]
fn new_driver_is_black() {
    let driver = Ws2812Driver::new(5);
    assert_eq!(driver.len(), 5);
    assert!(!driver.is_initialized());
    assert!(driver.pixels().iter().all(|&led| led == Color::BLACK));
}

#[test]
#[should_panic]
fn more_leds_than_the_fifo_holds() {
    Ws2812Driver::new(8);
}

#[test]
fn out_of_range_pixel_is_rejected() {
    let mut driver = detached_driver(3);
    assert!(driver.set_pixel_color(2, 1, 2, 3));
    let before = driver.pixels().to_vec();

    assert!(!driver.set_pixel_color(3, 255, 255, 255));
    assert!(!driver.set_pixel_color(usize::MAX, 255, 255, 255));
    assert!(driver.set_pixel(3, [9u8, 9, 9]).is_err());

    assert_eq!(driver.pixels(), &before[..]);
}

#[test]
fn cleared_leds_still_send_zero_bits() {
    let mut driver = detached_driver(7);
    for index in 0..7 {
        driver.set_pixel_color(index, 255, 255, 255);
    }
    driver.show();

    driver.clear_led_buffer();
    driver.show();

    // Black is 24 zero bits, each of which is `100` on the wire
    let waveform = driver.waveform();
    let sent: String = (0..7 * 72)
        .map(|pos| if waveform.get_bit(pos) { '1' } else { '0' })
        .collect();
    assert_eq!(sent, "100".repeat(24 * 7));
    assert!((7 * 72..512).all(|pos| !waveform.get_bit(pos)));
}

#[test]
fn cleared_led_is_not_silent() {
    let mut driver = detached_driver(1);
    driver.set_pixel_color(0, 1, 2, 3);
    driver.clear_led_buffer();
    driver.show();

    let mut expected = [0u32; 16];
    expected[..3].copy_from_slice(&[0x4924_9249, 0x9249_2492, 0x0000_0024]);
    assert_eq!(driver.waveform().words(), &expected);
}

#[test]
fn empty_chain_sends_only_zeros() {
    let mut driver = detached_driver(0);
    assert!(driver.is_empty());
    assert!(!driver.set_pixel_color(0, 1, 1, 1));
    driver.show();
    assert!(driver.waveform().words().iter().all(|&word| word == 0));
}

#[test]
fn single_red_led() {
    let mut driver = detached_driver(1);
    driver.clear_led_buffer();
    assert!(driver.set_pixel_color(0, 255, 0, 0));
    driver.show();

    let mut expected = [0u32; 16];
    expected[..3].copy_from_slice(&[0xdb24_9249, 0x9249_6db6, 0x0000_0024]);
    assert_eq!(driver.waveform().words(), &expected);

    let registers = driver.registers().unwrap();
    assert_eq!(registers.pwm.CTL.read() & 0b1, 1, "output enabled");
    assert_eq!(registers.pwm.CTL.read() & 0b10_0010, 0b10_0010);
}

#[test]
fn pixel_lands_at_its_offset() {
    let color = Color::new(0x12, 0xab, 0x0f);
    let max_leds = <Waveform>::MAX_LEDS;

    for index in 0..max_leds {
        let mut driver = detached_driver(max_leds);
        for other in 0..max_leds {
            driver.set_pixel_color(other, 255, 255, 255);
        }
        driver.set_pixel(index, color).unwrap();
        driver.show();

        let waveform = driver.waveform();
        let bits: Vec<bool> = (index * 72..(index + 1) * 72)
            .map(|pos| waveform.get_bit(pos))
            .collect();
        assert_eq!(bits, wire_bits(color), "LED {}", index);

        // Trailing bits of the last word stay low
        assert!((504..512).all(|pos| !waveform.get_bit(pos)), "LED {}", index);
    }
}

#[test]
fn show_is_idempotent() {
    let mut driver = detached_driver(4);
    driver.set_pixel_color(0, 10, 20, 30);
    driver.set_pixel_color(3, 200, 100, 0);

    driver.show();
    let first = driver.waveform().clone();
    driver.show();
    assert_eq!(driver.waveform(), &first);
}

#[test]
fn show_without_hardware_still_encodes() {
    let mut driver = Ws2812Driver::with_config(1, config());
    driver.set_pixel_color(0, 255, 0, 0);
    driver.show();

    assert!(driver.status().is_none());
    assert_eq!(driver.waveform().words()[0], 0xdb24_9249);
}

#[test]
fn transmit_errors() {
    let mut driver = Ws2812Driver::with_config(1, config());
    assert!(matches!(
        driver.check_transmit_errors(),
        Err(TransmitError::NotInitialized)
    ));

    driver.init_hardware_with(Registers::detached().unwrap());
    driver.registers().unwrap().pwm.STA.write(0b10);
    assert!(driver.check_transmit_errors().is_ok());
    assert!(driver.status().unwrap().fifo_empty);

    driver.registers().unwrap().pwm.STA.write(0b1000);
    match driver.check_transmit_errors() {
        Err(TransmitError::Peripheral { status }) => assert!(status.fifo_read_error),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn full_fifo_falls_back_to_fixed_delay() {
    let mut driver = Ws2812Driver::with_config(
        1,
        Config {
            timing: Timing {
                fifo_poll_timeout: Some(Duration::from_micros(100)),
                ..Timing::NONE
            },
            ..Config::default()
        },
    );
    driver.init_hardware_with(Registers::detached().unwrap());

    // A full FIFO never drains in plain memory
    driver.registers().unwrap().pwm.STA.write(0b1);
    driver.set_pixel_color(0, 0, 0, 255);
    driver.show();

    assert_eq!(driver.registers().unwrap().pwm.CTL.read() & 0b1, 1);
}
