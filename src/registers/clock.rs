use ral_registers::RWRegister;

/// Clock manager register block, up to the PWM clock.
///
/// The PWM clock registers are missing from the peripheral datasheet;
/// offsets and fields are the ones the firmware uses.
#[repr(C)]
pub struct RegisterBlock {
    _reserved0: [u32; 40],
    /// PWM clock control
    pub PWMCTL: RWRegister<u32>,
    /// PWM clock divisor
    pub PWMDIV: RWRegister<u32>,
}

/// The magic top byte of every clock manager write.
/// Writes without it are ignored by the hardware.
pub const PASSWORD: u32 = 0x5a;

/// PWM clock control
pub mod PWMCTL {
    register_fields! {
        SRC: 0, 4 {
            SRC_GND = 0,
            SRC_OSC = 1,
            SRC_PLLA = 4,
            SRC_PLLC = 5,
            SRC_PLLD = 6,
        };
        ENAB: 4;
        KILL: 5;
        BUSY: 7;
        FLIP: 8;
        MASH: 9, 2;
        PASSWD: 24, 8 { PASSWD_MAGIC = crate::registers::clock::PASSWORD };
    }
}

/// PWM clock divisor
pub mod PWMDIV {
    register_fields! {
        // Fraction, scaled to 0-1024
        DIVF: 0, 12;
        DIVI: 12, 12;
        PASSWD: 24, 8 { PASSWD_MAGIC = crate::registers::clock::PASSWORD };
    }
}
