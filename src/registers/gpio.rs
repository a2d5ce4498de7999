use ral_registers::RWRegister;

use super::Window;

/// GPIO controller register block, up to the function select registers.
#[repr(C)]
pub struct RegisterBlock {
    /// Function select, ten pins per register, three bits per pin
    pub GPFSEL: [RWRegister<u32>; 6],
}

/// Number of GPIO pins covered by the function select registers.
pub const PIN_COUNT: u8 = 54;

const PINS_PER_FSEL: u8 = 10;
const FSEL_WIDTH: u32 = 3;
const FSEL_MASK: u32 = 0b111;

/// Value of a pin's three bit function select field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum FunctionSelect {
    /// Input
    Input = 0b000,
    /// Output
    Output = 0b001,
    /// Alternate function 0
    Alt0 = 0b100,
    /// Alternate function 1
    Alt1 = 0b101,
    /// Alternate function 2
    Alt2 = 0b110,
    /// Alternate function 3
    Alt3 = 0b111,
    /// Alternate function 4
    Alt4 = 0b011,
    /// Alternate function 5
    Alt5 = 0b010,
}

/// An alternate function, in the numbering of the peripheral datasheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AltFunction {
    /// ALT0
    Alt0,
    /// ALT1
    Alt1,
    /// ALT2
    Alt2,
    /// ALT3
    Alt3,
    /// ALT4
    Alt4,
    /// ALT5. Routes PWM channel 1 to GPIO 18.
    Alt5,
}

/// The function select codes of ALT0 to ALT5. The numbering is not linear.
const ALT_FUNCTION_SELECT: [FunctionSelect; 6] = [
    FunctionSelect::Alt0,
    FunctionSelect::Alt1,
    FunctionSelect::Alt2,
    FunctionSelect::Alt3,
    FunctionSelect::Alt4,
    FunctionSelect::Alt5,
];

impl AltFunction {
    /// Converts a numeric alternate function; everything from 5 upwards is ALT5.
    pub const fn from_code(code: u8) -> Self {
        match code {
            0 => Self::Alt0,
            1 => Self::Alt1,
            2 => Self::Alt2,
            3 => Self::Alt3,
            4 => Self::Alt4,
            _ => Self::Alt5,
        }
    }

    /// The function select value of this alternate function.
    pub const fn function_select(self) -> FunctionSelect {
        ALT_FUNCTION_SELECT[self as usize]
    }
}

impl From<AltFunction> for FunctionSelect {
    fn from(alt: AltFunction) -> Self {
        alt.function_select()
    }
}

/// Replaces the function select field of `pin`.
///
/// # Panics
///
/// Panics if `pin` is not below [`PIN_COUNT`].
pub fn set_function(gpio: &Window<RegisterBlock>, pin: u8, function: impl Into<FunctionSelect>) {
    assert!(pin < PIN_COUNT, "Invalid GPIO pin: {}", pin);

    let function = function.into();
    let register = &gpio.GPFSEL[usize::from(pin / PINS_PER_FSEL)];
    let shift = u32::from(pin % PINS_PER_FSEL) * FSEL_WIDTH;

    let value = register.read();
    register.write((value & !(FSEL_MASK << shift)) | ((function as u32) << shift));
}

/// Reads the function select field of `pin`.
///
/// # Panics
///
/// Panics if `pin` is not below [`PIN_COUNT`].
pub fn function(gpio: &Window<RegisterBlock>, pin: u8) -> u32 {
    assert!(pin < PIN_COUNT, "Invalid GPIO pin: {}", pin);

    let register = &gpio.GPFSEL[usize::from(pin / PINS_PER_FSEL)];
    let shift = u32::from(pin % PINS_PER_FSEL) * FSEL_WIDTH;

    (register.read() >> shift) & FSEL_MASK
}
