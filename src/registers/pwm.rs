use ral_registers::{RWRegister, WORegister};

/// PWM controller register block.
#[repr(C)]
pub struct RegisterBlock {
    /// Control
    pub CTL: RWRegister<u32>,
    /// Status
    pub STA: RWRegister<u32>,
    /// DMA configuration
    pub DMAC: RWRegister<u32>,
    _reserved0: [u32; 1],
    /// Channel 1 range
    pub RNG1: RWRegister<u32>,
    /// Channel 1 data
    pub DAT1: RWRegister<u32>,
    /// FIFO input, shared by both channels
    pub FIF1: WORegister<u32>,
    _reserved1: [u32; 1],
    /// Channel 2 range
    pub RNG2: RWRegister<u32>,
    /// Channel 2 data
    pub DAT2: RWRegister<u32>,
}

/// Control
pub mod CTL {
    register_fields! {
        // Channel 1 enable
        PWEN1: 0;
        // Channel 1 mode. 0: PWM, 1: serializer
        MODE1: 1;
        // Channel 1 repeats the last word when the FIFO runs dry
        RPTL1: 2;
        // Channel 1 line state while not transmitting
        SBIT1: 3;
        // Channel 1 output polarity inverted
        POLA1: 4;
        // Channel 1 data from FIFO instead of DAT1
        USEF1: 5;
        // Clear FIFO, self clearing
        CLRF1: 6;
        // Channel 1 M/S algorithm instead of PWM algorithm
        MSEN1: 7;
        PWEN2: 8;
        MODE2: 9;
        RPTL2: 10;
        SBIT2: 11;
        POLA2: 12;
        USEF2: 13;
        MSEN2: 15;
    }
}

/// Status. Error flags are cleared by writing a one.
pub mod STA {
    register_fields! {
        FULL1: 0;
        EMPT1: 1;
        WERR1: 2;
        RERR1: 3;
        GAPO1: 4;
        GAPO2: 5;
        GAPO3: 6;
        GAPO4: 7;
        BERR: 8;
        STA1: 9;
        STA2: 10;
        STA3: 11;
        STA4: 12;
    }
}

/// DMA configuration
pub mod DMAC {
    register_fields! {
        DREQ: 0, 8;
        PANIC: 8, 8;
        ENAB: 31;
    }
}

/// Channel 1 range. In serializer mode, the number of bits sent per word.
pub mod RNG1 {}

/// Channel 1 data
pub mod DAT1 {}

/// FIFO input
pub mod FIF1 {}

/// Channel 2 range
pub mod RNG2 {}

/// Channel 2 data
pub mod DAT2 {}
