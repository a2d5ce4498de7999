use ral_registers::{RORegister, RWRegister};

/// DMA controller register block.
///
/// Only channel 0 and the global registers are laid out; the driver feeds
/// the PWM FIFO by hand and keeps this block mapped for a DMA based feed.
#[repr(C)]
pub struct RegisterBlock {
    /// Channel 0 control and status
    pub CS: RWRegister<u32>,
    /// Channel 0 control block address
    pub CONBLK_AD: RWRegister<u32>,
    _reserved0: [u32; 1014],
    /// Interrupt status of all channels
    pub INT_STATUS: RORegister<u32>,
    _reserved1: [u32; 3],
    /// Global enable bits, one per channel
    pub ENABLE: RWRegister<u32>,
}
