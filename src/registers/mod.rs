//! Userspace access to the peripheral register blocks.
//!
//! Each block is mapped from the physical memory device as its own 4 KiB
//! shared window and viewed as a `#[repr(C)]` register block, so registers can
//! be accessed with [`read_reg!`](ral_registers::read_reg),
//! [`write_reg!`](ral_registers::write_reg) and
//! [`modify_reg!`](ral_registers::modify_reg).

use std::{
    cell::OnceCell,
    fs::{File, OpenOptions},
    marker::PhantomData,
    mem,
    ops::Deref,
    os::unix::fs::OpenOptionsExt,
    path::{Path, PathBuf},
    ptr::NonNull,
};

use memmap2::{MmapMut, MmapOptions};
use snafu::prelude::*;

use crate::{
    config::Platform,
    errors::{AllocateBlockSnafu, MapError, MapRegisterBlockSnafu, OpenMemoryDeviceSnafu},
};

/// Generates bit field modules in the layout the `ral-registers` macros expect.
///
/// `FIELD: offset;` declares a single bit with the values `FIELD_0` and `FIELD_1`,
/// `FIELD: offset, width { NAME = value, .. };` a wider field with named values.
macro_rules! register_fields {
    () => {};
    ($field:ident: $offset:literal; $($rest:tt)*) => {
        paste::paste! {
            #[allow(missing_docs)]
            pub mod $field {
                pub const offset: u32 = $offset;
                pub const mask: u32 = 1 << offset;
                pub mod R {}
                pub mod W {}
                pub mod RW {
                    pub const [<$field _0>]: u32 = 0;
                    pub const [<$field _1>]: u32 = 1;
                }
            }
        }
        register_fields!($($rest)*);
    };
    ($field:ident: $offset:literal, $width:literal $({ $($name:ident = $value:expr),* $(,)? })?; $($rest:tt)*) => {
        #[allow(missing_docs)]
        pub mod $field {
            pub const offset: u32 = $offset;
            pub const mask: u32 = (u32::MAX >> (32 - $width)) << offset;
            pub mod R {}
            pub mod W {}
            pub mod RW {
                $($(pub const $name: u32 = $value;)*)?
            }
        }
        register_fields!($($rest)*);
    };
}

/// Clock manager registers.
#[allow(non_snake_case, non_upper_case_globals)]
pub mod clock;
/// DMA controller registers. Mapped, but not driven.
#[allow(non_snake_case, non_upper_case_globals)]
pub mod dma;
/// GPIO controller registers.
#[allow(non_snake_case, non_upper_case_globals)]
pub mod gpio;
/// PWM controller registers.
#[allow(non_snake_case, non_upper_case_globals)]
pub mod pwm;

/// Size of one mapped register block.
pub const BLOCK_SIZE: usize = 4 * 1024;

/// The physical memory device, opened on first use and shared by all mappings.
#[derive(Debug)]
pub struct MemoryDevice {
    path: PathBuf,
    file: OnceCell<File>,
}

impl MemoryDevice {
    /// Creates a handle for the device at `path`. Nothing is opened yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: OnceCell::new(),
        }
    }

    /// The path of the device.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the device has been opened already.
    pub fn is_open(&self) -> bool {
        self.file.get().is_some()
    }

    fn file(&self) -> Result<&File, MapError> {
        if let Some(file) = self.file.get() {
            return Ok(file);
        }

        log::debug!("Opening {}", self.path.display());
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_SYNC)
            .open(&self.path)
            .context(OpenMemoryDeviceSnafu { path: &self.path })?;

        Ok(self.file.get_or_init(|| file))
    }

    /// Maps the 4 KiB block starting at the physical address `base`.
    pub fn map<RB>(&self, base: u64) -> Result<Window<RB>, MapError> {
        let file = self.file()?;

        // SAFETY: The mapping is device memory, not a file that others could truncate.
        // All accesses go through volatile register reads and writes.
        let map = unsafe {
            MmapOptions::new()
                .offset(base)
                .len(BLOCK_SIZE)
                .map_mut(file)
        }
        .context(MapRegisterBlockSnafu { base })?;

        log::debug!("Mapped register block {:#010x}", base);
        Ok(Window::new(map))
    }
}

/// A mapped register block of type `RB`.
///
/// Dereferences to the register block. The block gets unmapped when the window is dropped.
pub struct Window<RB> {
    ptr: NonNull<RB>,
    _map: MmapMut,
    _block: PhantomData<RB>,
}

impl<RB> Window<RB> {
    fn new(mut map: MmapMut) -> Self {
        assert!(mem::size_of::<RB>() <= map.len());
        assert_eq!(map.as_ptr().align_offset(mem::align_of::<RB>()), 0);

        let ptr = NonNull::from(&mut map[..]).cast::<RB>();

        Self {
            ptr,
            _map: map,
            _block: PhantomData,
        }
    }

    /// A window backed by zeroed anonymous memory instead of hardware.
    pub fn detached() -> Result<Self, MapError> {
        let map = MmapOptions::new()
            .len(BLOCK_SIZE)
            .map_anon()
            .context(AllocateBlockSnafu)?;
        Ok(Self::new(map))
    }
}

// SAFETY: The window owns its mapping; nothing else aliases it.
unsafe impl<RB> Send for Window<RB> {}

impl<RB> Deref for Window<RB> {
    type Target = RB;

    fn deref(&self) -> &RB {
        // SAFETY: The pointer is aligned, the block fits into the mapping (see `new`),
        // and the mapping lives as long as `self`.
        // Register blocks consist of interior mutable registers only.
        unsafe { self.ptr.as_ref() }
    }
}

impl<RB> std::fmt::Debug for Window<RB> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("block", &core::any::type_name::<RB>())
            .field("ptr", &self.ptr)
            .finish()
    }
}

/// All register blocks used by the driver.
#[derive(Debug)]
pub struct Registers {
    /// The GPIO controller.
    pub gpio: Window<gpio::RegisterBlock>,
    /// The PWM controller.
    pub pwm: Window<pwm::RegisterBlock>,
    /// The clock manager.
    pub clock: Window<clock::RegisterBlock>,
    /// The DMA controller.
    pub dma: Window<dma::RegisterBlock>,
}

impl Registers {
    /// Maps all register blocks of `platform` through `device`.
    pub fn map(device: &MemoryDevice, platform: &Platform) -> Result<Self, MapError> {
        log::debug!(
            "Mapping registers at peripheral base {:#010x}",
            platform.peripheral_base
        );

        Ok(Self {
            gpio: device.map(platform.gpio_base())?,
            pwm: device.map(platform.pwm_base())?,
            clock: device.map(platform.clock_base())?,
            dma: device.map(platform.dma_base())?,
        })
    }

    /// Register blocks backed by plain memory.
    ///
    /// Writes stick and reads return whatever was written last; no hardware is touched.
    pub fn detached() -> Result<Self, MapError> {
        Ok(Self {
            gpio: Window::detached()?,
            pwm: Window::detached()?,
            clock: Window::detached()?,
            dma: Window::detached()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detached_blocks_start_zeroed() {
        let registers = Registers::detached().unwrap();
        assert_eq!(registers.pwm.CTL.read(), 0);
        assert_eq!(registers.clock.PWMCTL.read(), 0);
        assert_eq!(registers.dma.ENABLE.read(), 0);
    }

    #[test]
    fn missing_memory_device() {
        let device = MemoryDevice::new("/nonexistent/mem");
        assert!(!device.is_open());

        let err = device.map::<pwm::RegisterBlock>(0).unwrap_err();
        assert!(matches!(err, MapError::OpenMemoryDevice { .. }));
        assert!(!device.is_open());
    }

    #[test]
    fn register_blocks_fit_into_a_page() {
        assert!(mem::size_of::<gpio::RegisterBlock>() <= BLOCK_SIZE);
        assert!(mem::size_of::<pwm::RegisterBlock>() <= BLOCK_SIZE);
        assert_eq!(mem::size_of::<clock::RegisterBlock>(), 42 * 4);
        assert!(mem::size_of::<dma::RegisterBlock>() <= BLOCK_SIZE);
    }
}
