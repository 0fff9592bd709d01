use std::ops::Range;
use std::num::NonZeroU32;

use gbe_host::Frame;

use crate::error::Error;
use crate::native::{Address, NativeModule};


/// A block of native linear memory owned by the host.
///
/// Regions can only be made by [`allocate`] and are consumed by [`release`], so a block can't
/// be freed twice or freed without having been allocated.
#[derive(Debug, PartialEq, Eq)]
pub struct Region {
    addr: NonZeroU32,
    len: u32,
}

impl Region {
    pub fn addr(&self) -> Address {
        self.addr.get()
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Copies `bytes` into a new block of native memory sized exactly to fit them
pub fn allocate<M: NativeModule>(module: &mut M, bytes: &[u8]) -> Result<Region, Error> {
    let len = u32::try_from(bytes.len()).map_err(|_| Error::OutOfMemory(bytes.len()))?;
    let addr = NonZeroU32::new(module.malloc(len)?).ok_or(Error::OutOfMemory(bytes.len()))?;
    let region = Region {
        addr,
        len,
    };

    if let Err(err) = write(module, region.addr(), bytes) {
        if let Err(free_err) = module.free(region.addr()) {
            log::error!("unable to free native block at {:#010x}: {}", region.addr(), free_err);
        }
        return Err(err);
    }

    log::debug!("allocated {} bytes of native memory at {:#010x}", region.len, region.addr());
    Ok(region)
}

/// Returns a region to the native allocator
pub fn release<M: NativeModule>(module: &mut M, region: Region) -> Result<(), Error> {
    log::debug!("releasing {} bytes of native memory at {:#010x}", region.len, region.addr());
    module.free(region.addr())
}

pub fn write<M: NativeModule>(module: &mut M, addr: Address, data: &[u8]) -> Result<(), Error> {
    let memory = module.memory_mut();
    let range = checked_range(memory.len(), addr, data.len())?;
    memory[range].copy_from_slice(data);
    Ok(())
}

/// Borrows `len` bytes of native memory starting at `addr`.
///
/// The view holds a shared borrow of the module, so nothing can step or destroy the core
/// while it's alive.
pub fn view<M: NativeModule>(module: &M, addr: Address, len: usize) -> Result<PixelView<'_>, Error> {
    let memory = module.memory();
    let range = checked_range(memory.len(), addr, len)?;
    Ok(PixelView(&memory[range]))
}

fn checked_range(size: usize, addr: Address, len: usize) -> Result<Range<usize>, Error> {
    let start = addr as usize;
    match start.checked_add(len) {
        Some(end) if end <= size => Ok(start..end),
        _ => Err(Error::OutOfBounds { addr, len, size }),
    }
}


/// A short-lived, bounded window onto a frame in native memory
pub struct PixelView<'a>(&'a [u8]);

impl<'a> PixelView<'a> {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.0
    }

    /// Copies the view into host-owned storage, returning `false` if the sizes don't agree
    pub fn copy_into(&self, frame: &mut Frame) -> bool {
        frame.copy_from_rgba8(self.0)
    }
}
