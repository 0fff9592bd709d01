use gbe_host::Surface;

use crate::error::Error;
use crate::memory::{self, Region};
use crate::native::{InstanceHandle, NativeModule};


/// The resolution of the core's screen, queried once per instance
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ScreenDescriptor {
    pub width: u32,
    pub height: u32,
}

impl ScreenDescriptor {
    /// The length in bytes of one packed RGBA8 frame
    pub fn frame_len(&self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(gbe_host::RGBA8_BYTES)
    }

    pub fn scaled(&self, scale: u32) -> Option<(u32, u32)> {
        Some((self.width.checked_mul(scale)?, self.height.checked_mul(scale)?))
    }
}

/// A running instance together with the rom buffer it was created from
#[derive(Debug)]
pub struct LoadedRom {
    handle: InstanceHandle,
    rom: Region,
    screen: ScreenDescriptor,
}

impl LoadedRom {
    pub fn handle(&self) -> InstanceHandle {
        self.handle
    }

    pub fn rom(&self) -> &Region {
        &self.rom
    }

    pub fn screen(&self) -> ScreenDescriptor {
        self.screen
    }
}

/// Owns the instance handle and the rom buffer, which are always either both present or
/// both absent
#[derive(Debug, Default)]
pub enum Lifecycle {
    #[default]
    Empty,
    Loaded(LoadedRom),
}

impl Lifecycle {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Lifecycle::Loaded(_))
    }

    pub fn current(&self) -> Option<&LoadedRom> {
        match self {
            Lifecycle::Empty => None,
            Lifecycle::Loaded(loaded) => Some(loaded),
        }
    }

    pub fn handle(&self) -> Option<InstanceHandle> {
        self.current().map(LoadedRom::handle)
    }

    pub fn screen(&self) -> Option<ScreenDescriptor> {
        self.current().map(LoadedRom::screen)
    }

    /// Replaces whatever is running with a new instance of `rom`, and sizes `surface` to fit it.
    ///
    /// On any failure the lifecycle is left `Empty` with nothing resident in native memory.
    pub fn load<M, S>(
        &mut self,
        module: &mut M,
        rom: &[u8],
        surface: &mut S,
        scale: u32,
    ) -> Result<ScreenDescriptor, Error>
    where
        M: NativeModule,
        S: Surface,
    {
        self.unload(module)?;

        if rom.is_empty() {
            return Err(Error::EmptyRom);
        }

        let region = memory::allocate(module, rom)?;
        let handle = match module.create(region.addr(), region.len()) {
            Ok(Some(handle)) => handle,
            Ok(None) => {
                discard(module, region);
                return Err(Error::CreateFailed(rom.len()));
            },
            Err(err) => {
                discard(module, region);
                return Err(err);
            },
        };

        match configure(module, handle, surface, scale) {
            Ok(screen) => {
                log::info!(
                    "loaded {} byte rom as instance {}, screen is {}x{}",
                    rom.len(),
                    handle.raw(),
                    screen.width,
                    screen.height
                );
                *self = Lifecycle::Loaded(LoadedRom {
                    handle,
                    rom: region,
                    screen,
                });
                Ok(screen)
            },
            Err(err) => {
                if let Err(teardown_err) = teardown(module, handle, region) {
                    log::error!("while abandoning instance {}: {}", handle.raw(), teardown_err);
                }
                Err(err)
            },
        }
    }

    /// Destroys the running instance and then frees its rom buffer.  Does nothing when empty.
    pub fn unload<M: NativeModule>(&mut self, module: &mut M) -> Result<(), Error> {
        match std::mem::take(self) {
            Lifecycle::Empty => Ok(()),
            Lifecycle::Loaded(LoadedRom { handle, rom, .. }) => {
                log::info!("unloading instance {}", handle.raw());
                teardown(module, handle, rom)
            },
        }
    }
}

fn configure<M, S>(
    module: &mut M,
    handle: InstanceHandle,
    surface: &mut S,
    scale: u32,
) -> Result<ScreenDescriptor, Error>
where
    M: NativeModule,
    S: Surface,
{
    let screen = ScreenDescriptor {
        width: module.screen_width(handle)?,
        height: module.screen_height(handle)?,
    };

    // a frame bigger than native memory could never be read out
    if screen.frame_len() > module.memory().len() {
        return Err(Error::InvalidResolution(screen.width, screen.height));
    }

    let (width, height) = match screen.scaled(scale) {
        Some((width, height)) if width > 0 && height > 0 => (width, height),
        _ => return Err(Error::InvalidResolution(screen.width, screen.height)),
    };

    surface.resize(width, height)?;
    Ok(screen)
}

fn teardown<M: NativeModule>(module: &mut M, handle: InstanceHandle, rom: Region) -> Result<(), Error> {
    if let Err(err) = module.destroy(handle) {
        // the instance may still be using the buffer, so it's leaked instead of freed
        log::error!(
            "failed to destroy instance {}, leaking {} bytes at {:#010x}",
            handle.raw(),
            rom.len(),
            rom.addr()
        );
        return Err(err);
    }
    memory::release(module, rom)
}

fn discard<M: NativeModule>(module: &mut M, region: Region) {
    if let Err(err) = memory::release(module, region) {
        log::error!("unable to release rom buffer: {}", err);
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use gbe_host::{FrameSurface, PixelEncoding};
    use crate::dummy::{Call, DummyModule};

    fn surface() -> FrameSurface {
        FrameSurface::new(PixelEncoding::RGBA)
    }

    #[test]
    fn load_sizes_the_surface() {
        let mut module = DummyModule::new(0x10000);
        let mut surface = surface();
        let mut lifecycle = Lifecycle::default();

        let screen = lifecycle.load(&mut module, &[0x42; 256], &mut surface, 4).unwrap();
        assert_eq!(screen, ScreenDescriptor { width: 160, height: 144 });
        assert_eq!(gbe_host::Surface::size(&surface), (640, 576));
        assert_eq!(lifecycle.screen(), Some(screen));
        assert_eq!(module.live_blocks(), 1);
    }

    #[test]
    fn resolution_larger_than_memory_is_rejected() {
        let mut module = DummyModule::new(0x10000).with_resolution(0xFFFF, 0xFFFF);
        let mut surface = surface();
        let mut lifecycle = Lifecycle::default();

        let result = lifecycle.load(&mut module, &[1; 16], &mut surface, 1);
        assert!(matches!(result, Err(Error::InvalidResolution(0xFFFF, 0xFFFF))));
        assert!(!lifecycle.is_loaded());
        assert_eq!(gbe_host::Surface::size(&surface), (0, 0));
        assert_eq!(module.live_blocks(), 0);
        assert_eq!(module.live_instances(), 0);
    }

    #[test]
    fn zero_resolution_abandons_the_instance() {
        let mut module = DummyModule::new(0x10000).with_resolution(0, 144);
        let mut lifecycle = Lifecycle::default();

        let result = lifecycle.load(&mut module, &[1; 16], &mut surface(), 4);
        assert!(matches!(result, Err(Error::InvalidResolution(0, 144))));
        assert!(!lifecycle.is_loaded());
        assert_eq!(module.live_blocks(), 0);
        assert_eq!(module.live_instances(), 0);
    }

    #[test]
    fn surface_refusal_abandons_the_instance() {
        let mut module = DummyModule::new(0x10000);
        let mut surface = surface().with_max_size(320, 288);
        let mut lifecycle = Lifecycle::default();

        let result = lifecycle.load(&mut module, &[1; 16], &mut surface, 4);
        assert!(matches!(result, Err(Error::Surface(_))));
        assert!(!lifecycle.is_loaded());
        assert_eq!(module.live_blocks(), 0);
        assert_eq!(module.live_instances(), 0);
    }

    #[test]
    fn failed_destroy_leaks_the_buffer() {
        let mut module = DummyModule::new(0x10000);
        let mut lifecycle = Lifecycle::default();
        lifecycle.load(&mut module, &[1; 16], &mut surface(), 1).unwrap();

        module.fail_next_destroy();
        assert!(matches!(lifecycle.unload(&mut module), Err(Error::Native(_))));
        assert!(!lifecycle.is_loaded());
        assert_eq!(module.live_blocks(), 1);
        assert!(!module.calls().iter().any(|call| matches!(call, Call::Free(_))));
    }
}
