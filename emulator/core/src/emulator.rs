use femtos::Instant;
use gbe_host::{KeyEvent, Surface};

use crate::error::Error;
use crate::input::{InputTranslator, UnmappedKeys};
use crate::lifecycle::{Lifecycle, ScreenDescriptor};
use crate::native::{InstanceHandle, NativeModule, StepMode};
use crate::render::RenderPipeline;
use crate::stats::RenderStats;


pub const DEFAULT_SCALE: u32 = 4;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EmulatorOptions {
    /// Integer factor applied to both axes when presenting
    pub scale: u32,
    pub unmapped_keys: UnmappedKeys,
    pub step_mode: StepMode,
}

impl Default for EmulatorOptions {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            unmapped_keys: UnmappedKeys::default(),
            step_mode: StepMode::default(),
        }
    }
}

/// The controller for one native core.
///
/// Owns the module along with everything that refers into it.  At most one rom is running at a
/// time, and whatever is running is unloaded when the emulator is dropped.
pub struct Emulator<M: NativeModule> {
    module: M,
    lifecycle: Lifecycle,
    render: RenderPipeline,
    input: InputTranslator,
}

impl<M: NativeModule> Emulator<M> {
    pub fn new(module: M, options: EmulatorOptions) -> Self {
        Self {
            module,
            lifecycle: Lifecycle::default(),
            render: RenderPipeline::new(options.scale, options.step_mode),
            input: InputTranslator::new(options.unmapped_keys),
        }
    }

    /// Starts running `rom`, replacing anything already running, and resizes `surface` to
    /// the core's screen times the scale factor
    pub fn load_rom<S: Surface>(&mut self, rom: &[u8], surface: &mut S) -> Result<ScreenDescriptor, Error> {
        let screen = self.lifecycle.load(&mut self.module, rom, surface, self.render.scale())?;
        self.render.reset(screen.width, screen.height);
        Ok(screen)
    }

    pub fn unload(&mut self) -> Result<(), Error> {
        self.lifecycle.unload(&mut self.module)
    }

    /// Runs and presents one frame.  Returns `Ok(false)` without touching the core if no rom
    /// is loaded.
    pub fn tick<S: Surface>(&mut self, surface: &mut S) -> Result<bool, Error> {
        self.render.tick(&mut self.module, self.lifecycle.current(), surface)
    }

    pub fn on_press(&mut self, event: &KeyEvent) -> Result<(), Error> {
        let handle = self.lifecycle.handle();
        self.input.on_press(&mut self.module, handle, event)
    }

    pub fn on_release(&mut self, event: &KeyEvent) -> Result<(), Error> {
        let handle = self.lifecycle.handle();
        self.input.on_release(&mut self.module, handle, event)
    }

    /// Dispatches to `on_press` or `on_release` depending on the event's state
    pub fn on_key(&mut self, event: &KeyEvent) -> Result<(), Error> {
        if event.state {
            self.on_press(event)
        } else {
            self.on_release(event)
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.lifecycle.is_loaded()
    }

    pub fn handle(&self) -> Option<InstanceHandle> {
        self.lifecycle.handle()
    }

    pub fn screen(&self) -> Option<ScreenDescriptor> {
        self.lifecycle.screen()
    }

    pub fn scale(&self) -> u32 {
        self.render.scale()
    }

    pub fn stats(&self) -> &RenderStats {
        self.render.stats()
    }

    /// The presentation time of the last frame produced
    pub fn clock(&self) -> Instant {
        self.render.clock()
    }

    pub fn module(&self) -> &M {
        &self.module
    }
}

impl<M: NativeModule> Drop for Emulator<M> {
    fn drop(&mut self) {
        if let Err(err) = self.unload() {
            log::error!("error while shutting down: {}", err);
        }
    }
}
