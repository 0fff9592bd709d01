mod error;
mod emulator;
mod input;
mod lifecycle;
mod native;
mod render;
mod stats;

pub mod driver;
#[cfg(any(test, feature = "dummy"))]
pub mod dummy;
pub mod memory;

pub use crate::driver::{FrameDriver, REFRESH_RATE};
pub use crate::emulator::{Emulator, EmulatorOptions, DEFAULT_SCALE};
pub use crate::error::Error;
pub use crate::input::{InputTranslator, UnmappedKeys, map_key};
pub use crate::lifecycle::{Lifecycle, LoadedRom, ScreenDescriptor};
pub use crate::memory::{PixelView, Region};
pub use crate::native::{Address, InstanceHandle, NativeModule, StepMode};
pub use crate::render::RenderPipeline;
pub use crate::stats::{AverageTimer, RenderStats};
