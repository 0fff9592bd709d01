use std::num::NonZeroU32;

use gbe_host::{Button, ButtonState};

use crate::error::Error;


/// A byte offset into the native core's linear memory
pub type Address = u32;

/// A live emulator session inside the native core.
///
/// The core signals failure with a null handle, which can never be represented here, so "no
/// instance" is always `Option::None` and never a magic value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct InstanceHandle(NonZeroU32);

impl InstanceHandle {
    pub fn from_raw(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }

    pub fn raw(self) -> u32 {
        self.0.get()
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum StepMode {
    /// Run until the next vertical sync, i.e. one whole frame
    #[default]
    VSync,
    /// Run a single instruction
    Instruction,
}

impl StepMode {
    pub fn id(self) -> i32 {
        match self {
            StepMode::VSync => 0,
            StepMode::Instruction => 1,
        }
    }
}

/// The function table and linear memory of a pre-compiled emulator core.
///
/// Every method maps onto one exported native function.  Failures of the call itself (a trap,
/// a missing export) come back as `Error::Native`; the core's own result values are passed
/// through untouched for the caller to interpret.
pub trait NativeModule {
    /// The whole of linear memory
    fn memory(&self) -> &[u8];
    fn memory_mut(&mut self) -> &mut [u8];

    /// Returns the address of a new block of `len` bytes, or 0 if the allocator is exhausted
    fn malloc(&mut self, len: u32) -> Result<Address, Error>;
    fn free(&mut self, addr: Address) -> Result<(), Error>;

    /// Returns `None` if the core rejected the rom data
    fn create(&mut self, rom: Address, len: u32) -> Result<Option<InstanceHandle>, Error>;
    fn destroy(&mut self, handle: InstanceHandle) -> Result<(), Error>;

    /// Returns the core's status code, where 0 means success
    fn step(&mut self, handle: InstanceHandle, mode: StepMode) -> Result<i32, Error>;

    /// The address of the RGBA8 frame produced by the last step
    fn screen_pointer(&mut self, handle: InstanceHandle) -> Result<Address, Error>;
    fn screen_width(&mut self, handle: InstanceHandle) -> Result<u32, Error>;
    fn screen_height(&mut self, handle: InstanceHandle) -> Result<u32, Error>;

    fn set_button_state(&mut self, handle: InstanceHandle, button: Button, state: ButtonState) -> Result<(), Error>;
}
