//! A scriptable stand-in for a native core, for driving the controller without a real one

use std::rc::Rc;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

use gbe_host::{Button, ButtonState, Pixel};

use crate::error::Error;
use crate::native::{Address, InstanceHandle, NativeModule, StepMode};


/// One call made into the module, in the order it was made
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Malloc(u32),
    Free(Address),
    Create(Address, u32),
    Destroy(u32),
    Step(u32, i32),
    ScreenPointer(u32),
    ScreenWidth(u32),
    ScreenHeight(u32),
    SetButtonState(u32, Button, ButtonState),
}

pub type CallLog = Rc<RefCell<Vec<Call>>>;

const HEAP_START: Address = 0x10;
const ALIGN: u32 = 8;

/// Keeps a heap in a `Vec`, hands out instance handles counting up from 1, and renders a
/// recognizable pattern on every step so frames can be told apart
pub struct DummyModule {
    memory: Vec<u8>,
    heap_size: u32,
    next_alloc: Address,
    blocks: BTreeMap<Address, u32>,

    next_handle: u32,
    instances: BTreeSet<u32>,
    frames: u64,

    resolution: (u32, u32),
    step_status: i32,
    screen_past_end: bool,
    fail_malloc: bool,
    misplace_malloc: bool,
    fail_create: bool,
    fail_destroy: bool,

    calls: CallLog,
}

impl DummyModule {
    pub fn new(heap_size: u32) -> Self {
        Self {
            memory: vec![0; heap_size as usize],
            heap_size,
            next_alloc: HEAP_START,
            blocks: BTreeMap::new(),

            next_handle: 1,
            instances: BTreeSet::new(),
            frames: 0,

            resolution: (160, 144),
            step_status: 0,
            screen_past_end: false,
            fail_malloc: false,
            misplace_malloc: false,
            fail_create: false,
            fail_destroy: false,

            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.resolution = (width, height);
        self
    }

    pub fn with_step_status(mut self, status: i32) -> Self {
        self.step_status = status;
        self
    }

    /// Makes the screen pointer point so close to the end of memory that no frame fits
    pub fn with_screen_past_end(mut self) -> Self {
        self.screen_past_end = true;
        self
    }

    pub fn fail_next_malloc(&mut self) {
        self.fail_malloc = true;
    }

    /// Makes the next allocation hand out a block that runs off the end of memory
    pub fn misplace_next_malloc(&mut self) {
        self.misplace_malloc = true;
    }

    pub fn fail_next_create(&mut self) {
        self.fail_create = true;
    }

    pub fn fail_next_destroy(&mut self) {
        self.fail_destroy = true;
    }

    /// A copy of every call made so far
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// The shared call log, which outlives the module itself
    pub fn call_log(&self) -> CallLog {
        self.calls.clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn live_blocks(&self) -> usize {
        self.blocks.len()
    }

    pub fn live_instances(&self) -> usize {
        self.instances.len()
    }

    /// The bytes of a live block, as the core would see them
    pub fn block(&self, addr: Address) -> Option<&[u8]> {
        let len = *self.blocks.get(&addr)?;
        self.memory.get(addr as usize..(addr + len) as usize)
    }

    /// The pixel the module draws at (x, y) on the given step, counting from 1
    pub fn frame_pixel(&self, frame: u64, x: u32, y: u32) -> Pixel {
        Pixel::Rgba(frame as u8, x as u8, y as u8, 0xFF)
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    fn check_instance(&self, handle: InstanceHandle) -> Result<(), Error> {
        if self.instances.contains(&handle.raw()) {
            Ok(())
        } else {
            Err(Error::native(format!("no such instance {}", handle.raw())))
        }
    }

    fn frame_len(&self) -> usize {
        self.resolution.0 as usize * self.resolution.1 as usize * gbe_host::RGBA8_BYTES
    }

    fn screen_addr(&self) -> Address {
        if self.screen_past_end {
            self.memory.len() as Address - 2
        } else {
            self.heap_size
        }
    }

    /// Grows memory to hold the screen after the heap, as far as a 32-bit address space allows
    fn reserve_screen(&mut self) {
        let end = u32::try_from(self.frame_len()).ok().and_then(|len| self.heap_size.checked_add(len));
        if let Some(end) = end {
            if self.memory.len() < end as usize {
                self.memory.resize(end as usize, 0);
            }
        }
    }

    fn draw_frame(&mut self) {
        let base = self.heap_size as usize;
        let needed = base + self.frame_len();
        if self.memory.len() < needed {
            self.memory.resize(needed, 0);
        }

        let (width, height) = self.resolution;
        for y in 0..height {
            for x in 0..width {
                let Pixel::Rgba(r, g, b, a) = self.frame_pixel(self.frames, x, y) else {
                    continue;
                };
                let offset = base + ((y * width + x) as usize) * gbe_host::RGBA8_BYTES;
                self.memory[offset..offset + 4].copy_from_slice(&[r, g, b, a]);
            }
        }
    }
}

impl NativeModule for DummyModule {
    fn memory(&self) -> &[u8] {
        &self.memory
    }

    fn memory_mut(&mut self) -> &mut [u8] {
        &mut self.memory
    }

    fn malloc(&mut self, len: u32) -> Result<Address, Error> {
        self.record(Call::Malloc(len));
        if std::mem::take(&mut self.fail_malloc) {
            return Ok(0);
        }
        if std::mem::take(&mut self.misplace_malloc) {
            let addr = self.memory.len() as Address - 2;
            self.blocks.insert(addr, len);
            return Ok(addr);
        }

        let addr = self.next_alloc;
        match addr.checked_add(len) {
            Some(end) if end <= self.heap_size => {
                self.next_alloc = (end + ALIGN - 1) & !(ALIGN - 1);
                self.blocks.insert(addr, len);
                Ok(addr)
            },
            _ => Ok(0),
        }
    }

    fn free(&mut self, addr: Address) -> Result<(), Error> {
        self.record(Call::Free(addr));
        match self.blocks.remove(&addr) {
            Some(_) => Ok(()),
            None => Err(Error::native(format!("free of unallocated block {:#010x}", addr))),
        }
    }

    fn create(&mut self, rom: Address, len: u32) -> Result<Option<InstanceHandle>, Error> {
        self.record(Call::Create(rom, len));
        if std::mem::take(&mut self.fail_create) || len == 0 || self.blocks.get(&rom) != Some(&len) {
            return Ok(None);
        }

        let handle = InstanceHandle::from_raw(self.next_handle);
        if let Some(handle) = handle {
            self.instances.insert(handle.raw());
            self.next_handle += 1;
            self.reserve_screen();
        }
        Ok(handle)
    }

    fn destroy(&mut self, handle: InstanceHandle) -> Result<(), Error> {
        self.record(Call::Destroy(handle.raw()));
        if std::mem::take(&mut self.fail_destroy) {
            return Err(Error::native("destroy trapped"));
        }
        self.check_instance(handle)?;
        self.instances.remove(&handle.raw());
        Ok(())
    }

    fn step(&mut self, handle: InstanceHandle, mode: StepMode) -> Result<i32, Error> {
        self.record(Call::Step(handle.raw(), mode.id()));
        self.check_instance(handle)?;
        self.frames += 1;
        self.draw_frame();
        Ok(self.step_status)
    }

    fn screen_pointer(&mut self, handle: InstanceHandle) -> Result<Address, Error> {
        self.record(Call::ScreenPointer(handle.raw()));
        self.check_instance(handle)?;
        Ok(self.screen_addr())
    }

    fn screen_width(&mut self, handle: InstanceHandle) -> Result<u32, Error> {
        self.record(Call::ScreenWidth(handle.raw()));
        self.check_instance(handle)?;
        Ok(self.resolution.0)
    }

    fn screen_height(&mut self, handle: InstanceHandle) -> Result<u32, Error> {
        self.record(Call::ScreenHeight(handle.raw()));
        self.check_instance(handle)?;
        Ok(self.resolution.1)
    }

    fn set_button_state(&mut self, handle: InstanceHandle, button: Button, state: ButtonState) -> Result<(), Error> {
        self.record(Call::SetButtonState(handle.raw(), button, state));
        self.check_instance(handle)
    }
}
