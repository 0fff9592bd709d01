use wasmtime::{Engine, Instance, Linker, Memory, Module, Store, TypedFunc, WasmParams, WasmResults};

use gbe_core::{Address, Emulator, EmulatorOptions, Error, InstanceHandle, NativeModule, StepMode};
use gbe_host::{Button, ButtonState};

use crate::exports::{self, ExportNames};


pub struct GbhwOptions {
    /// Path to the compiled core, either binary or text format
    pub core: String,
    pub exports: ExportNames,
    pub emulator: EmulatorOptions,
}

impl Default for GbhwOptions {
    fn default() -> Self {
        Self {
            core: "binaries/gbhw/gbhw.wasm".to_string(),
            exports: ExportNames::default(),
            emulator: EmulatorOptions::default(),
        }
    }
}

pub fn build_gbhw(options: GbhwOptions) -> Result<Emulator<GbhwModule>, Error> {
    let module = GbhwModule::load(&options.core, &options.exports)?;
    Ok(Emulator::new(module, options.emulator))
}


struct Functions {
    create: TypedFunc<(i32, i32), i32>,
    destroy: TypedFunc<i32, ()>,
    step: TypedFunc<(i32, i32), i32>,
    screen: TypedFunc<i32, i32>,
    screen_width: TypedFunc<i32, i32>,
    screen_height: TypedFunc<i32, i32>,
    set_button_state: TypedFunc<(i32, i32, i32), ()>,
    malloc: TypedFunc<i32, i32>,
    free: TypedFunc<i32, ()>,
}

/// The gbhw core running inside wasmtime
pub struct GbhwModule {
    store: Store<()>,
    memory: Memory,
    functions: Functions,
}

impl GbhwModule {
    pub fn load(path: &str, names: &ExportNames) -> Result<Self, Error> {
        let engine = Engine::default();
        let module = Module::from_file(&engine, path).map_err(native_error)?;
        log::info!("loaded core from {}", path);
        Self::instantiate(&engine, &module, names)
    }

    pub fn from_bytes(bytes: &[u8], names: &ExportNames) -> Result<Self, Error> {
        let engine = Engine::default();
        let module = Module::new(&engine, bytes).map_err(native_error)?;
        Self::instantiate(&engine, &module, names)
    }

    fn instantiate(engine: &Engine, module: &Module, names: &ExportNames) -> Result<Self, Error> {
        let mut store = Store::new(engine, ());
        let mut linker = Linker::new(engine);
        linker
            .func_wrap("env", "emscripten_notify_memory_growth", |_: i32| {})
            .map_err(native_error)?;
        linker.define_unknown_imports_as_traps(module).map_err(native_error)?;
        let instance = linker.instantiate(&mut store, module).map_err(native_error)?;

        if let Some((name, init)) = exports::INITIALIZERS
            .iter()
            .find_map(|name| Some((name, instance.get_typed_func::<(), ()>(&mut store, name).ok()?)))
        {
            log::debug!("running {}", name);
            init.call(&mut store, ()).map_err(native_error)?;
        }

        let memory = instance
            .get_memory(&mut store, exports::MEMORY)
            .ok_or_else(|| Error::native(format!("core has no exported {}", exports::MEMORY)))?;

        let functions = Functions {
            create: typed(&instance, &mut store, &names.create)?,
            destroy: typed(&instance, &mut store, &names.destroy)?,
            step: typed(&instance, &mut store, &names.step)?,
            screen: typed(&instance, &mut store, &names.screen)?,
            screen_width: typed(&instance, &mut store, &names.screen_width)?,
            screen_height: typed(&instance, &mut store, &names.screen_height)?,
            set_button_state: typed(&instance, &mut store, &names.set_button_state)?,
            malloc: typed(&instance, &mut store, &names.malloc)?,
            free: typed(&instance, &mut store, &names.free)?,
        };

        Ok(Self {
            store,
            memory,
            functions,
        })
    }
}

fn typed<P, R>(instance: &Instance, store: &mut Store<()>, name: &str) -> Result<TypedFunc<P, R>, Error>
where
    P: WasmParams,
    R: WasmResults,
{
    instance
        .get_typed_func::<P, R>(&mut *store, name)
        .map_err(|err| Error::native(format!("export {}: {:#}", name, err)))
}

fn native_error(err: wasmtime::Error) -> Error {
    Error::native(format!("{:#}", err))
}

// wasm32 pointers and handles cross the boundary as i32 and are reinterpreted as unsigned
impl NativeModule for GbhwModule {
    fn memory(&self) -> &[u8] {
        self.memory.data(&self.store)
    }

    fn memory_mut(&mut self) -> &mut [u8] {
        self.memory.data_mut(&mut self.store)
    }

    fn malloc(&mut self, len: u32) -> Result<Address, Error> {
        let addr = self.functions.malloc.call(&mut self.store, len as i32).map_err(native_error)?;
        Ok(addr as u32)
    }

    fn free(&mut self, addr: Address) -> Result<(), Error> {
        self.functions.free.call(&mut self.store, addr as i32).map_err(native_error)
    }

    fn create(&mut self, rom: Address, len: u32) -> Result<Option<InstanceHandle>, Error> {
        let raw = self
            .functions
            .create
            .call(&mut self.store, (rom as i32, len as i32))
            .map_err(native_error)?;
        Ok(InstanceHandle::from_raw(raw as u32))
    }

    fn destroy(&mut self, handle: InstanceHandle) -> Result<(), Error> {
        self.functions
            .destroy
            .call(&mut self.store, handle.raw() as i32)
            .map_err(native_error)
    }

    fn step(&mut self, handle: InstanceHandle, mode: StepMode) -> Result<i32, Error> {
        self.functions
            .step
            .call(&mut self.store, (handle.raw() as i32, mode.id()))
            .map_err(native_error)
    }

    fn screen_pointer(&mut self, handle: InstanceHandle) -> Result<Address, Error> {
        let addr = self.functions.screen.call(&mut self.store, handle.raw() as i32).map_err(native_error)?;
        Ok(addr as u32)
    }

    fn screen_width(&mut self, handle: InstanceHandle) -> Result<u32, Error> {
        let width = self.functions.screen_width.call(&mut self.store, handle.raw() as i32).map_err(native_error)?;
        Ok(width as u32)
    }

    fn screen_height(&mut self, handle: InstanceHandle) -> Result<u32, Error> {
        let height = self.functions.screen_height.call(&mut self.store, handle.raw() as i32).map_err(native_error)?;
        Ok(height as u32)
    }

    fn set_button_state(&mut self, handle: InstanceHandle, button: Button, state: ButtonState) -> Result<(), Error> {
        self.functions
            .set_button_state
            .call(&mut self.store, (handle.raw() as i32, button.id() as i32, state.id() as i32))
            .map_err(native_error)
    }
}
