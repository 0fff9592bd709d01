use std::fs;
use std::path::Path;
use std::convert::Infallible;
use std::error::Error as StdError;
use std::time::Duration;

use minifb::{self, Key as MiniKey, KeyRepeat};
use clap::{Command, Arg, ArgAction, ArgMatches};

use gbe_core::{Emulator, EmulatorOptions, Error, FrameDriver, NativeModule, UnmappedKeys};
use gbe_host::{
    Host, HostError, HostEvent, EventSender, Frame, FrameSurface, InputTarget, KeyEvent, PixelEncoding, Surface,
};

mod keys;

use crate::keys::map_key;


const TITLE: &str = "GBE";
const WIDTH: u32 = 160;
const HEIGHT: u32 = 144;


pub fn new(name: &'static str) -> Command {
    Command::new(name)
        .arg(
            Arg::new("core")
                .short('c')
                .long("core")
                .value_name("FILE")
                .required(true)
                .help("Compiled gbhw core to run (.wasm)"),
        )
        .arg(Arg::new("ROM").value_name("ROM").help("ROM image to load at start-up"))
        .arg(
            Arg::new("scale")
                .short('s')
                .long("scale")
                .value_parser(clap::value_parser!(u32).range(1..=16))
                .default_value("4")
                .help("Scale the screen"),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .help("Set the type of log messages to print"),
        )
        .arg(
            Arg::new("symbol-prefix")
                .long("symbol-prefix")
                .default_value("")
                .help("Prefix of the core's exported function names"),
        )
        .arg(
            Arg::new("legacy-unmapped-keys")
                .long("legacy-unmapped-keys")
                .action(ArgAction::SetTrue)
                .help("Keys without a button press the A button"),
        )
}

pub fn emulator_options(matches: &ArgMatches) -> EmulatorOptions {
    let mut options = EmulatorOptions::default();
    if let Some(scale) = matches.get_one::<u32>("scale") {
        options.scale = *scale;
    }
    if matches.get_flag("legacy-unmapped-keys") {
        options.unmapped_keys = UnmappedKeys::PrimaryButton;
    }
    options
}

pub fn init_logger(matches: &ArgMatches) {
    let log_level = match matches.get_one("log-level").map(|s: &String| s.as_str()) {
        Some("trace") => log::Level::Trace,
        Some("debug") => log::Level::Debug,
        Some("info") => log::Level::Info,
        Some("warn") => log::Level::Warn,
        Some("error") => log::Level::Error,
        _ => log::Level::Warn,
    };

    if let Err(err) = simple_logger::SimpleLogger::new()
        .with_level(log_level.to_level_filter())
        .without_timestamps()
        .init()
    {
        eprintln!("unable to start logging: {}", err);
    }
}

/// Opens the window and runs `init`'s emulator in it until the window is closed
pub fn run<M, I>(matches: ArgMatches, init: I) -> Result<(), Error>
where
    M: NativeModule,
    I: FnOnce(&ArgMatches) -> Result<Emulator<M>, Error>,
{
    init_logger(&matches);

    let mut emulator = init(&matches)?;
    let mut frontend = MiniFrontend::new(emulator.scale())?;
    let mut driver = FrameDriver::register(&mut frontend)?;

    if let Some(filename) = matches.get_one::<String>("ROM") {
        frontend.load_file(Path::new(filename));
    }

    driver.run(&mut emulator, &mut frontend)
}


/// A minifb window that is both the display surface and the source of refresh and key events.
///
/// Frames are drawn into a backing surface and handed to the window on the next refresh.
pub struct MiniFrontend {
    window: minifb::Window,
    surface: FrameSurface,
    events: Option<EventSender<HostEvent>>,
    dirty: bool,
    frames: u64,
}

impl MiniFrontend {
    pub fn new(scale: u32) -> Result<Self, HostError<minifb::Error>> {
        let (width, height) = (WIDTH * scale, HEIGHT * scale);
        let mut surface = FrameSurface::new(PixelEncoding::ARGB);
        surface.resize(width, height).map_err(convert_error)?;

        Ok(Self {
            window: open_window(width, height)?,
            surface,
            events: None,
            dirty: true,
            frames: 0,
        })
    }

    /// Reads a rom from disk and queues it for loading
    pub fn load_file(&mut self, path: &Path) {
        match fs::read(path) {
            Ok(data) => {
                log::info!("loading rom {}", path.display());
                self.send(HostEvent::LoadRom(data));
            },
            Err(err) => self.report_error(&err),
        }
    }

    fn pick_rom(&mut self) {
        let picked = rfd::FileDialog::new()
            .set_title("Open ROM")
            .add_filter("Game Boy ROM", &["gb", "gbc"])
            .pick_file();

        if let Some(path) = picked {
            self.load_file(&path);
        }
    }

    fn send(&self, event: HostEvent) {
        if let Some(sender) = self.events.as_ref() {
            sender.send(event);
        }
    }

    fn check_key(&mut self, key: MiniKey, state: bool, target: InputTarget) {
        match (key, state) {
            (MiniKey::Escape, true) => self.send(HostEvent::Quit),
            (MiniKey::F1, true) => self.pick_rom(),
            (MiniKey::F2, true) => self.send(HostEvent::Unload),
            (MiniKey::Escape | MiniKey::F1 | MiniKey::F2, false) => {},
            _ => self.send(HostEvent::Key(KeyEvent::new(map_key(key), state).with_target(target))),
        }
    }

    fn present(&mut self) -> Result<(), HostError<minifb::Error>> {
        if self.dirty {
            self.dirty = false;
            let frame = self.surface.backing();
            self.window
                .update_with_buffer(&frame.bitmap, frame.width as usize, frame.height as usize)
                .map_err(HostError::Specific)
        } else {
            self.window.update();
            Ok(())
        }
    }
}

fn open_window(width: u32, height: u32) -> Result<minifb::Window, HostError<minifb::Error>> {
    let mut window = minifb::Window::new(TITLE, width as usize, height as usize, minifb::WindowOptions::default())
        .map_err(HostError::Specific)?;

    // Limit to max ~60 fps update rate
    window.limit_update_rate(Some(Duration::from_micros(16600)));
    Ok(window)
}

fn convert_error(err: HostError<Infallible>) -> HostError<minifb::Error> {
    match err {
        HostError::EventsNotSupported => HostError::EventsNotSupported,
        HostError::EventsAlreadyRegistered => HostError::EventsAlreadyRegistered,
        HostError::SizeNotSupported(width, height) => HostError::SizeNotSupported(width, height),
        HostError::FrameMismatch { frame, expected } => HostError::FrameMismatch { frame, expected },
        HostError::Specific(never) => match never {},
    }
}

impl Host for MiniFrontend {
    type Error = minifb::Error;

    fn wait_for_refresh(&mut self) -> Result<bool, HostError<minifb::Error>> {
        self.present()?;
        if !self.window.is_open() {
            return Ok(false);
        }

        let target = if self.window.is_active() {
            InputTarget::Surface
        } else {
            InputTarget::Elsewhere
        };

        let pressed = self.window.get_keys_pressed(KeyRepeat::No);
        let released = self.window.get_keys_released();
        for key in pressed {
            self.check_key(key, true, target);
        }
        for key in released {
            self.check_key(key, false, target);
        }
        Ok(true)
    }

    fn register_events(&mut self, sender: EventSender<HostEvent>) -> Result<(), HostError<minifb::Error>> {
        if self.events.is_some() {
            return Err(HostError::EventsAlreadyRegistered);
        }
        self.events = Some(sender);
        Ok(())
    }

    fn frame_complete(&mut self, frames: u64) {
        if frames != self.frames {
            self.frames = frames;
            self.window.set_title(&format!("{}: Frame Count: {}", TITLE, frames));
        }
    }

    fn report_error(&mut self, err: &dyn StdError) {
        log::error!("{}", err);
        self.window.set_title(&format!("{}: {}", TITLE, err));
    }
}

impl Surface for MiniFrontend {
    type Error = minifb::Error;

    fn resize(&mut self, width: u32, height: u32) -> Result<(), HostError<minifb::Error>> {
        if (width, height) != self.surface.size() {
            self.window = open_window(width, height)?;
        }
        self.surface.resize(width, height).map_err(convert_error)?;
        self.dirty = true;
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        self.surface.size()
    }

    fn encoding(&self) -> PixelEncoding {
        self.surface.encoding()
    }

    fn draw_scaled(&mut self, frame: &Frame, scale: u32) -> Result<(), HostError<minifb::Error>> {
        self.surface.draw_scaled(frame, scale).map_err(convert_error)?;
        self.dirty = true;
        Ok(())
    }
}
