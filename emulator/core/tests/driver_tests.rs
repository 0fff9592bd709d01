use std::convert::Infallible;
use std::error::Error as StdError;

use femtos::{Frequency, Instant};
use gbe_host::{EventSender, Frame, FrameSurface, Host, HostError, HostEvent, Key, KeyEvent, PixelEncoding, Surface};

use gbe_core::{Emulator, EmulatorOptions, FrameDriver, REFRESH_RATE};
use gbe_core::dummy::{Call, DummyModule};


/// A host that refreshes a fixed number of times, sending scripted events before given refreshes
struct ScriptedHost {
    surface: FrameSurface,
    events: Option<EventSender<HostEvent>>,
    script: Vec<(u64, HostEvent)>,
    refreshes: u64,
    limit: u64,
    frames: Vec<u64>,
    errors: Vec<String>,
}

impl ScriptedHost {
    fn new(limit: u64, script: Vec<(u64, HostEvent)>) -> Self {
        Self {
            surface: FrameSurface::new(PixelEncoding::RGBA),
            events: None,
            script,
            refreshes: 0,
            limit,
            frames: vec![],
            errors: vec![],
        }
    }
}

impl Host for ScriptedHost {
    type Error = Infallible;

    fn wait_for_refresh(&mut self) -> Result<bool, HostError<Infallible>> {
        if self.refreshes >= self.limit {
            return Ok(false);
        }
        self.refreshes += 1;

        if let Some(sender) = self.events.as_ref() {
            for (_, event) in self.script.iter().filter(|(at, _)| *at == self.refreshes) {
                sender.send(event.clone());
            }
        }
        Ok(true)
    }

    fn register_events(&mut self, sender: EventSender<HostEvent>) -> Result<(), HostError<Infallible>> {
        if self.events.is_some() {
            return Err(HostError::EventsAlreadyRegistered);
        }
        self.events = Some(sender);
        Ok(())
    }

    fn frame_complete(&mut self, frames: u64) {
        self.frames.push(frames);
    }

    fn report_error(&mut self, err: &dyn StdError) {
        self.errors.push(err.to_string());
    }
}

impl Surface for ScriptedHost {
    type Error = Infallible;

    fn resize(&mut self, width: u32, height: u32) -> Result<(), HostError<Infallible>> {
        self.surface.resize(width, height)
    }

    fn size(&self) -> (u32, u32) {
        self.surface.size()
    }

    fn draw_scaled(&mut self, frame: &Frame, scale: u32) -> Result<(), HostError<Infallible>> {
        self.surface.draw_scaled(frame, scale)
    }
}

fn emulator() -> Emulator<DummyModule> {
    Emulator::new(DummyModule::new(0x1_0000).with_resolution(16, 16), EmulatorOptions::default())
}


#[test]
fn ticks_are_no_ops_until_a_rom_arrives() {
    let mut host = ScriptedHost::new(5, vec![(3, HostEvent::LoadRom(vec![0x31; 128]))]);
    let mut emulator = emulator();
    let mut driver = FrameDriver::register(&mut host).unwrap();

    driver.run(&mut emulator, &mut host).unwrap();

    assert_eq!(driver.wakes(), 5);
    assert_eq!(host.frames, vec![0, 0, 1, 2, 3]);
    assert_eq!(host.surface.draws(), 3);
    assert_eq!(host.surface.size(), (64, 64));
    assert_eq!(emulator.stats().step_time.events, 3);
    assert_eq!(emulator.clock(), Instant::START + REFRESH_RATE.period_duration() * 3u32);
}

#[test]
fn load_completes_before_the_next_tick() {
    let mut host = ScriptedHost::new(1, vec![(1, HostEvent::LoadRom(vec![1; 16]))]);
    let mut emulator = emulator();
    let mut driver = FrameDriver::register(&mut host).unwrap();

    driver.run(&mut emulator, &mut host).unwrap();

    let calls = emulator.module().calls();
    let created = calls.iter().position(|call| matches!(call, Call::Create(..))).unwrap();
    let stepped = calls.iter().position(|call| matches!(call, Call::Step(..))).unwrap();
    assert!(created < stepped);
}

#[test]
fn quit_stops_the_loop() {
    let mut host = ScriptedHost::new(100, vec![(2, HostEvent::Quit)]);
    let mut emulator = emulator();
    let mut driver = FrameDriver::register(&mut host).unwrap();

    driver.run(&mut emulator, &mut host).unwrap();
    assert_eq!(driver.wakes(), 1);
    assert!(!driver.is_running());
    assert_eq!(host.refreshes, 2);
}

#[test]
fn failed_loads_are_reported_to_the_host() {
    let mut host = ScriptedHost::new(2, vec![(1, HostEvent::LoadRom(vec![]))]);
    let mut emulator = emulator();
    let mut driver = FrameDriver::register(&mut host).unwrap();

    driver.run(&mut emulator, &mut host).unwrap();
    assert_eq!(host.errors, vec!["rom image is empty".to_string()]);
    assert!(!emulator.is_loaded());
    assert_eq!(driver.wakes(), 2);
}

#[test]
fn keys_and_unload_go_through_the_queue() {
    let script = vec![
        (1, HostEvent::LoadRom(vec![1; 16])),
        (2, HostEvent::Key(KeyEvent::new(Key::Enter, true))),
        (3, HostEvent::Key(KeyEvent::new(Key::Enter, false))),
        (4, HostEvent::Unload),
    ];
    let mut host = ScriptedHost::new(6, script);
    let mut emulator = emulator();
    let mut driver = FrameDriver::register(&mut host).unwrap();

    driver.run(&mut emulator, &mut host).unwrap();

    let buttons: Vec<Call> = emulator
        .module()
        .calls()
        .into_iter()
        .filter(|call| matches!(call, Call::SetButtonState(..)))
        .collect();
    assert_eq!(buttons.len(), 2);
    assert!(!emulator.is_loaded());
    assert_eq!(host.frames, vec![1, 2, 3, 3, 3, 3]);
}

#[test]
fn events_can_only_be_registered_once() {
    let mut host = ScriptedHost::new(0, vec![]);
    assert!(FrameDriver::register(&mut host).is_ok());
    assert!(FrameDriver::register(&mut host).is_err());
}

#[test]
fn clock_advances_one_period_per_wake() {
    let mut host = ScriptedHost::new(3, vec![]);
    let mut emulator = emulator();
    let rate = Frequency::from_hz(50);
    let mut driver = FrameDriver::register(&mut host).unwrap().with_refresh_rate(rate);

    driver.run(&mut emulator, &mut host).unwrap();
    assert_eq!(driver.clock(), Instant::START + rate.period_duration() * 3u32);
}
