use femtos::{Duration, Frequency, Instant};
use gbe_host::{event_queue, EventReceiver, Host, HostEvent, Surface};

use crate::emulator::Emulator;
use crate::error::Error;
use crate::native::NativeModule;


pub const REFRESH_RATE: Frequency = Frequency::from_hz(60);

/// Calls the emulator once per display refresh, for as long as the host keeps refreshing.
///
/// Host events are only ever handled between ticks, so a rom load never lands part way through
/// a frame.
pub struct FrameDriver {
    events: EventReceiver<HostEvent>,
    clock: Instant,
    period: Duration,
    wakes: u64,
    running: bool,
}

impl FrameDriver {
    pub fn new(events: EventReceiver<HostEvent>) -> Self {
        Self {
            events,
            clock: Instant::START,
            period: REFRESH_RATE.period_duration(),
            wakes: 0,
            running: true,
        }
    }

    /// Creates a driver whose events come from `host`
    pub fn register<H: Host>(host: &mut H) -> Result<Self, Error> {
        let (sender, receiver) = event_queue();
        host.register_events(sender)?;
        Ok(Self::new(receiver))
    }

    pub fn with_refresh_rate(mut self, rate: Frequency) -> Self {
        self.period = rate.period_duration();
        self
    }

    /// The refresh clock of the most recent wake
    pub fn clock(&self) -> Instant {
        self.clock
    }

    pub fn wakes(&self) -> u64 {
        self.wakes
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Handles pending events and then ticks once.  Returns `false` once a quit was requested.
    pub fn wake<M, H>(&mut self, emulator: &mut Emulator<M>, host: &mut H) -> bool
    where
        M: NativeModule,
        H: Host + Surface,
    {
        self.handle_events(emulator, host);
        if !self.running {
            return false;
        }

        self.wakes += 1;
        self.clock += self.period;
        if let Err(err) = emulator.tick(host) {
            log::error!("error while running frame: {}", err);
        }

        host.frame_complete(emulator.stats().frames);
        true
    }

    /// Wakes on every refresh until the host goes away or a quit is requested
    pub fn run<M, H>(&mut self, emulator: &mut Emulator<M>, host: &mut H) -> Result<(), Error>
    where
        M: NativeModule,
        H: Host + Surface,
    {
        while self.running && host.wait_for_refresh()? {
            self.wake(emulator, host);
        }
        log::info!("frame driver stopped after {} wakes ({:?})", self.wakes, self.clock);
        log::info!("{}", emulator.stats());
        Ok(())
    }

    fn handle_events<M, H>(&mut self, emulator: &mut Emulator<M>, host: &mut H)
    where
        M: NativeModule,
        H: Host + Surface,
    {
        while let Some(event) = self.events.receive() {
            match event {
                HostEvent::Key(key) => {
                    if let Err(err) = emulator.on_key(&key) {
                        log::error!("error while sending {:?}: {}", key.key, err);
                    }
                },
                HostEvent::LoadRom(rom) => {
                    if let Err(err) = emulator.load_rom(&rom, host) {
                        log::error!("unable to load rom: {}", err);
                        host.report_error(&err);
                    }
                },
                HostEvent::Unload => {
                    if let Err(err) = emulator.unload() {
                        log::error!("unable to unload rom: {}", err);
                    }
                },
                HostEvent::Quit => {
                    self.running = false;
                    return;
                },
            }
        }
    }
}
