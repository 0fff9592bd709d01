use femtos::{Duration, Instant};
use gbe_host::{frame_queue, Frame, FrameReceiver, FrameSender, PixelEncoding, Surface};

use crate::driver::REFRESH_RATE;
use crate::error::Error;
use crate::lifecycle::LoadedRom;
use crate::memory;
use crate::native::{NativeModule, StepMode};
use crate::stats::RenderStats;


/// Steps the core one frame at a time and carries each frame out to the display surface.
///
/// Frames pass through an ordered queue on their way to the surface.  Each one is stamped by
/// the pipeline's own frame clock, which advances one refresh period per frame produced.
pub struct RenderPipeline {
    sender: FrameSender,
    receiver: FrameReceiver,
    staging: Frame,
    clock: Instant,
    period: Duration,
    scale: u32,
    step_mode: StepMode,
    stats: RenderStats,
}

impl RenderPipeline {
    pub fn new(scale: u32, step_mode: StepMode) -> Self {
        let (sender, receiver) = frame_queue(1);
        Self {
            sender,
            receiver,
            staging: Frame::default(),
            clock: Instant::START,
            period: REFRESH_RATE.period_duration(),
            scale,
            step_mode,
            stats: RenderStats::default(),
        }
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }

    /// The presentation time of the most recently produced frame
    pub fn clock(&self) -> Instant {
        self.clock
    }

    /// Throws away anything still waiting to be presented and prepares for a new screen size
    pub fn reset(&mut self, width: u32, height: u32) {
        let (sender, receiver) = frame_queue(1);
        receiver.request_encoding(self.sender.encoding());
        self.sender = sender;
        self.receiver = receiver;
        self.staging = Frame::new(width, height, self.sender.encoding());
    }

    /// Runs one frame of the loaded rom and draws it, returning `false` if nothing is loaded
    pub fn tick<M, S>(
        &mut self,
        module: &mut M,
        loaded: Option<&LoadedRom>,
        surface: &mut S,
    ) -> Result<bool, Error>
    where
        M: NativeModule,
        S: Surface,
    {
        let Some(loaded) = loaded else {
            return Ok(false);
        };
        let handle = loaded.handle();
        let screen = loaded.screen();

        self.stats.step_time.start();
        let status = module.step(handle, self.step_mode)?;
        self.stats.step_time.end();
        if status != 0 {
            log::warn!("stepping produced error {}", status);
            self.stats.step_faults += 1;
        }

        let addr = module.screen_pointer(handle)?;
        self.receiver.request_encoding(surface.encoding());
        self.staging.encoding = self.sender.encoding();
        self.staging.set_size(screen.width, screen.height);

        {
            let view = memory::view(module, addr, screen.frame_len())?;
            if !view.copy_into(&mut self.staging) {
                return Err(Error::native(format!(
                    "screen buffer of {} bytes doesn't fit a {}x{} frame",
                    view.len(),
                    screen.width,
                    screen.height
                )));
            }
        }

        self.clock += self.period;
        self.sender.add(self.clock, self.staging.clone());
        self.stats.frames += 1;

        self.present(surface)?;
        Ok(true)
    }

    fn present<S: Surface>(&mut self, surface: &mut S) -> Result<(), Error> {
        while let Some((_, frame)) = self.receiver.next() {
            surface.draw_scaled(&frame, self.scale)?;
        }
        Ok(())
    }

    /// The encoding most recently requested by the surface
    pub fn encoding(&self) -> PixelEncoding {
        self.sender.encoding()
    }
}
