use std::error::Error;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use femtos::Instant;

use crate::gfx::Frame;
use crate::input::{EventSender, HostEvent};


#[derive(Clone, Debug, thiserror::Error)]
pub enum HostError<E> {
    #[error("This frontend doesn't support input events")]
    EventsNotSupported,
    #[error("This frontend already has an event sender registered")]
    EventsAlreadyRegistered,
    #[error("Surface size {0}x{1} is not supported by this frontend")]
    SizeNotSupported(u32, u32),
    #[error("Frame is {frame:?} but the surface expects {expected:?}")]
    FrameMismatch { frame: (u32, u32), expected: (u32, u32) },
    #[error("{0}")]
    Specific(E),
}


/// The UI side of the controller: the source of display refresh and input events.
///
/// Everything here runs on the same cooperative context as the frame driver, so an
/// implementation never sees a callback while a tick is in progress.
pub trait Host {
    type Error: Error;

    /// Blocks until the next display refresh.  Returns `false` once the display has gone away
    /// and the driver should stop.
    fn wait_for_refresh(&mut self) -> Result<bool, HostError<Self::Error>>;

    fn register_events(&mut self, _sender: EventSender<HostEvent>) -> Result<(), HostError<Self::Error>> {
        Err(HostError::EventsNotSupported)
    }

    /// Called after every driver wake with the total number of frames rendered
    fn frame_complete(&mut self, _frames: u64) {}

    /// Called when an operation the user asked for (loading a ROM, for example) has failed
    fn report_error(&mut self, err: &dyn Error) {
        log::error!("{}", err);
    }
}


/// A 2D drawable display surface
pub trait Surface {
    type Error: Error;

    /// Sets the size of the backing store in pixels
    fn resize(&mut self, width: u32, height: u32) -> Result<(), HostError<Self::Error>>;

    /// The current size of the backing store in pixels
    fn size(&self) -> (u32, u32);

    /// The pixel encoding that frames should be packed in before being drawn
    fn encoding(&self) -> crate::PixelEncoding {
        crate::PixelEncoding::RGBA
    }

    /// Draws `frame` at the origin with each pixel replicated into a `scale` x `scale` block.
    /// No filtering is ever applied.
    fn draw_scaled(&mut self, frame: &Frame, scale: u32) -> Result<(), HostError<Self::Error>>;
}


#[derive(Clone, Default)]
pub struct ClockedQueue<T>(Arc<Mutex<VecDeque<(Instant, T)>>>, usize);

impl<T: Clone> ClockedQueue<T> {
    pub fn new(max: usize) -> Self {
        Self(Arc::new(Mutex::new(VecDeque::new())), max)
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<(Instant, T)>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, clock: Instant, data: T) {
        let mut queue = self.lock();
        if queue.len() > self.1 {
            log::debug!("dropping data from queue due to limit of {} items", self.1);
            queue.pop_front();
        }
        queue.push_back((clock, data));
    }

    pub fn pop_next(&self) -> Option<(Instant, T)> {
        self.lock().pop_front()
    }

}
