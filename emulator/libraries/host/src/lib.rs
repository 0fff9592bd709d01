mod controllers;
mod gfx;
mod input;
mod keys;
mod surface;
mod traits;

pub use crate::gfx::{Pixel, PixelEncoding, Frame, FrameSender, FrameReceiver, frame_queue, RGBA8_BYTES};
pub use crate::keys::{Key, KeyEvent, InputTarget};
pub use crate::controllers::{Button, ButtonState};
pub use crate::input::{EventSender, EventReceiver, HostEvent, event_queue};
pub use crate::surface::FrameSurface;
pub use crate::traits::{Host, HostError, Surface, ClockedQueue};
