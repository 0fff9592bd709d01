use std::convert::Infallible;

use crate::gfx::{Frame, PixelEncoding};
use crate::traits::{HostError, Surface};


/// A display surface that lives entirely in host memory.
///
/// Frontends that can only present a whole buffer at once (minifb, for example) draw into one
/// of these and then hand `backing()` to the window.  It is also what headless runs use.
pub struct FrameSurface {
    backing: Frame,
    max_size: (u32, u32),
    draws: u64,
}

impl FrameSurface {
    pub fn new(encoding: PixelEncoding) -> Self {
        Self {
            backing: Frame::new(0, 0, encoding),
            max_size: (u32::MAX, u32::MAX),
            draws: 0,
        }
    }

    /// Refuses to resize beyond the given dimensions
    pub fn with_max_size(mut self, width: u32, height: u32) -> Self {
        self.max_size = (width, height);
        self
    }

    pub fn backing(&self) -> &Frame {
        &self.backing
    }

    /// The number of frames drawn since the surface was created
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl Surface for FrameSurface {
    type Error = Infallible;

    fn resize(&mut self, width: u32, height: u32) -> Result<(), HostError<Self::Error>> {
        if width == 0 || height == 0 || width > self.max_size.0 || height > self.max_size.1 {
            return Err(HostError::SizeNotSupported(width, height));
        }
        self.backing.set_size(width, height);
        self.backing.bitmap.iter_mut().for_each(|pixel| *pixel = 0);
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        (self.backing.width, self.backing.height)
    }

    fn encoding(&self) -> PixelEncoding {
        self.backing.encoding
    }

    fn draw_scaled(&mut self, frame: &Frame, scale: u32) -> Result<(), HostError<Self::Error>> {
        let expected = (frame.width * scale, frame.height * scale);
        if expected != self.size() {
            return Err(HostError::FrameMismatch { frame: expected, expected: self.size() });
        }
        self.backing.blit_scaled(frame, scale);
        self.draws += 1;
        Ok(())
    }
}
