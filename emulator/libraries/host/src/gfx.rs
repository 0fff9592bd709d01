use std::sync::{Arc, Mutex, PoisonError};
use femtos::Instant;

use crate::traits::ClockedQueue;

/// Bytes per pixel of the packed RGBA8 data produced by the native core
pub const RGBA8_BYTES: usize = 4;

#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub enum PixelEncoding {
    #[default]
    RGBA,
    ARGB,
    ABGR,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Pixel {
    Rgb(u8, u8, u8),
    Rgba(u8, u8, u8, u8),
}

impl Pixel {
    #[inline]
    pub fn encode(self, encoding: PixelEncoding) -> u32 {
        let (r, g, b, a) = match self {
            Pixel::Rgb(r, g, b) => (r as u32, g as u32, b as u32, 255),
            Pixel::Rgba(r, g, b, a) => (r as u32, g as u32, b as u32, a as u32),
        };

        match encoding {
            PixelEncoding::RGBA => (r << 24) | (g << 16) | (b << 8) | a,
            PixelEncoding::ARGB => (a << 24) | (r << 16) | (g << 8) | b,
            PixelEncoding::ABGR => (a << 24) | (b << 16) | (g << 8) | r,
        }
    }
}

/// A host-owned bitmap of packed pixels
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub encoding: PixelEncoding,
    pub bitmap: Vec<u32>,
}

impl Frame {
    pub fn new(width: u32, height: u32, encoding: PixelEncoding) -> Self {
        Self {
            width,
            height,
            encoding,
            bitmap: vec![0; (width as usize) * (height as usize)],
        }
    }

    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.bitmap.resize((width as usize) * (height as usize), 0);
    }

    /// The number of bytes of RGBA8 data that fill this frame exactly
    pub fn rgba8_len(&self) -> usize {
        self.bitmap.len() * RGBA8_BYTES
    }

    #[inline]
    pub fn set_pixel(&mut self, pos_x: u32, pos_y: u32, pixel: Pixel) {
        if pos_x < self.width && pos_y < self.height {
            self.bitmap[(pos_x + (pos_y * self.width)) as usize] = pixel.encode(self.encoding);
        }
    }

    #[inline]
    pub fn get_pixel(&self, pos_x: u32, pos_y: u32) -> Option<u32> {
        if pos_x < self.width && pos_y < self.height {
            Some(self.bitmap[(pos_x + (pos_y * self.width)) as usize])
        } else {
            None
        }
    }

    /// Packs tightly-packed RGBA8 bytes into this frame.  Returns `false` without touching the
    /// frame if `data` isn't exactly `width * height * 4` bytes long.
    pub fn copy_from_rgba8(&mut self, data: &[u8]) -> bool {
        if data.len() != self.rgba8_len() {
            return false;
        }

        let encoding = self.encoding;
        for (pixel, rgba) in self.bitmap.iter_mut().zip(data.chunks_exact(RGBA8_BYTES)) {
            *pixel = Pixel::Rgba(rgba[0], rgba[1], rgba[2], rgba[3]).encode(encoding);
        }
        true
    }

    /// Nearest-neighbour copy of `source` into this frame, each source pixel becoming a
    /// `scale` x `scale` block.  Anything that falls outside this frame is clipped.
    pub fn blit_scaled(&mut self, source: &Frame, scale: u32) {
        let width = (source.width * scale).min(self.width) as usize;
        let height = (source.height * scale).min(self.height);
        let scale = scale as usize;

        for y in 0..height {
            let src_row = ((y as usize / scale) * source.width as usize) as usize;
            let dst_row = (y * self.width) as usize;
            for x in 0..width {
                self.bitmap[dst_row + x] = source.bitmap[src_row + x / scale];
            }
        }
    }
}

/// Creates the ordered hand-off between the render pipeline (sender) and the presenting side
/// (receiver).  At most `depth + 1` frames are buffered; the oldest is dropped beyond that.
pub fn frame_queue(depth: usize) -> (FrameSender, FrameReceiver) {
    let sender = FrameSender {
        encoding: Arc::new(Mutex::new(PixelEncoding::RGBA)),
        queue: ClockedQueue::new(depth),
    };

    let receiver = FrameReceiver {
        encoding: sender.encoding.clone(),
        queue: sender.queue.clone(),
        last_clock: None,
    };

    (sender, receiver)
}

pub struct FrameSender {
    encoding: Arc<Mutex<PixelEncoding>>,
    queue: ClockedQueue<Frame>,
}

impl FrameSender {
    pub fn encoding(&self) -> PixelEncoding {
        *self.encoding.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add(&self, clock: Instant, frame: Frame) {
        self.queue.push(clock, frame);
    }
}

pub struct FrameReceiver {
    encoding: Arc<Mutex<PixelEncoding>>,
    queue: ClockedQueue<Frame>,
    last_clock: Option<Instant>,
}

impl FrameReceiver {
    pub fn request_encoding(&self, encoding: PixelEncoding) {
        *self.encoding.lock().unwrap_or_else(PoisonError::into_inner) = encoding;
    }

    /// Returns the oldest pending frame that is newer than every frame returned so far.
    /// Frames stamped at or before the last returned clock are discarded.
    pub fn next(&mut self) -> Option<(Instant, Frame)> {
        while let Some((clock, frame)) = self.queue.pop_next() {
            if self.last_clock.map_or(true, |last| clock > last) {
                self.last_clock = Some(clock);
                return Some((clock, frame));
            }
            log::debug!("discarding stale frame at {:?}", clock);
        }
        None
    }
}
