use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;
use tiny_skia::Pixmap;

use crate::error::{ExportError, ExportResult};

/// One rendered frame on its way to the encoder
#[derive(Debug, Clone, Copy)]
pub struct RenderedFrame<'a> {
    pub index: usize,
    pub pixmap: &'a Pixmap,
    pub delay_ms: f64,
    /// Rotation applied to the artwork in this frame, in degrees
    pub rotation: f32,
}

/// Sink that turns an ordered sequence of frames into one animation file
pub trait FrameEncoder {
    fn encode_frame(&mut self, frame: &RenderedFrame<'_>) -> ExportResult<()>;

    /// Finish the animation and hand back the encoded bytes
    fn finish(self) -> ExportResult<Vec<u8>>;
}

/// Convert premultiplied pixmap data into a straight-alpha RGBA image
pub fn pixmap_to_rgba(pixmap: &Pixmap) -> ExportResult<RgbaImage> {
    let mut data = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        data.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), data).ok_or(ExportError::CanvasUnavailable {
        width: pixmap.width(),
        height: pixmap.height(),
    })
}

// Writer whose bytes stay reachable after the encoder that owns it is dropped
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Looping GIF encoder backed by the `image` crate
pub struct GifFrameEncoder {
    buffer: SharedBuffer,
    encoder: GifEncoder<SharedBuffer>,
    frames: usize,
}

impl GifFrameEncoder {
    /// Quantization speed, 1 (best) to 30 (fastest)
    pub const SPEED: i32 = 10;

    pub fn new() -> ExportResult<Self> {
        let buffer = SharedBuffer::default();
        let mut encoder = GifEncoder::new_with_speed(buffer.clone(), Self::SPEED);
        encoder.set_repeat(Repeat::Infinite)?;
        Ok(Self {
            buffer,
            encoder,
            frames: 0,
        })
    }
}

impl FrameEncoder for GifFrameEncoder {
    fn encode_frame(&mut self, frame: &RenderedFrame<'_>) -> ExportResult<()> {
        let image = pixmap_to_rgba(frame.pixmap)?;
        let delay = Delay::from_numer_denom_ms((frame.delay_ms * 1000.0).round().max(0.0) as u32, 1000);
        self.encoder.encode_frame(Frame::from_parts(image, 0, 0, delay))?;
        self.frames += 1;
        Ok(())
    }

    fn finish(self) -> ExportResult<Vec<u8>> {
        let Self { buffer, encoder, frames } = self;
        // dropping the encoder writes the GIF trailer
        drop(encoder);
        let bytes = std::mem::take(&mut *buffer.0.lock());
        log::debug!("Encoded {} frames into {} bytes", frames, bytes.len());
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixmap_conversion_unpremultiplies() {
        let mut pixmap = Pixmap::new(2, 1).unwrap();
        pixmap.fill(tiny_skia::Color::from_rgba8(200, 100, 50, 128));
        let image = pixmap_to_rgba(&pixmap).unwrap();
        let pixel = image.get_pixel(0, 0).0;
        assert!((pixel[0] as i32 - 200).abs() <= 2);
        assert_eq!(pixel[3], 128);
    }

    #[test]
    fn test_gif_output_has_header_and_trailer() {
        let mut pixmap = Pixmap::new(8, 8).unwrap();
        pixmap.fill(tiny_skia::Color::WHITE);

        let mut encoder = GifFrameEncoder::new().unwrap();
        for index in 0..3 {
            encoder
                .encode_frame(&RenderedFrame {
                    index,
                    pixmap: &pixmap,
                    delay_ms: 100.0,
                    rotation: 0.0,
                })
                .unwrap();
        }
        let bytes = encoder.finish().unwrap();

        assert!(bytes.starts_with(b"GIF89a"));
        assert_eq!(bytes.last(), Some(&0x3b));
    }
}
