use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};
use thiserror::Error;
use tiny_skia::Pixmap;

/// Errors that can occur while uploading a canvas frame
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TextureUploadError {
    #[error("Invalid texture dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// Keeps one GPU texture in sync with the CPU-rendered canvas pixmap.
///
/// The texture is created on first upload and overwritten in place afterwards,
/// so its id stays stable across frames.
pub struct TextureManager {
    name: String,
    handle: Option<TextureHandle>,
    /// Number of uploads performed, for diagnostics
    uploads: u64,
}

/// Wrap pixmap data (already premultiplied) as an egui image
pub fn pixmap_to_color_image(pixmap: &Pixmap) -> Result<ColorImage, TextureUploadError> {
    let (width, height) = (pixmap.width(), pixmap.height());
    if width == 0 || height == 0 {
        return Err(TextureUploadError::InvalidDimensions { width, height });
    }
    Ok(ColorImage::from_rgba_premultiplied(
        [width as usize, height as usize],
        pixmap.data(),
    ))
}

impl TextureManager {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handle: None,
            uploads: 0,
        }
    }

    /// Upload the latest frame and return the texture to paint
    pub fn upload(&mut self, ctx: &Context, pixmap: &Pixmap) -> Result<TextureId, TextureUploadError> {
        let image = pixmap_to_color_image(pixmap)?;
        self.uploads += 1;
        match &mut self.handle {
            Some(handle) => {
                handle.set(image, TextureOptions::LINEAR);
                Ok(handle.id())
            }
            None => {
                log::debug!("Creating canvas texture {}x{}", pixmap.width(), pixmap.height());
                let handle = ctx.load_texture(&self.name, image, TextureOptions::LINEAR);
                let id = handle.id();
                self.handle = Some(handle);
                Ok(id)
            }
        }
    }

    pub fn texture_id(&self) -> Option<TextureId> {
        self.handle.as_ref().map(TextureHandle::id)
    }

    pub fn upload_count(&self) -> u64 {
        self.uploads
    }

    /// Drop the texture; the next upload creates a fresh one
    pub fn clear(&mut self) {
        self.handle = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(size: u32) -> Pixmap {
        let mut pixmap = Pixmap::new(size, size).unwrap();
        pixmap.fill(tiny_skia::Color::WHITE);
        pixmap
    }

    #[test]
    fn test_texture_is_reused() {
        let ctx = Context::default();
        let mut manager = TextureManager::new("canvas");

        let first = manager.upload(&ctx, &frame(10)).unwrap();
        let second = manager.upload(&ctx, &frame(20)).unwrap();

        assert_eq!(first, second);
        assert_eq!(manager.texture_id(), Some(first));
        assert_eq!(manager.upload_count(), 2);
    }

    #[test]
    fn test_clear_drops_texture() {
        let ctx = Context::default();
        let mut manager = TextureManager::new("canvas");
        manager.upload(&ctx, &frame(4)).unwrap();
        manager.clear();
        assert!(manager.texture_id().is_none());
    }

    #[test]
    fn test_color_image_size() {
        let image = pixmap_to_color_image(&frame(3)).unwrap();
        assert_eq!(image.size, [3, 3]);
        assert_eq!(image.pixels[0], egui::Color32::WHITE);
    }
}
