use std::{io::Cursor, sync::Arc};

use anyhow::Context as _;

use crate::error::{SpriteError, SpriteResult};

/// Decoded source spritesheet.
///
/// Straight (non-premultiplied) RGBA8, row-major, tightly packed. Immutable
/// once decoded; cloning shares the pixel buffer.
#[derive(Clone, Debug)]
pub struct SheetImage {
    width: u32,
    height: u32,
    rgba8: Arc<Vec<u8>>,
}

impl SheetImage {
    /// Decode an encoded image (PNG, GIF, ...) into a sheet.
    ///
    /// Pure function over the byte slice; dropping the result discards the
    /// decode with no other effect.
    pub fn decode(bytes: &[u8]) -> SpriteResult<Self> {
        let dyn_img = image::load_from_memory(bytes).context("decode sheet image")?;
        let rgba = dyn_img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba8(width, height, rgba.into_raw())
    }

    pub fn from_rgba8(width: u32, height: u32, rgba8: Vec<u8>) -> SpriteResult<Self> {
        if width == 0 || height == 0 {
            return Err(SpriteError::validation("sheet dimensions must be > 0"));
        }
        let expected = width as usize * height as usize * 4;
        if rgba8.len() != expected {
            return Err(SpriteError::validation(format!(
                "sheet buffer is {} bytes, expected {expected} for {width}x{height} rgba8",
                rgba8.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8: Arc::new(rgba8),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel bytes in row-major RGBA8.
    pub fn rgba8(&self) -> &[u8] {
        &self.rgba8
    }

    /// Alpha channel at (x, y). Callers must stay in bounds.
    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        debug_assert!(x < self.width && y < self.height);
        self.rgba8[(y as usize * self.width as usize + x as usize) * 4 + 3]
    }
}

/// One extracted cell of a sheet, owned and independent of its source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes in row-major straight RGBA8.
    pub rgba8: Vec<u8>,
}

impl Frame {
    pub fn from_rgba8(width: u32, height: u32, rgba8: Vec<u8>) -> SpriteResult<Self> {
        if width == 0 || height == 0 {
            return Err(SpriteError::validation("frame dimensions must be > 0"));
        }
        let expected = width as usize * height as usize * 4;
        if rgba8.len() != expected {
            return Err(SpriteError::validation(format!(
                "frame buffer is {} bytes, expected {expected} for {width}x{height} rgba8",
                rgba8.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8,
        })
    }

    /// Encode as PNG bytes for transport or persistence.
    pub fn to_png(&self) -> SpriteResult<Vec<u8>> {
        let img = image::RgbaImage::from_raw(self.width, self.height, self.rgba8.clone())
            .ok_or_else(|| SpriteError::extraction("frame buffer does not match dimensions"))?;

        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .context("encode frame png")?;
        Ok(buf)
    }

    pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
        debug_assert!(x < self.width && y < self.height);
        self.rgba8[(y as usize * self.width as usize + x as usize) * 4 + 3]
    }
}
