//! The fixed-size raster surface every stage draws into.

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, PremultipliedColorU8};
use sha2::{Digest, Sha256};

use crate::color::HexColor;
use crate::error::{StickerError, StickerResult};

/// Edge length of the square sticker, in pixels.
pub const CANVAS_SIZE: u32 = 512;

/// Center of the canvas on both axes.
pub const CANVAS_CENTER: f32 = CANVAS_SIZE as f32 / 2.0;

/// A rectangle defined in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RectPx {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl RectPx {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// A `size`×`size` square centered on `(cx, cy)`.
    pub fn centered(cx: u32, cy: u32, size: u32) -> Self {
        Self::new(cx.saturating_sub(size / 2), cy.saturating_sub(size / 2), size, size)
    }

    /// Returns the right edge coordinate (x + width).
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Returns the bottom edge coordinate (y + height).
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }
}

/// A 512×512 premultiplied RGBA surface.
///
/// Stages take the canvas by value and hand it back, so exactly one stage
/// can write to it at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    /// Allocates a transparent canvas.
    pub fn new() -> StickerResult<Self> {
        let pixmap = Pixmap::new(CANVAS_SIZE, CANVAS_SIZE).ok_or(StickerError::Allocation {
            width: CANVAS_SIZE,
            height: CANVAS_SIZE,
        })?;
        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    /// Returns the straight-alpha color at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.pixmap.pixel(x, y).map(straight_rgba)
    }

    /// Converts the canvas to an [`RgbaImage`] with straight alpha.
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut img = RgbaImage::new(self.width(), self.height());
        for (src, dst) in self.pixmap.pixels().iter().zip(img.pixels_mut()) {
            *dst = straight_rgba(*src);
        }
        img
    }

    /// Serializes the canvas as PNG.
    ///
    /// On failure nothing is returned; there is no partial output.
    pub fn encode_png(&self) -> StickerResult<Vec<u8>> {
        let mut bytes = Vec::new();
        self.to_rgba_image()
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Averages the color inside `region`, weighting by alpha.
    ///
    /// Returns `None` if the region holds no visible pixels.
    pub fn average_color(&self, region: RectPx) -> Option<HexColor> {
        let mut total_r: u64 = 0;
        let mut total_g: u64 = 0;
        let mut total_b: u64 = 0;
        let mut total_a: u64 = 0;

        for y in region.y..region.bottom().min(self.height()) {
            for x in region.x..region.right().min(self.width()) {
                let Some(pixel) = self.pixel(x, y) else {
                    continue;
                };
                let a = pixel[3] as u64;
                total_r += pixel[0] as u64 * a;
                total_g += pixel[1] as u64 * a;
                total_b += pixel[2] as u64 * a;
                total_a += a;
            }
        }

        if total_a == 0 {
            return None;
        }

        Some(HexColor::rgb(
            (total_r / total_a) as u8,
            (total_g / total_a) as u8,
            (total_b / total_a) as u8,
        ))
    }
}

fn straight_rgba(pixel: PremultipliedColorU8) -> Rgba<u8> {
    let pixel = pixel.demultiply();
    Rgba([pixel.red(), pixel.green(), pixel.blue(), pixel.alpha()])
}

/// Content-derived identifier for an encoded sticker.
///
/// The first 16 hex digits of the SHA-256 of the PNG bytes, so identical
/// stickers share an id.
pub fn sticker_id(png: &[u8]) -> String {
    let digest = format!("{:x}", Sha256::digest(png));
    digest[..16].to_string()
}
