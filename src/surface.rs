//! Drawable pixel surfaces.
//!
//! [`Surface`] is the capability the rest of the crate draws through; any
//! host surface can implement it. [`CanvasSurface`] is the in-memory
//! implementation backed by an [`RgbaImage`].

use image::{imageops, Pixel, RgbaImage};

/// An addressable 2D RGBA8 pixel buffer supporting draw and pixel read/write.
///
/// Coordinates are signed for the write side so callers can position a bitmap
/// partially off the surface; anything outside the surface is clipped.
pub trait Surface {
    /// A fully transparent surface of the given size.
    fn blank(width: u32, height: u32) -> Self
    where
        Self: Sized;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Composite `bitmap` onto the surface with its top-left corner at `(x, y)`
    /// using source-over blending. No scaling is applied. Over a transparent
    /// destination pixel the source pixel is copied exactly.
    fn draw(&mut self, bitmap: &RgbaImage, x: i64, y: i64);

    /// Copy a `width`×`height` region starting at `(x, y)`. Pixels outside the
    /// surface read as transparent black.
    fn read_pixels(&self, x: u32, y: u32, width: u32, height: u32) -> RgbaImage;

    /// Replace the pixels under `pixels` (no blending), clipped to the surface.
    fn write_pixels(&mut self, pixels: &RgbaImage, x: i64, y: i64);

    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    /// The whole surface as a bitmap.
    fn snapshot(&self) -> RgbaImage {
        self.read_pixels(0, 0, self.width(), self.height())
    }
}

/// In-memory surface. Sampling is always nearest-neighbour: draws never
/// resample, so pixels are copied one to one.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasSurface {
    pixels: RgbaImage,
    read_optimized: bool,
}

impl CanvasSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
            read_optimized: false,
        }
    }

    /// A blank surface flagged for frequent pixel reads.
    pub fn read_optimized(width: u32, height: u32) -> Self {
        Self {
            read_optimized: true,
            ..Self::new(width, height)
        }
    }

    /// Whether the surface was created for repeated pixel reads.
    pub fn is_read_optimized(&self) -> bool {
        self.read_optimized
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }
}

impl Surface for CanvasSurface {
    fn blank(width: u32, height: u32) -> Self {
        Self::new(width, height)
    }

    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn draw(&mut self, bitmap: &RgbaImage, x: i64, y: i64) {
        let (width, height) = (i64::from(self.width()), i64::from(self.height()));
        for (bx, by, src) in bitmap.enumerate_pixels() {
            let (dx, dy) = (x + i64::from(bx), y + i64::from(by));
            if dx < 0 || dy < 0 || dx >= width || dy >= height || src[3] == 0 {
                continue;
            }
            let dst = self.pixels.get_pixel_mut(dx as u32, dy as u32);
            if dst[3] == 0 {
                *dst = *src;
            } else {
                dst.blend(src);
            }
        }
    }

    fn read_pixels(&self, x: u32, y: u32, width: u32, height: u32) -> RgbaImage {
        let mut out = RgbaImage::new(width, height);
        for (dx, dy, px) in out.enumerate_pixels_mut() {
            let (sx, sy) = (u64::from(x) + u64::from(dx), u64::from(y) + u64::from(dy));
            if sx < u64::from(self.width()) && sy < u64::from(self.height()) {
                *px = *self.pixels.get_pixel(sx as u32, sy as u32);
            }
        }
        out
    }

    fn write_pixels(&mut self, pixels: &RgbaImage, x: i64, y: i64) {
        imageops::replace(&mut self.pixels, pixels, x, y);
    }
}
