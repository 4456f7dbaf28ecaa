use image::RgbaImage;

use crate::color::{flatten, Color, Palette};
use crate::error::{Error, Result};
use crate::surface::Surface;

/// What happens to fully transparent (alpha 0) input pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransparentPolicy {
    /// Output pixel is transparent black, whatever the input's color channels.
    #[default]
    ZeroFill,
    /// Output pixel is the input pixel, unchanged.
    Passthrough,
}

/// Where [`Recolor::apply_to_surface`] reads its input pixels from.
#[derive(Clone, Copy)]
pub enum PixelSource<'a> {
    Surface(&'a dyn Surface),
    Pixels(&'a RgbaImage),
}

impl<'a> From<&'a RgbaImage> for PixelSource<'a> {
    fn from(pixels: &'a RgbaImage) -> Self {
        PixelSource::Pixels(pixels)
    }
}

/// Positional palette substitution.
///
/// Source and destination palettes are flattened and paired slot by slot.
/// Slots past the end of the shorter list are dropped, so they never match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Recolor {
    pairs: Vec<(Color, Color)>,
    policy: TransparentPolicy,
}

impl Recolor {
    pub fn new(source: &[Palette], target: &[Palette]) -> Self {
        Self {
            pairs: flatten(source).zip(flatten(target)).collect(),
            policy: TransparentPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: TransparentPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> TransparentPolicy {
        self.policy
    }

    /// The effective source→destination slot pairs, in scan order.
    pub fn pairs(&self) -> &[(Color, Color)] {
        &self.pairs
    }

    /// Destination color for the first slot whose source RGB equals the
    /// pixel's RGB. Alpha is not compared.
    pub fn lookup(&self, pixel: Color) -> Option<Color> {
        self.pairs
            .iter()
            .find(|(src, _)| src.same_rgb(pixel))
            .map(|&(_, dst)| dst)
    }

    fn map_pixel(&self, pixel: Color) -> Color {
        if pixel.a == 0 {
            return match self.policy {
                TransparentPolicy::ZeroFill => Color::TRANSPARENT,
                TransparentPolicy::Passthrough => pixel,
            };
        }
        self.lookup(pixel).unwrap_or(pixel)
    }

    /// Recolor into a new bitmap of the same size. The input is untouched.
    pub fn apply(&self, input: &RgbaImage) -> RgbaImage {
        let mut output = RgbaImage::new(input.width(), input.height());
        for (out, px) in output.pixels_mut().zip(input.pixels()) {
            *out = self.map_pixel(Color::from(*px)).into();
        }
        output
    }

    /// Recolor `image` in place.
    pub fn apply_in_place(&self, image: &mut RgbaImage) {
        for px in image.pixels_mut() {
            *px = self.map_pixel(Color::from(*px)).into();
        }
    }

    /// Recolor `input` and commit the result to a surface.
    ///
    /// `existing_output` is reused when given and must already match the
    /// input's size; otherwise a new surface is allocated.
    pub fn apply_to_surface<S: Surface>(
        &self,
        input: PixelSource<'_>,
        existing_output: Option<S>,
    ) -> Result<S> {
        let recolored = match input {
            PixelSource::Surface(surface) => self.apply(&surface.snapshot()),
            PixelSource::Pixels(pixels) => self.apply(pixels),
        };
        let expected = recolored.dimensions();

        let mut output = match existing_output {
            Some(surface) if surface.dimensions() != expected => {
                return Err(Error::SurfaceSize {
                    expected,
                    actual: surface.dimensions(),
                });
            }
            Some(surface) => surface,
            None => S::blank(expected.0, expected.1),
        };
        output.write_pixels(&recolored, 0, 0);

        log::debug!(
            "recolored {}x{} bitmap with {} palette slots",
            expected.0,
            expected.1,
            self.pairs.len()
        );
        Ok(output)
    }
}

/// Recolor a bitmap with transparent pixels zero-filled.
pub fn replace_color(source: &[Palette], target: &[Palette], input: &RgbaImage) -> RgbaImage {
    Recolor::new(source, target).apply(input)
}

/// Recolor `input` onto `existing_output` or a new surface, with transparent
/// pixels zero-filled.
pub fn replace_surface_color<S: Surface>(
    source: &[Palette],
    target: &[Palette],
    input: PixelSource<'_>,
    existing_output: Option<S>,
) -> Result<S> {
    Recolor::new(source, target).apply_to_surface(input, existing_output)
}
