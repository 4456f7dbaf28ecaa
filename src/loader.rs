use std::io::Cursor;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{ImageFormat, RgbaImage};

use crate::error::{DecodeCause, DecodeError, Error, Result};
use crate::surface::{CanvasSurface, Surface};

const DATA_SCHEME: &str = "data:";
const FILE_SCHEME: &str = "file://";

/// Load and decode the image behind `locator` into an RGBA bitmap.
///
/// Accepted locators are `data:` URIs with a base64 payload, `file://` URLs
/// and plain filesystem paths. Failures are logged before being returned.
pub fn load_image(locator: &str) -> std::result::Result<RgbaImage, DecodeError> {
    match read_and_decode(locator) {
        Ok(img) => {
            log::debug!(
                "loaded {}x{} image from {}",
                img.width(),
                img.height(),
                describe(locator)
            );
            Ok(img)
        }
        Err(cause) => {
            let err = DecodeError::new(locator, cause);
            log::error!("{err}");
            Err(err)
        }
    }
}

/// Load an image straight into a drawable surface.
pub fn load_surface(locator: &str) -> std::result::Result<CanvasSurface, DecodeError> {
    load_image(locator).map(|img| bitmap_to_surface(&img))
}

/// A surface sized to `bitmap` holding an exact copy of its pixels.
pub fn bitmap_to_surface(bitmap: &RgbaImage) -> CanvasSurface {
    let mut surface = CanvasSurface::new(bitmap.width(), bitmap.height());
    surface.write_pixels(bitmap, 0, 0);
    surface
}

/// Serialize a surface as a `data:image/png;base64,...` URL.
pub fn surface_to_data_url(surface: &impl Surface) -> Result<String> {
    let mut png = Vec::new();
    surface
        .snapshot()
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(Error::Encode)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(&png)))
}

/// Encode the surface as PNG and decode it back into a bitmap.
pub fn surface_to_image(surface: &impl Surface) -> Result<RgbaImage> {
    let url = surface_to_data_url(surface)?;
    Ok(load_image(&url)?)
}

/// Copy a surface into a new one flagged for frequent pixel reads.
pub fn clone_read_optimized(surface: &impl Surface) -> CanvasSurface {
    let mut copy = CanvasSurface::read_optimized(surface.width(), surface.height());
    copy.write_pixels(&surface.snapshot(), 0, 0);
    copy
}

fn read_and_decode(locator: &str) -> std::result::Result<RgbaImage, DecodeCause> {
    let bytes = read_bytes(locator)?;
    let img = image::load_from_memory(&bytes)?;
    Ok(img.to_rgba8())
}

fn read_bytes(locator: &str) -> std::result::Result<Vec<u8>, DecodeCause> {
    if let Some(rest) = locator.strip_prefix(DATA_SCHEME) {
        return decode_data_uri(rest);
    }
    if let Some(path) = locator.strip_prefix(FILE_SCHEME) {
        return Ok(std::fs::read(Path::new(path))?);
    }
    if let Some((scheme, _)) = locator.split_once("://") {
        return Err(DecodeCause::UnsupportedScheme(scheme.to_string()));
    }
    Ok(std::fs::read(Path::new(locator))?)
}

/// Decode the part of a data URI after `data:`.
fn decode_data_uri(rest: &str) -> std::result::Result<Vec<u8>, DecodeCause> {
    let (meta, payload) = rest
        .split_once(',')
        .ok_or(DecodeCause::MalformedDataUri)?;
    if !meta.split(';').any(|param| param == "base64") {
        return Err(DecodeCause::UnsupportedDataUriEncoding);
    }
    Ok(STANDARD.decode(payload.trim())?)
}

fn describe(locator: &str) -> &str {
    if locator.starts_with(DATA_SCHEME) {
        "data URI"
    } else {
        locator
    }
}
