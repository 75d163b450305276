use anyhow::Context;

use crate::foundation::core::{RasterImage, premultiply_rgba8_in_place};
use crate::foundation::error::FlavorResult;

/// Decode an encoded image (PNG, JPEG, ...) into a premultiplied [`RasterImage`].
pub fn decode_image(bytes: &[u8]) -> FlavorResult<RasterImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    RasterImage::from_premul(width, height, rgba8_premul)
}

/// Encode a raster as PNG bytes (straight alpha).
pub fn encode_png(img: &RasterImage) -> FlavorResult<Vec<u8>> {
    let straight = img.to_straight_rgba()?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(straight)
        .write_to(&mut std::io::Cursor::new(&mut buf), image::ImageFormat::Png)
        .context("encode png")?;
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/decode.rs"]
mod tests;
