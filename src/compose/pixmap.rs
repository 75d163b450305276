use crate::foundation::core::{Affine, RasterImage};
use crate::foundation::error::{FlavorError, FlavorResult};

pub(crate) fn to_u16_dims(width: u32, height: u32) -> FlavorResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| FlavorError::render("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| FlavorError::render("pixmap height exceeds u16"))?;
    Ok((w, h))
}

pub(crate) fn pixmap_from_raster(img: &RasterImage) -> FlavorResult<vello_cpu::Pixmap> {
    let (w, h) = to_u16_dims(img.width, img.height)?;
    let bytes = img.rgba8_premul.as_slice();
    if bytes.len()
        != (img.width as usize)
            .saturating_mul(img.height as usize)
            .saturating_mul(4)
    {
        return Err(FlavorError::render("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; raster bytes are already premultiplied.
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (img.width as usize) * (img.height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

pub(crate) fn image_paint(img: &RasterImage) -> FlavorResult<vello_cpu::Image> {
    let pixmap = pixmap_from_raster(img)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(std::sync::Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

pub(crate) fn raster_from_pixmap(pixmap: &vello_cpu::Pixmap) -> FlavorResult<RasterImage> {
    RasterImage::from_premul(
        u32::from(pixmap.width()),
        u32::from(pixmap.height()),
        pixmap.data_as_u8_slice().to_vec(),
    )
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}
