use crate::compose::pixmap::{affine_to_cpu, image_paint, raster_from_pixmap, to_u16_dims};
use crate::foundation::core::{Affine, RasterImage};
use crate::foundation::error::{FlavorError, FlavorResult};

/// Image texture width; matches the model's image UV layout.
pub const IMAGE_CANVAS_WIDTH: u32 = 2048;
/// Image texture height.
pub const IMAGE_CANVAS_HEIGHT: u32 = 2048;

/// Where a contain-fitted source lands on the canvas (before the vertical flip).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainPlacement {
    /// Uniform scale `min(canvas_w / src_w, canvas_h / src_h)`.
    pub scale: f64,
    /// Drawn width.
    pub draw_w: f64,
    /// Drawn height.
    pub draw_h: f64,
    /// Left offset, `(canvas_w - draw_w) / 2`.
    pub dx: f64,
    /// Top offset, `(canvas_h - draw_h) / 2`.
    pub dy: f64,
}

/// Contain-fit a `src_w`×`src_h` source into a `canvas_w`×`canvas_h` canvas.
pub fn contain_placement(
    src_w: u32,
    src_h: u32,
    canvas_w: u32,
    canvas_h: u32,
) -> FlavorResult<ContainPlacement> {
    if src_w == 0 || src_h == 0 {
        return Err(FlavorError::validation(format!(
            "cannot contain-fit a {src_w}x{src_h} image"
        )));
    }
    let (cw, ch) = (f64::from(canvas_w), f64::from(canvas_h));
    let scale = (cw / f64::from(src_w)).min(ch / f64::from(src_h));
    let draw_w = f64::from(src_w) * scale;
    let draw_h = f64::from(src_h) * scale;
    Ok(ContainPlacement {
        scale,
        draw_w,
        draw_h,
        dx: (cw - draw_w) / 2.0,
        dy: (ch - draw_h) / 2.0,
    })
}

/// Canvas transform for drawing the source: `translate(0, H) · scale(1, -1)` followed by the
/// contain placement.
pub fn contain_transform(p: &ContainPlacement, canvas_h: u32) -> Affine {
    Affine::translate((0.0, f64::from(canvas_h)))
        * Affine::scale_non_uniform(1.0, -1.0)
        * Affine::translate((p.dx, p.dy))
        * Affine::scale(p.scale)
}

/// Render `src` contain-fitted, centered and vertically flipped into a 2048×2048 texture with
/// transparent padding.
#[tracing::instrument(skip(src), fields(src_w = src.width, src_h = src.height))]
pub fn render_contained_image(src: &RasterImage) -> FlavorResult<RasterImage> {
    render_contained_image_sized(src, IMAGE_CANVAS_WIDTH, IMAGE_CANVAS_HEIGHT)
}

pub(crate) fn render_contained_image_sized(
    src: &RasterImage,
    canvas_w: u32,
    canvas_h: u32,
) -> FlavorResult<RasterImage> {
    let placement = contain_placement(src.width, src.height, canvas_w, canvas_h)?;
    let (w, h) = to_u16_dims(canvas_w, canvas_h)?;
    let paint = image_paint(src)?;

    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(affine_to_cpu(contain_transform(&placement, canvas_h)));
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(src.width),
        f64::from(src.height),
    ));
    ctx.flush();

    let mut out = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut out);
    raster_from_pixmap(&out)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/contain.rs"]
mod tests;
