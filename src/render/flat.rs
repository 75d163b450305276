use kurbo::Rect;

use crate::compose::pixmap::{affine_to_cpu, image_paint, to_u16_dims};
use crate::foundation::core::{Affine, RasterImage, Rgb8, Vec3};
use crate::foundation::error::FlavorResult;
use crate::render::backend::{FrameRGBA, RenderScene, SceneRenderer};
use crate::scene::graph::{Material, ModelInstance, NodeId};
use crate::scene::view::ViewSetup;

/// Brightness applied to the body when the bag shows its back.
const BACK_SHADE: f64 = 0.6;

/// Screen-space regions of a projected bag.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CardLayout {
    /// Outline of the whole bag.
    pub bag: Rect,
    /// Logo band.
    pub logo: Rect,
    /// Flavor-name band.
    pub text: Rect,
    /// Picture area.
    pub image: Rect,
    /// `false` when the model is turned more than 90° away from the camera.
    pub facing_front: bool,
}

/// Project an instance into viewport regions.
///
/// The bag is treated as a flat panel: its bounds (unit box without bounds) are scaled by the
/// instance transform, foreshortened by the x/y rotations and divided by the camera's visible
/// height at the panel depth.
pub fn card_layout(instance: &ModelInstance, view: &ViewSetup) -> CardLayout {
    let extent = instance
        .graph
        .bounds()
        .map(|b| b.size())
        .unwrap_or(Vec3::new(1.0, 1.0, 1.0));
    let t = &instance.transform;
    let cam = &view.camera;

    let px_per_unit = f64::from(view.height) / cam.visible_height_at(t.position.z);
    let cos_y = t.rotation.y.cos();
    let w = extent.x * t.scale * cos_y.abs() * px_per_unit;
    let h = extent.y * t.scale * t.rotation.x.cos().abs() * px_per_unit;

    let cx = f64::from(view.width) / 2.0 + (t.position.x - cam.position.x) * px_per_unit;
    let cy = f64::from(view.height) / 2.0 - (t.position.y - cam.position.y) * px_per_unit;
    let bag = Rect::new(cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0);

    let band = |top: f64, bottom: f64| {
        Rect::new(
            bag.x0 + w * 0.12,
            bag.y0 + h * top,
            bag.x1 - w * 0.12,
            bag.y0 + h * bottom,
        )
    };
    CardLayout {
        bag,
        logo: band(0.08, 0.22),
        text: band(0.24, 0.44),
        image: band(0.46, 0.72),
        facing_front: cos_y >= 0.0,
    }
}

/// CPU renderer drawing a flat, camera-projected card of the bag with `vello_cpu`.
///
/// The body is a solid panel in its material color; logo, text and image slots are drawn as
/// bands inside it. Textured slots show their texture upright (label and image textures are
/// stored bottom-up).
#[derive(Clone, Copy, Debug, Default)]
pub struct FlatRenderer;

impl FlatRenderer {
    /// New renderer.
    pub fn new() -> Self {
        Self
    }
}

impl SceneRenderer for FlatRenderer {
    #[tracing::instrument(skip_all, fields(width = view.width, height = view.height))]
    fn render(&self, scene: RenderScene<'_>, view: &ViewSetup) -> FlavorResult<FrameRGBA> {
        let (w, h) = to_u16_dims(view.width, view.height)?;
        let layout = card_layout(scene.instance, view);
        let mut ctx = vello_cpu::RenderContext::new(w, h);

        fill(&mut ctx, Rect::new(0.0, 0.0, f64::from(w), f64::from(h)), view.clear, 1.0);

        if let Some(body) = material(scene.instance, scene.slots.body) {
            let color = if layout.facing_front {
                body.color
            } else {
                body.color.scaled(BACK_SHADE)
            };
            fill(&mut ctx, layout.bag, color, body.effective_opacity());
        }

        if layout.facing_front {
            if let Some(logo) = material(scene.instance, scene.slots.logo) {
                draw_slot(&mut ctx, logo, layout.logo)?;
            }
            if let Some(text) = material(scene.instance, scene.slots.text) {
                draw_slot(&mut ctx, text, layout.text)?;
            }
            if let Some(image) = material(scene.instance, scene.slots.image) {
                draw_slot(&mut ctx, image, layout.image)?;
            }
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);
        Ok(FrameRGBA {
            width: view.width,
            height: view.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn material(instance: &ModelInstance, slot: Option<NodeId>) -> Option<&Material> {
    slot.and_then(|id| instance.graph.node(id))
        .and_then(|n| n.material.as_ref())
}

fn fill(ctx: &mut vello_cpu::RenderContext, rect: Rect, color: Rgb8, opacity: f32) {
    if opacity <= 0.0 || rect.is_zero_area() {
        return;
    }
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(color.r, color.g, color.b, 255));
    if opacity < 1.0 {
        ctx.push_opacity_layer(opacity);
    }
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(rect.x0, rect.y0, rect.x1, rect.y1));
    if opacity < 1.0 {
        ctx.pop_layer();
    }
}

fn draw_slot(ctx: &mut vello_cpu::RenderContext, m: &Material, rect: Rect) -> FlavorResult<()> {
    match &m.map {
        Some(tex) => draw_texture(ctx, tex, rect, m.effective_opacity()),
        None => {
            fill(ctx, rect, m.color, m.effective_opacity());
            Ok(())
        }
    }
}

fn draw_texture(
    ctx: &mut vello_cpu::RenderContext,
    tex: &RasterImage,
    rect: Rect,
    opacity: f32,
) -> FlavorResult<()> {
    if opacity <= 0.0 || rect.is_zero_area() || tex.width == 0 || tex.height == 0 {
        return Ok(());
    }
    let sx = rect.width() / f64::from(tex.width);
    let sy = rect.height() / f64::from(tex.height);
    let transform = Affine::translate((rect.x0, rect.y1)) * Affine::scale_non_uniform(sx, -sy);

    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(image_paint(tex)?);
    if opacity < 1.0 {
        ctx.push_opacity_layer(opacity);
    }
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(tex.width),
        f64::from(tex.height),
    ));
    if opacity < 1.0 {
        ctx.pop_layer();
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/flat.rs"]
mod tests;
