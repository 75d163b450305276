use super::*;
use crate::appearance::resolve::resolve;
use crate::model::bag::Bag;
use crate::scene::binder::{BoundSlots, SlotNames, apply_image_texture, bind_appearance};
use crate::scene::graph::SceneGraph;

const BAG: &str = r##"{
  "bounds": {"min": {"x": -0.6, "y": -0.8, "z": -0.15}, "max": {"x": 0.6, "y": 0.8, "z": 0.15}},
  "nodes": [{"kind":"mesh"},{"kind":"mesh","color":"#ffd200"},{"kind":"mesh"},{"kind":"mesh"}]
}"##;

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> RasterImage {
    RasterImage::from_premul(w, h, rgba.repeat((w * h) as usize)).unwrap()
}

fn bound(colour: &str) -> (ModelInstance, BoundSlots) {
    let mut inst = SceneGraph::from_manifest_json(BAG.as_bytes())
        .unwrap()
        .instantiate();
    inst.fit_to_view(&ViewSetup::thumbnail().fit);
    let bag = Bag {
        colour: Some(colour.to_owned()),
        ..Bag::default()
    };
    let slots = bind_appearance(
        &mut inst,
        &resolve(&bag),
        RasterImage::transparent(8, 4),
        &SlotNames::default(),
    );
    (inst, slots)
}

fn center(r: Rect) -> (u32, u32) {
    (r.center().x as u32, r.center().y as u32)
}

#[test]
fn layout_is_centered_horizontally_and_inside_the_viewport() {
    let (inst, _) = bound("#00ff00");
    let view = ViewSetup::thumbnail();
    let l = card_layout(&inst, &view);
    assert!((l.bag.center().x - 130.0).abs() < 1e-9);
    assert!(l.facing_front);
    for r in [l.logo, l.text, l.image] {
        assert!(r.x0 > l.bag.x0 && r.x1 < l.bag.x1);
        assert!(r.y0 >= 0.0 && r.y1 <= f64::from(view.height));
    }
    assert!(l.logo.y1 <= l.text.y0 && l.text.y1 <= l.image.y0);
}

#[test]
fn body_and_background_colors() {
    let (inst, slots) = bound("#00ff00");
    let view = ViewSetup::thumbnail();
    let l = card_layout(&inst, &view);
    let frame = FlatRenderer::new()
        .render(RenderScene { instance: &inst, slots: &slots }, &view)
        .unwrap();

    assert_eq!(frame.pixel(2, 2), Some([0xf8, 0xf5, 0xec, 255]));
    let strip_x = (l.bag.x0 + l.bag.width() * 0.05) as u32;
    assert_eq!(frame.pixel(strip_x, center(l.text).1), Some([0, 255, 0, 255]));
    // Logo keeps its authored color.
    let (lx, ly) = center(l.logo);
    assert_eq!(frame.pixel(lx, ly), Some([0xff, 0xd2, 0x00, 255]));
    // Image slot is invisible until a texture arrives.
    let (ix, iy) = center(l.image);
    assert_eq!(frame.pixel(ix, iy), Some([0, 255, 0, 255]));
}

#[test]
fn image_texture_shows_after_apply() {
    let (mut inst, slots) = bound("#00ff00");
    apply_image_texture(&mut inst, &slots, solid(4, 4, [0, 0, 255, 255]));
    let view = ViewSetup::thumbnail();
    let l = card_layout(&inst, &view);
    let frame = FlatRenderer::new()
        .render(RenderScene { instance: &inst, slots: &slots }, &view)
        .unwrap();
    let (ix, iy) = center(l.image);
    assert_eq!(frame.pixel(ix, iy), Some([0, 0, 255, 255]));
}

#[test]
fn textures_are_drawn_upright() {
    let (mut inst, slots) = bound("#000000");
    // Bottom-up storage: row 0 is the visual bottom.
    let mut bytes = [255, 0, 0, 255].repeat(4);
    bytes.extend([255, 255, 255, 255].repeat(4));
    let tex = RasterImage::from_premul(2, 4, bytes).unwrap();
    apply_image_texture(&mut inst, &slots, tex);

    let view = ViewSetup::thumbnail();
    let l = card_layout(&inst, &view);
    let frame = FlatRenderer::new()
        .render(RenderScene { instance: &inst, slots: &slots }, &view)
        .unwrap();
    let x = l.image.center().x as u32;
    let top = (l.image.y0 + l.image.height() * 0.1) as u32;
    let bottom = (l.image.y0 + l.image.height() * 0.9) as u32;
    assert_eq!(frame.pixel(x, top), Some([255, 255, 255, 255]));
    assert_eq!(frame.pixel(x, bottom), Some([255, 0, 0, 255]));
}

#[test]
fn back_side_is_shaded() {
    let (mut inst, slots) = bound("#c8c8c8");
    inst.transform.rotation.y = std::f64::consts::PI;
    let view = ViewSetup::thumbnail();
    let l = card_layout(&inst, &view);
    assert!(!l.facing_front);
    let frame = FlatRenderer::new()
        .render(RenderScene { instance: &inst, slots: &slots }, &view)
        .unwrap();
    let (x, y) = center(l.bag);
    assert_eq!(frame.pixel(x, y), Some([120, 120, 120, 255]));
}

#[test]
fn rendering_is_deterministic() {
    let (inst, slots) = bound("#123456");
    let view = ViewSetup::thumbnail();
    let r = FlatRenderer::new();
    let a = r.render(RenderScene { instance: &inst, slots: &slots }, &view).unwrap();
    let b = r.render(RenderScene { instance: &inst, slots: &slots }, &view).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.into_raster().unwrap().width, 260);
}
