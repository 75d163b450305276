use super::*;
use crate::appearance::resolve::resolve;
use crate::model::bag::Bag;
use crate::scene::graph::SceneGraph;

fn positional() -> ModelInstance {
    let json = r##"{"nodes":[{"name":"Root","kind":"group","children":[
        {"name":"Mesh_0","kind":"mesh"},
        {"name":"Bone","kind":"bone"},
        {"name":"Mesh_1","kind":"mesh","color":"#123456"},
        {"name":"Mesh_2","kind":"skinned_mesh","skeleton":["Bone"]},
        {"name":"Mesh_3","kind":"mesh"},
        {"name":"Mesh_4","kind":"mesh"}
    ]}]}"##;
    SceneGraph::from_manifest_json(json.as_bytes()).unwrap().instantiate()
}

fn texture() -> RasterImage {
    RasterImage::from_premul(1, 1, vec![10, 20, 30, 255]).unwrap()
}

fn material(inst: &ModelInstance, id: Option<NodeId>) -> &Material {
    inst.graph.node(id.unwrap()).unwrap().material.as_ref().unwrap()
}

#[test]
fn positional_roles_follow_traversal_order() {
    let inst = positional();
    let slots = locate_slots(&inst, &SlotNames::default());
    assert_eq!(slots.lookup, SlotLookup::Positional);
    assert_eq!(slots.body, Some(NodeId(1)));
    assert_eq!(slots.logo, Some(NodeId(3)));
    assert_eq!(slots.text, Some(NodeId(4)));
    assert_eq!(slots.image, Some(NodeId(5)));
}

#[test]
fn bind_sets_slot_materials() {
    let mut inst = positional();
    let bag = Bag {
        colour: Some("#00ff00".to_owned()),
        ..Bag::default()
    };
    let slots = bind_appearance(&mut inst, &resolve(&bag), texture(), &SlotNames::default());

    let body = material(&inst, slots.body);
    assert_eq!(body.color, Rgb8::new(0, 0xff, 0));
    assert_eq!(body.effective_opacity(), 1.0);
    assert_eq!(body.shading, Shading::Standard { metalness: 0.1, roughness: 0.3 });

    let logo = material(&inst, slots.logo);
    assert_eq!(logo.color, Rgb8::new(0x12, 0x34, 0x56));

    let text = material(&inst, slots.text);
    assert!(text.transparent);
    assert_eq!(text.opacity, 1.0);
    assert_eq!(text.map, Some(texture()));

    let image = material(&inst, slots.image);
    assert!(image.is_invisible());
    assert_eq!(image.shading, Shading::Basic { tone_mapped: false });
    assert!(image.map.is_none());
}

#[test]
fn image_texture_raises_opacity() {
    let mut inst = positional();
    let slots = bind_appearance(&mut inst, &resolve(&Bag::default()), texture(), &SlotNames::default());
    assert!(apply_image_texture(&mut inst, &slots, texture()));
    let image = material(&inst, slots.image);
    assert_eq!(image.effective_opacity(), 1.0);
    assert!(image.map.is_some());
}

#[test]
fn missing_roles_are_left_unbound() {
    let json = r#"{"nodes":[{"name":"A","kind":"mesh"},{"name":"B","kind":"mesh"}]}"#;
    let mut inst = SceneGraph::from_manifest_json(json.as_bytes()).unwrap().instantiate();
    let slots = bind_appearance(&mut inst, &resolve(&Bag::default()), texture(), &SlotNames::default());
    assert!(slots.body.is_some() && slots.logo.is_some());
    assert_eq!(slots.text, None);
    assert_eq!(slots.image, None);
    assert!(!apply_image_texture(&mut inst, &slots, texture()));
}

#[test]
fn named_lookup_takes_precedence() {
    let json = r#"{"nodes":[
        {"name":"Label","kind":"mesh"},
        {"name":"Shell","kind":"mesh"},
        {"name":"Picture","kind":"mesh"},
        {"name":"Other","kind":"mesh"}
    ]}"#;
    let inst = SceneGraph::from_manifest_json(json.as_bytes()).unwrap().instantiate();
    let names = SlotNames {
        body: "shell".to_owned(),
        logo: "missing".to_owned(),
        text: "LABEL".to_owned(),
        image: "picture".to_owned(),
    };
    let slots = locate_slots(&inst, &names);
    assert_eq!(slots.lookup, SlotLookup::Named);
    assert_eq!(slots.body, Some(NodeId(1)));
    assert_eq!(slots.logo, None);
    assert_eq!(slots.text, Some(NodeId(0)));
    assert_eq!(slots.image, Some(NodeId(2)));
}

#[test]
fn binding_one_instance_leaves_siblings_untouched() {
    let json = r#"{"nodes":[{"kind":"mesh"},{"kind":"mesh"},{"kind":"mesh"},{"kind":"mesh"}]}"#;
    let shared = SceneGraph::from_manifest_json(json.as_bytes()).unwrap();
    let mut a = shared.instantiate();
    let b = shared.instantiate();
    bind_appearance(&mut a, &resolve(&Bag::default()), texture(), &SlotNames::default());
    assert_eq!(b.graph, shared);
    assert_ne!(a.graph, shared);
}
