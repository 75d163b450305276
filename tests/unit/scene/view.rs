use super::*;

#[test]
fn thumbnail_preset() {
    let v = ViewSetup::thumbnail();
    assert_eq!((v.width, v.height), (260, 240));
    assert_eq!(v.clear.to_hex(), "#f8f5ec");
    assert_eq!(v.camera.fov_deg, 45.0);
    assert_eq!(v.camera.position, Vec3::new(0.0, 0.6, 2.0));
    assert_eq!(v.fit.scale_factor, 2.2);
    assert!((v.fit.rotation.x - PI / 12.0).abs() < 1e-12);
    assert!((v.fit.rotation.y - PI / 6.0).abs() < 1e-12);
}

#[test]
fn configurator_preset_follows_viewport() {
    let v = ViewSetup::configurator(800, 600);
    assert!((v.aspect() - 800.0 / 600.0).abs() < 1e-12);
    assert_eq!(v.camera.position, Vec3::new(0.0, 0.8, 2.5));
    assert_eq!(v.fit.recenter, [false, true, true]);
}

#[test]
fn visible_height_grows_with_distance() {
    let c = ViewSetup::thumbnail().camera;
    let near = c.visible_height_at(1.0);
    let far = c.visible_height_at(-1.0);
    assert!(far > near);
    assert!((c.visible_height_at(0.0) - 2.0 * 2.0 * (22.5f64).to_radians().tan()).abs() < 1e-12);
}
