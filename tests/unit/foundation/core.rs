use super::*;

#[test]
fn parses_short_and_long_hex() {
    assert_eq!(Rgb8::parse_hex("#00ff00"), Some(Rgb8::new(0, 255, 0)));
    assert_eq!(Rgb8::parse_hex("#00FF00"), Some(Rgb8::new(0, 255, 0)));
    assert_eq!(Rgb8::parse_hex("#f0a"), Some(Rgb8::new(255, 0, 170)));
    assert_eq!(Rgb8::parse_hex("#b6352a").unwrap().to_hex(), "#b6352a");
}

#[test]
fn rejects_malformed_hex() {
    for s in ["", "#", "00ff00", "#00ff0", "#00ff00ff", "#gg0000", "red", "#+1ff00"] {
        assert_eq!(Rgb8::parse_hex(s), None, "{s:?} should be rejected");
    }
}

#[test]
fn raster_length_is_validated() {
    assert!(RasterImage::from_premul(2, 2, vec![0; 16]).is_ok());
    assert!(RasterImage::from_premul(2, 2, vec![0; 15]).is_err());
}

#[test]
fn transparent_raster_and_pixels() {
    let img = RasterImage::transparent(3, 2);
    assert!(img.is_fully_transparent());
    assert_eq!(img.pixel(2, 1), Some([0, 0, 0, 0]));
    assert_eq!(img.pixel(3, 0), None);

    let solid = RasterImage::from_premul(1, 1, vec![10, 20, 30, 255]).unwrap();
    assert!(!solid.is_fully_transparent());
    assert_eq!(solid.pixel(0, 0), Some([10, 20, 30, 255]));
}

#[test]
fn fingerprint_tracks_content_and_shape() {
    let a = RasterImage::from_premul(2, 1, vec![1, 2, 3, 255, 4, 5, 6, 255]).unwrap();
    let b = RasterImage::from_premul(2, 1, vec![1, 2, 3, 255, 4, 5, 6, 255]).unwrap();
    let c = RasterImage::from_premul(1, 2, vec![1, 2, 3, 255, 4, 5, 6, 255]).unwrap();
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_ne!(a.fingerprint(), c.fingerprint());
}

#[test]
fn premultiply_roundtrips_opaque_and_clears_invisible() {
    let mut px = vec![100u8, 50, 200, 255, 9, 9, 9, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![100, 50, 200, 255, 0, 0, 0, 0]);

    let img = RasterImage::from_premul(1, 1, vec![64, 0, 0, 128]).unwrap();
    let straight = img.to_straight_rgba().unwrap();
    assert_eq!(straight.get_pixel(0, 0).0, [128, 0, 0, 128]);
}
