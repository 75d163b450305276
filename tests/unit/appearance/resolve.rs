use super::*;

fn bag_with_colour(c: Option<&str>) -> Bag {
    Bag {
        colour: c.map(str::to_owned),
        ..Bag::default()
    }
}

#[test]
fn valid_hex_colors_pass_through() {
    for (s, rgb) in [
        ("#00ff00", Rgb8::new(0, 255, 0)),
        ("#00FF00", Rgb8::new(0, 255, 0)),
        ("#123456", Rgb8::new(0x12, 0x34, 0x56)),
        ("#fff", Rgb8::new(255, 255, 255)),
    ] {
        assert_eq!(resolve(&bag_with_colour(Some(s))).body_color, rgb, "{s}");
    }
}

#[test]
fn every_byte_value_survives_resolution() {
    for v in 0..=255u8 {
        let hex = format!("#{v:02x}{:02x}{v:02X}", 255 - v);
        let got = resolve(&bag_with_colour(Some(&hex))).body_color;
        assert_eq!(got, Rgb8::new(v, 255 - v, v));
    }
}

#[test]
fn invalid_colors_use_default() {
    for c in [None, Some(""), Some("green"), Some("#12345"), Some("123456"), Some("#zzzzzz")] {
        assert_eq!(
            resolve(&bag_with_colour(c)).body_color,
            DEFAULT_BODY_COLOR,
            "{c:?}"
        );
    }
    assert_eq!(DEFAULT_BODY_COLOR.to_hex(), "#b6352a");
}

#[test]
fn empty_bag_resolves_to_defaults() {
    let a = resolve(&Bag::default());
    assert_eq!(a.font, FontAlias::Standard);
    assert_eq!(a.font_stack.generic(), "sans-serif");
    assert_eq!(a.text_fill, TextFill::White);
    assert_eq!(a.label, DEFAULT_LABEL);
    assert_eq!(a.image_source, DEFAULT_PLACEHOLDER_IMAGE);
    assert!(a.uses_placeholder(DEFAULT_PLACEHOLDER_IMAGE));
}

#[test]
fn spicy_bag_resolves_fields() {
    let bag = Bag {
        name: Some("Spicy".to_string()),
        colour: Some("#00ff00".to_string()),
        text_colour: Some("black".to_string()),
        font: Some("classic".to_string()),
        bag_image: Some("https://invalid.example/nope.png".to_string()),
        ..Bag::default()
    };
    let a = resolve_with(&bag, "/assets/p.png");
    assert_eq!(a.body_color, Rgb8::new(0, 255, 0));
    assert_eq!(a.text_fill, TextFill::Black);
    assert_eq!(a.font, FontAlias::Classic);
    assert_eq!(a.font_stack.families.first(), Some(&"Georgia"));
    assert_eq!(a.font_stack.generic(), "serif");
    assert_eq!(a.label, "Spicy");
    assert_eq!(a.image_source, "https://invalid.example/nope.png");
    assert!(!a.uses_placeholder("/assets/p.png"));
}

#[test]
fn css_family_list_quotes_spaced_names() {
    let stack = crate::appearance::fonts::FontStack::for_alias(FontAlias::Standard);
    assert_eq!(
        stack.css_family_list(),
        "'Helvetica Neue', Helvetica, Arial, 'Segoe UI', system-ui, sans-serif"
    );
}
