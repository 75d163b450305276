use std::sync::LazyLock;

use super::*;

static COMPOSITOR: LazyLock<TextCompositor> = LazyLock::new(TextCompositor::system);

#[test]
fn empty_text_is_fully_transparent() {
    for fill in [TextFill::White, TextFill::Black] {
        for font in [FontAlias::Standard, FontAlias::Decorative, FontAlias::Classic] {
            let img = COMPOSITOR.render_text_label("", fill, font).unwrap();
            assert_eq!((img.width, img.height), (2048, 1024));
            assert!(img.is_fully_transparent());
        }
    }
}

#[test]
fn label_is_deterministic() {
    let a = COMPOSITOR
        .render_text_label("Spicy", TextFill::Black, FontAlias::Classic)
        .unwrap();
    let b = COMPOSITOR
        .render_text_label("Spicy", TextFill::Black, FontAlias::Classic)
        .unwrap();
    assert_eq!((a.width, a.height), (LABEL_CANVAS_WIDTH, LABEL_CANVAS_HEIGHT));
    assert_eq!(a.fingerprint(), b.fingerprint());
    assert_eq!(a, b);
}

#[test]
fn label_svg_encodes_transform_alignment_and_stack() {
    let svg = label_svg("Salt & <Vinegar>", TextFill::Black, FontAlias::Classic);
    assert!(svg.contains(r#"width="2048" height="1024""#));
    assert!(svg.contains(r#"transform="matrix(1 0 0 -1.5 0 0)""#));
    assert!(svg.contains(r#"x="1024" y="-512""#));
    assert!(svg.contains(r#"text-anchor="middle""#));
    assert!(svg.contains(r#"font-weight="700""#));
    assert!(svg.contains(r#"font-size="300""#));
    assert!(svg.contains(r##"fill="#000""##));
    assert!(svg.contains("font-family=\"Georgia, 'Times New Roman', Times, serif\""));
    assert!(svg.contains("Salt &amp; &lt;Vinegar&gt;"));

    let svg = label_svg("x", TextFill::White, FontAlias::Decorative);
    assert!(svg.contains(r##"fill="#fff""##));
    assert!(svg.contains("cursive"));
}

#[test]
fn label_svg_parses() {
    let svg = label_svg("Quote \" ' \u{7}", TextFill::White, FontAlias::Standard);
    let opts = usvg::Options::default();
    usvg::Tree::from_str(&svg, &opts).unwrap();
}
