use crate::appearance::fonts::FontStack;
use crate::foundation::core::Rgb8;
use crate::model::bag::{Bag, FontAlias, TextFill, non_empty};

/// Body color used when a bag has no valid `colour`.
pub const DEFAULT_BODY_COLOR: Rgb8 = Rgb8::new(0xb6, 0x35, 0x2a);
/// Label printed when a bag has no name.
pub const DEFAULT_LABEL: &str = "Classic";
/// Built-in placeholder image source.
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "/assets/chipspreview.png";

/// Concrete rendering parameters derived from a [`Bag`].
///
/// Recomputed for every render; never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedAppearance {
    /// Tint of the body slot.
    pub body_color: Rgb8,
    /// Selected font alias.
    pub font: FontAlias,
    /// Font stack for `font`.
    pub font_stack: &'static FontStack,
    /// Label fill.
    pub text_fill: TextFill,
    /// Text printed on the label.
    pub label: String,
    /// Image to load for the image slot.
    pub image_source: String,
}

impl ResolvedAppearance {
    /// `true` when the image source is the placeholder itself.
    pub fn uses_placeholder(&self, placeholder: &str) -> bool {
        self.image_source == placeholder
    }
}

/// Resolve `bag` against the built-in placeholder.
pub fn resolve(bag: &Bag) -> ResolvedAppearance {
    resolve_with(bag, DEFAULT_PLACEHOLDER_IMAGE)
}

/// Resolve `bag`, substituting `placeholder` when it has no image.
///
/// Total: every field falls back to its default on missing or unrecognized input.
pub fn resolve_with(bag: &Bag, placeholder: &str) -> ResolvedAppearance {
    let body_color = bag
        .colour
        .as_deref()
        .and_then(Rgb8::parse_hex)
        .unwrap_or(DEFAULT_BODY_COLOR);
    let font = bag.font_alias();

    ResolvedAppearance {
        body_color,
        font,
        font_stack: FontStack::for_alias(font),
        text_fill: bag.text_fill(),
        label: non_empty(bag.name.as_deref())
            .unwrap_or(DEFAULT_LABEL)
            .to_owned(),
        image_source: non_empty(bag.bag_image.as_deref())
            .unwrap_or(placeholder)
            .to_owned(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/appearance/resolve.rs"]
mod tests;
