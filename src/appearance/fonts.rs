use crate::model::bag::FontAlias;

/// Label font size in pixels (in the untransformed label canvas space).
pub const LABEL_FONT_SIZE_PX: f32 = 300.0;
/// Label font weight.
pub const LABEL_FONT_WEIGHT: u16 = 700;

/// A prioritized list of font family names ending in a generic family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FontStack {
    /// Alias this stack belongs to.
    pub alias: FontAlias,
    /// Family names, most preferred first; the last entry is a CSS generic family.
    pub families: &'static [&'static str],
}

const STANDARD: FontStack = FontStack {
    alias: FontAlias::Standard,
    families: &[
        "Helvetica Neue",
        "Helvetica",
        "Arial",
        "Segoe UI",
        "system-ui",
        "sans-serif",
    ],
};

const DECORATIVE: FontStack = FontStack {
    alias: FontAlias::Decorative,
    families: &[
        "Segoe Script",
        "Kaushan Script",
        "Courgette",
        "Sacramento",
        "cursive",
    ],
};

const CLASSIC: FontStack = FontStack {
    alias: FontAlias::Classic,
    families: &["Georgia", "Times New Roman", "Times", "serif"],
};

const GENERIC_FAMILIES: &[&str] = &[
    "serif",
    "sans-serif",
    "cursive",
    "fantasy",
    "monospace",
    "system-ui",
];

impl FontStack {
    /// The fixed stack for `alias`.
    pub fn for_alias(alias: FontAlias) -> &'static FontStack {
        match alias {
            FontAlias::Standard => &STANDARD,
            FontAlias::Decorative => &DECORATIVE,
            FontAlias::Classic => &CLASSIC,
        }
    }

    /// Generic fallback family (last entry).
    pub fn generic(&self) -> &'static str {
        self.families.last().copied().unwrap_or("sans-serif")
    }

    /// CSS `font-family` value. Named families containing spaces are single-quoted so the
    /// result can sit inside a double-quoted XML attribute.
    pub fn css_family_list(&self) -> String {
        self.families
            .iter()
            .map(|f| {
                if f.contains(' ') && !GENERIC_FAMILIES.contains(f) {
                    format!("'{f}'")
                } else {
                    (*f).to_owned()
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}
