use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use crate::appearance::fonts::{FontStack, LABEL_FONT_SIZE_PX, LABEL_FONT_WEIGHT};
use crate::foundation::core::RasterImage;
use crate::foundation::error::{FlavorError, FlavorResult};
use crate::model::bag::{FontAlias, TextFill};

/// Label texture width; matches the model's label UV layout.
pub const LABEL_CANVAS_WIDTH: u32 = 2048;
/// Label texture height.
pub const LABEL_CANVAS_HEIGHT: u32 = 1024;
/// Vertical scale applied before drawing the label. Negative: the label UV is flipped.
pub const LABEL_SCALE_Y: f64 = -1.5;

/// Rasterizes flavor labels with a shared font database.
///
/// The font database is loaded once (system fonts plus any extra font directories) and shared
/// read-only between renders.
#[derive(Clone)]
pub struct TextCompositor {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for TextCompositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextCompositor")
            .field("faces", &self.fontdb.len())
            .finish()
    }
}

impl TextCompositor {
    /// Compositor over the system fonts.
    pub fn system() -> Self {
        Self::with_font_dirs(&[])
    }

    /// Compositor over the system fonts plus `.ttf`/`.otf`/`.ttc` files found in `dirs`
    /// (non-recursive; missing directories are skipped).
    pub fn with_font_dirs(dirs: &[PathBuf]) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        for dir in dirs {
            load_fonts_from_dir(&mut db, dir);
        }
        tracing::debug!(faces = db.len(), "label font database ready");
        Self {
            fontdb: Arc::new(db),
        }
    }

    /// Number of font faces available for label rendering.
    pub fn face_count(&self) -> usize {
        self.fontdb.len()
    }

    /// Render `text` as a 2048×1024 label texture.
    ///
    /// The canvas is scaled by `(1, -1.5)` and the text is centered on `(w/2, -h/2)` in that
    /// space, bold 300px, from the alias's font stack. Empty text yields a fully transparent
    /// image.
    #[tracing::instrument(skip(self))]
    pub fn render_text_label(
        &self,
        text: &str,
        fill: TextFill,
        font: FontAlias,
    ) -> FlavorResult<RasterImage> {
        if text.is_empty() {
            return Ok(RasterImage::transparent(
                LABEL_CANVAS_WIDTH,
                LABEL_CANVAS_HEIGHT,
            ));
        }

        let svg = label_svg(text, fill, font);
        let opts = usvg::Options {
            fontdb: self.fontdb.clone(),
            font_resolver: make_label_font_resolver(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&svg, &opts).context("parse label svg")?;

        let mut pixmap =
            resvg::tiny_skia::Pixmap::new(LABEL_CANVAS_WIDTH, LABEL_CANVAS_HEIGHT)
                .ok_or_else(|| FlavorError::render("failed to allocate label pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );

        RasterImage::from_premul(
            LABEL_CANVAS_WIDTH,
            LABEL_CANVAS_HEIGHT,
            pixmap.data().to_vec(),
        )
    }
}

/// SVG document drawing the label, equivalent to the 2D-canvas sequence
/// `scale(1, -1.5); fillText(text, w/2, -h/2)` with centered/middle alignment.
pub fn label_svg(text: &str, fill: TextFill, font: FontAlias) -> String {
    let w = LABEL_CANVAS_WIDTH;
    let h = LABEL_CANVAS_HEIGHT;
    let stack = FontStack::for_alias(font);
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            r#"<g transform="matrix(1 0 0 {sy} 0 0)">"#,
            r#"<text x="{x}" y="{y}" font-family="{family}" font-size="{size}" font-weight="{weight}" "#,
            r#"fill="{fill}" text-anchor="middle" dominant-baseline="central" xml:space="preserve">{text}</text>"#,
            r#"</g></svg>"#
        ),
        w = w,
        h = h,
        sy = LABEL_SCALE_Y,
        x = f64::from(w) / 2.0,
        y = -f64::from(h) / 2.0,
        family = stack.css_family_list(),
        size = LABEL_FONT_SIZE_PX,
        weight = LABEL_FONT_WEIGHT,
        fill = fill.css(),
        text = escape_xml(text),
    )
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c.is_control() && c != '\t' => {}
            c => out.push(c),
        }
    }
    out
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font");
        }
    }
}

fn make_label_font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<usvg::fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                });
            }

            // A stack whose generic family has no installed face still draws something.
            families.push(usvg::fontdb::Family::SansSerif);
            families.push(usvg::fontdb::Family::Serif);

            let style = match font.style() {
                usvg::FontStyle::Normal => usvg::fontdb::Style::Normal,
                usvg::FontStyle::Italic => usvg::fontdb::Style::Italic,
                usvg::FontStyle::Oblique => usvg::fontdb::Style::Oblique,
            };

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style,
            };

            if let Some(id) = fontdb.query(&query) {
                return Some(id);
            }
            fontdb.faces().next().map(|f| f.id)
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/text.rs"]
mod tests;
