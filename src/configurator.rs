use std::path::Path;

use anyhow::Context;

use crate::api::client::ApiClient;
use crate::appearance::resolve::{DEFAULT_BODY_COLOR, resolve_with};
use crate::assets::fetch::{AssetFetch, encode_data_url};
use crate::compose::text::TextCompositor;
use crate::foundation::core::Rgb8;
use crate::foundation::error::{FlavorError, FlavorResult};
use crate::model::bag::{Bag, FontAlias, TextFill, non_empty};
use crate::render::backend::{FrameRGBA, RenderScene, SceneRenderer};
use crate::render::thumbnail::{composite_blocking, load_bag_image};
use crate::scene::binder::{SlotNames, apply_image_texture, bind_appearance};
use crate::scene::graph::SceneGraph;
use crate::scene::view::ViewSetup;

/// Radians of model turn per pixel of horizontal drag.
pub const DRAG_SPEED: f64 = 0.005;
/// Status after a successful submit.
pub const SAVED: &str = "Saved!";
/// Status while a submit is in flight.
pub const SAVING: &str = "Saving…";

/// Body colors offered as swatches.
pub const DEFAULT_PALETTE: [Rgb8; 6] = [
    DEFAULT_BODY_COLOR,
    Rgb8::new(0xf2, 0xc2, 0x30),
    Rgb8::new(0x1f, 0x6f, 0xb2),
    Rgb8::new(0x2e, 0x8b, 0x57),
    Rgb8::new(0x6a, 0x3d, 0x9a),
    Rgb8::new(0x11, 0x11, 0x11),
];

/// The bag being designed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Draft {
    /// Printed flavor name.
    pub name: String,
    /// Description; the name stands in when empty.
    pub flavor: String,
    /// Body color.
    pub colour: Rgb8,
    /// Label fill.
    pub text_fill: TextFill,
    /// Label font.
    pub font: FontAlias,
    /// Picture reference (`data:` URL after an upload).
    pub image: Option<String>,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            name: String::new(),
            flavor: String::new(),
            colour: DEFAULT_BODY_COLOR,
            text_fill: TextFill::default(),
            font: FontAlias::default(),
            image: None,
        }
    }
}

/// State of the configurator page: draft bag, swatch selection, drag-to-rotate and status.
#[derive(Clone, Debug)]
pub struct ConfiguratorSession {
    palette: Vec<Rgb8>,
    selected: Option<usize>,
    draft: Draft,
    editing: Option<String>,
    rotation_y: f64,
    drag_x: Option<f64>,
    status: String,
}

impl Default for ConfiguratorSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfiguratorSession {
    /// Fresh session with the default palette and its first swatch selected.
    pub fn new() -> Self {
        Self::with_palette(DEFAULT_PALETTE.to_vec())
    }

    /// Fresh session over `palette`.
    pub fn with_palette(palette: Vec<Rgb8>) -> Self {
        let draft = Draft {
            colour: palette.first().copied().unwrap_or(DEFAULT_BODY_COLOR),
            ..Draft::default()
        };
        let selected = (!palette.is_empty()).then_some(0);
        Self {
            palette,
            selected,
            draft,
            editing: None,
            rotation_y: ViewSetup::configurator(1, 1).fit.rotation.y,
            drag_x: None,
            status: String::new(),
        }
    }

    /// Session editing an existing bag.
    pub fn from_bag(bag: &Bag) -> Self {
        let mut s = Self::new();
        let appearance = resolve_with(bag, "");
        s.draft = Draft {
            name: non_empty(bag.name.as_deref()).unwrap_or_default().to_owned(),
            flavor: non_empty(bag.flavor.as_deref()).unwrap_or_default().to_owned(),
            colour: appearance.body_color,
            text_fill: appearance.text_fill,
            font: appearance.font,
            image: non_empty(bag.bag_image.as_deref()).map(str::to_owned),
        };
        s.selected = s.palette.iter().position(|c| *c == s.draft.colour);
        s.editing = bag.id.clone();
        s
    }

    /// Current draft.
    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Swatch colors.
    pub fn palette(&self) -> &[Rgb8] {
        &self.palette
    }

    /// Index of the selected swatch; `None` for a custom color.
    pub fn selected_swatch(&self) -> Option<usize> {
        self.selected
    }

    /// Id of the bag being edited.
    pub fn editing_id(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    /// Status line.
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Model turn around the vertical axis, radians.
    pub fn rotation_y(&self) -> f64 {
        self.rotation_y
    }

    /// Pick a swatch as body color.
    pub fn select_swatch(&mut self, index: usize) -> FlavorResult<Rgb8> {
        let colour = *self
            .palette
            .get(index)
            .ok_or_else(|| FlavorError::validation(format!("no swatch {index}")))?;
        self.selected = Some(index);
        self.draft.colour = colour;
        Ok(colour)
    }

    /// Set a custom body color from hex. A color that equals a swatch selects it.
    pub fn set_custom_colour(&mut self, hex: &str) -> FlavorResult<Rgb8> {
        let colour = Rgb8::parse_hex(hex)
            .ok_or_else(|| FlavorError::validation(format!("invalid color '{hex}'")))?;
        self.draft.colour = colour;
        self.selected = self.palette.iter().position(|c| *c == colour);
        Ok(colour)
    }

    /// Set the printed name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.draft.name = name.into();
    }

    /// Set the description.
    pub fn set_flavor(&mut self, flavor: impl Into<String>) {
        self.draft.flavor = flavor.into();
    }

    /// Set the label font.
    pub fn set_font(&mut self, font: FontAlias) {
        self.draft.font = font;
    }

    /// Set the label fill.
    pub fn set_text_fill(&mut self, fill: TextFill) {
        self.draft.text_fill = fill;
    }

    /// Attach image bytes; they are stored inline as a `data:` URL.
    pub fn attach_image(&mut self, bytes: &[u8]) -> FlavorResult<()> {
        let format = image::guess_format(bytes)
            .map_err(|e| FlavorError::validation(format!("unsupported image: {e}")))?;
        self.draft.image = Some(encode_data_url(format.to_mime_type(), bytes));
        Ok(())
    }

    /// Attach an image file.
    pub fn attach_image_file(&mut self, path: &Path) -> FlavorResult<()> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read image {}", path.display()))?;
        self.attach_image(&bytes)
    }

    /// Drop the picture.
    pub fn clear_image(&mut self) {
        self.draft.image = None;
    }

    /// Start a drag at horizontal position `x`.
    pub fn pointer_down(&mut self, x: f64) {
        self.drag_x = Some(x);
    }

    /// Move the pointer; turns the model while dragging. Returns whether it turned.
    pub fn pointer_move(&mut self, x: f64) -> bool {
        let Some(last) = self.drag_x else {
            return false;
        };
        self.rotation_y += (x - last) * DRAG_SPEED;
        self.drag_x = Some(x);
        true
    }

    /// End (or cancel) a drag.
    pub fn pointer_up(&mut self) {
        self.drag_x = None;
    }

    /// Bag record for the draft. The description falls back to the name.
    pub fn to_bag(&self) -> Bag {
        let d = &self.draft;
        let name = non_empty(Some(d.name.trim())).map(str::to_owned);
        let flavor = non_empty(Some(d.flavor.trim()))
            .map(str::to_owned)
            .or_else(|| name.clone());
        Bag {
            id: self.editing.clone(),
            name,
            flavor,
            colour: Some(d.colour.to_hex()),
            text_colour: Some(d.text_fill.as_str().to_owned()),
            font: Some(d.font.as_str().to_owned()),
            bag_image: d.image.clone(),
        }
    }

    /// POST the draft. Success sets the status to "Saved!", failure to the error's message.
    /// Nothing is retried.
    #[tracing::instrument(skip_all)]
    pub async fn submit(&mut self, api: &ApiClient) -> FlavorResult<Bag> {
        self.status = SAVING.to_owned();
        let mut bag = self.to_bag();
        bag.id = None;
        match api.create_bag(&bag).await {
            Ok(saved) => {
                tracing::info!(id = saved.id.as_deref(), "bag saved");
                self.status = SAVED.to_owned();
                Ok(saved)
            }
            Err(e) => {
                tracing::warn!(error = %e, "save failed");
                self.status = e.user_message();
                Err(e)
            }
        }
    }

    /// Render the draft with the configurator view. An image that fails to load stays hidden.
    pub async fn preview<F: AssetFetch>(
        &self,
        model: &SceneGraph,
        text: &TextCompositor,
        renderer: &dyn SceneRenderer,
        fetch: &F,
        view: &ViewSetup,
        names: &SlotNames,
    ) -> FlavorResult<FrameRGBA> {
        let appearance = resolve_with(&self.to_bag(), "");
        let mut instance = model.instantiate();
        instance.fit_to_view(&view.fit);
        instance.transform.rotation.y = self.rotation_y;

        let compositor = text.clone();
        let (label, fill, font) = (
            appearance.label.clone(),
            appearance.text_fill,
            appearance.font,
        );
        let label =
            composite_blocking(move || compositor.render_text_label(&label, fill, font)).await?;
        let slots = bind_appearance(&mut instance, &appearance, label, names);
        if let Some(source) = self.draft.image.as_deref() {
            match load_bag_image(fetch, source).await {
                Ok(texture) => {
                    apply_image_texture(&mut instance, &slots, texture);
                }
                Err(e) => tracing::warn!(error = %e, "preview image hidden"),
            }
        }
        renderer.render(
            RenderScene {
                instance: &instance,
                slots: &slots,
            },
            view,
        )
    }
}

#[cfg(test)]
#[path = "../tests/unit/configurator.rs"]
mod tests;
