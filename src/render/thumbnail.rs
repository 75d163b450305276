use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::appearance::resolve::{DEFAULT_PLACEHOLDER_IMAGE, ResolvedAppearance, resolve_with};
use crate::assets::fetch::AssetFetch;
use crate::assets::shared::SharedModel;
use crate::compose::contain::render_contained_image;
use crate::compose::decode::decode_image;
use crate::compose::text::TextCompositor;
use crate::foundation::core::RasterImage;
use crate::foundation::error::{FlavorError, FlavorResult};
use crate::model::bag::Bag;
use crate::render::backend::{RenderScene, SceneRenderer};
use crate::render::display::{CardDisplay, CardId, PageStatus};
use crate::scene::binder::{BoundSlots, SlotNames, apply_image_texture, bind_appearance};
use crate::scene::graph::ModelInstance;
use crate::scene::view::ViewSetup;

/// Render progress of one bag card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ThumbState {
    /// Card placeholder inserted.
    Created,
    /// Waiting for the shared model.
    AssetsPending,
    /// Body and label rendered and presented.
    BodyReady,
    /// Waiting for the bag image.
    ImagePending,
    /// Done; nothing more will be drawn.
    Settled,
    /// Card removed after an error.
    Failed,
}

impl ThumbState {
    /// `true` for `Settled` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Settled | Self::Failed)
    }
}

/// A card whose render runs in the background.
#[derive(Debug)]
pub struct CardTask {
    /// Card inserted for the bag.
    pub card: CardId,
    /// Resolves to the card's terminal state.
    pub handle: JoinHandle<ThumbState>,
}

/// Renders gallery cards: one independent task per bag sharing the model, fonts, renderer and
/// display.
pub struct ThumbnailRenderer<F: AssetFetch> {
    fetch: Arc<F>,
    model: SharedModel<F>,
    text: TextCompositor,
    renderer: Arc<dyn SceneRenderer>,
    display: Arc<dyn CardDisplay>,
    view: ViewSetup,
    slot_names: SlotNames,
    placeholder: String,
}

impl<F: AssetFetch> ThumbnailRenderer<F> {
    /// Renderer loading the model from `model_source` with the thumbnail view preset.
    pub fn new(
        fetch: Arc<F>,
        model_source: impl Into<String>,
        text: TextCompositor,
        renderer: Arc<dyn SceneRenderer>,
        display: Arc<dyn CardDisplay>,
    ) -> Self {
        Self {
            model: SharedModel::new(Arc::clone(&fetch), model_source),
            fetch,
            text,
            renderer,
            display,
            view: ViewSetup::thumbnail(),
            slot_names: SlotNames::default(),
            placeholder: DEFAULT_PLACEHOLDER_IMAGE.to_owned(),
        }
    }

    /// Use `placeholder` when a bag has no image or its image fails.
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Use explicit slot names for role lookup.
    pub fn with_slot_names(mut self, names: SlotNames) -> Self {
        self.slot_names = names;
        self
    }

    /// Override the view preset.
    pub fn with_view(mut self, view: ViewSetup) -> Self {
        self.view = view;
        self
    }

    /// Display cards are drawn into.
    pub fn display(&self) -> &Arc<dyn CardDisplay> {
        &self.display
    }

    /// Shared model handle.
    pub fn model(&self) -> &SharedModel<F> {
        &self.model
    }

    /// Insert the card for `bag` and finish rendering it on its own task.
    ///
    /// The handle only reports the terminal state; dropping it does not stop the render.
    pub fn render_card(self: &Arc<Self>, bag: Bag) -> CardTask {
        let card = self.insert(&bag);
        let this = Arc::clone(self);
        let handle = tokio::spawn(async move { this.drive(card, &bag).await });
        CardTask { card, handle }
    }

    /// Render `bag` to completion on the current task.
    pub async fn run_card(&self, bag: &Bag) -> ThumbState {
        let card = self.insert(bag);
        self.drive(card, bag).await
    }

    fn insert(&self, bag: &Bag) -> CardId {
        let card = self
            .display
            .insert_card(bag.card_title(), bag.card_description());
        self.enter(card, ThumbState::Created);
        card
    }

    #[tracing::instrument(skip_all, fields(card = card.0, bag = bag.card_title()))]
    async fn drive(&self, card: CardId, bag: &Bag) -> ThumbState {
        self.enter(card, ThumbState::AssetsPending);
        let graph = match self.model.get().await {
            Ok(g) => g,
            Err(e) => {
                tracing::warn!(error = %e, "card dropped: base model unavailable");
                self.display.set_status(PageStatus::ModelLoadFailed);
                return self.fail(card);
            }
        };

        let appearance = resolve_with(bag, &self.placeholder);
        let mut instance = graph.instantiate();
        let slots = match self.draw_body(card, &mut instance, &appearance).await {
            Ok(slots) => slots,
            Err(e) => {
                tracing::warn!(error = %e, "card dropped: body render failed");
                return self.fail(card);
            }
        };
        self.enter(card, ThumbState::BodyReady);

        if slots.image.is_none() {
            return self.enter(card, ThumbState::Settled);
        }

        self.enter(card, ThumbState::ImagePending);
        match self.load_image_with_fallback(&appearance.image_source).await {
            Ok(texture) => {
                apply_image_texture(&mut instance, &slots, texture);
                match self.renderer.render(
                    RenderScene {
                        instance: &instance,
                        slots: &slots,
                    },
                    &self.view,
                ) {
                    Ok(frame) => self.display.present(card, &frame),
                    Err(e) => tracing::warn!(error = %e, "image render failed; keeping body frame"),
                }
            }
            Err(e) => tracing::warn!(error = %e, "image slot stays hidden"),
        }
        self.enter(card, ThumbState::Settled)
    }

    async fn draw_body(
        &self,
        card: CardId,
        instance: &mut ModelInstance,
        appearance: &ResolvedAppearance,
    ) -> FlavorResult<BoundSlots> {
        instance.fit_to_view(&self.view.fit);
        let text = self.text.clone();
        let (label, fill, font) = (
            appearance.label.clone(),
            appearance.text_fill,
            appearance.font,
        );
        let label = composite_blocking(move || text.render_text_label(&label, fill, font)).await?;
        let slots = bind_appearance(instance, appearance, label, &self.slot_names);
        let frame = self.renderer.render(
            RenderScene {
                instance: &*instance,
                slots: &slots,
            },
            &self.view,
        )?;
        self.display.present(card, &frame);
        Ok(slots)
    }

    async fn load_image_with_fallback(&self, source: &str) -> FlavorResult<RasterImage> {
        match self.load_image(source).await {
            Ok(img) => Ok(img),
            Err(e) if source != self.placeholder => {
                tracing::warn!(source, error = %e, "bag image failed; using placeholder");
                self.load_image(&self.placeholder).await
            }
            Err(e) => Err(e),
        }
    }

    async fn load_image(&self, source: &str) -> FlavorResult<RasterImage> {
        load_bag_image(self.fetch.as_ref(), source).await
    }

    fn fail(&self, card: CardId) -> ThumbState {
        let state = self.enter(card, ThumbState::Failed);
        self.display.remove_card(card);
        state
    }

    fn enter(&self, card: CardId, state: ThumbState) -> ThumbState {
        tracing::debug!(card = card.0, ?state, "card state");
        self.display.card_state(card, state);
        state
    }
}

/// Fetch, decode and contain-fit a bag image into the image-slot texture.
pub(crate) async fn load_bag_image<F: AssetFetch>(
    fetch: &F,
    source: &str,
) -> FlavorResult<RasterImage> {
    let bytes = fetch
        .fetch(source)
        .await
        .map_err(|e| FlavorError::image_load(format!("{source}: {e}")))?;
    let label = source.to_owned();
    composite_blocking(move || {
        let decoded =
            decode_image(&bytes).map_err(|e| FlavorError::image_load(format!("{label}: {e}")))?;
        render_contained_image(&decoded)
    })
    .await
}

/// Run CPU-heavy compositing on the blocking pool so card tasks keep interleaving.
pub(crate) async fn composite_blocking<T, C>(job: C) -> FlavorResult<T>
where
    T: Send + 'static,
    C: FnOnce() -> FlavorResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| FlavorError::render(format!("compositing task failed: {e}")))?
}

#[cfg(test)]
#[path = "../../tests/unit/render/thumbnail.rs"]
mod tests;
