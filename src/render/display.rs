use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Context;

use crate::compose::decode::encode_png;
use crate::render::backend::FrameRGBA;
use crate::render::thumbnail::ThumbState;

/// Handle of a card in a [`CardDisplay`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardId(pub u64);

/// Page-level status line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PageStatus {
    /// List request in flight.
    Loading,
    /// Cards are showing.
    Ready,
    /// The list came back empty.
    Empty,
    /// The list request failed.
    LoadFailed,
    /// The shared model could not be loaded; no card can render.
    ModelLoadFailed,
}

impl PageStatus {
    /// Status text shown to the user.
    pub fn message(self) -> &'static str {
        match self {
            Self::Loading => "Loading bags…",
            Self::Ready => "",
            Self::Empty => "No bags yet. Be the first!",
            Self::LoadFailed => "Failed to load bags.",
            Self::ModelLoadFailed => "Failed to load 3D model.",
        }
    }

    /// Whether the busy indicator is shown.
    pub fn shows_spinner(self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// State of the "load more" button.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadMore {
    /// Whether the button can be pressed.
    pub enabled: bool,
    /// Button label.
    pub label: &'static str,
}

/// The page the gallery draws into.
///
/// Called from concurrent render tasks; every method takes `&self`.
pub trait CardDisplay: Send + Sync {
    /// Add a card placeholder and return its handle.
    fn insert_card(&self, title: &str, description: &str) -> CardId;
    /// Remove a card. Unknown handles are ignored.
    fn remove_card(&self, card: CardId);
    /// Show a rendered frame on a card.
    fn present(&self, card: CardId, frame: &FrameRGBA);
    /// Observe a card's render state.
    fn card_state(&self, _card: CardId, _state: ThumbState) {}
    /// Update the page status.
    fn set_status(&self, status: PageStatus);
    /// Update the load-more button.
    fn set_load_more(&self, state: LoadMore);
    /// Update a card's like marker.
    fn set_liked(&self, card: CardId, liked: bool);
}

/// Everything known about one card of an [`InMemoryDisplay`].
#[derive(Clone, Debug, PartialEq)]
pub struct CardRecord {
    /// Card title.
    pub title: String,
    /// Card description.
    pub description: String,
    /// Last presented frame.
    pub frame: Option<FrameRGBA>,
    /// Number of frames presented.
    pub presents: usize,
    /// States reported so far, in order.
    pub states: Vec<ThumbState>,
    /// Like marker.
    pub liked: bool,
}

#[derive(Debug, Default)]
struct PageModel {
    next_id: u64,
    cards: BTreeMap<CardId, CardRecord>,
    statuses: Vec<PageStatus>,
    load_more: Option<LoadMore>,
}

/// Display that keeps the page in memory. Used by tests and embedders.
#[derive(Debug, Default)]
pub struct InMemoryDisplay {
    page: Mutex<PageModel>,
}

impl InMemoryDisplay {
    /// Empty page.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, PageModel> {
        self.page.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of the cards currently on the page, in insertion order.
    pub fn cards(&self) -> Vec<(CardId, CardRecord)> {
        self.lock()
            .cards
            .iter()
            .map(|(id, c)| (*id, c.clone()))
            .collect()
    }

    /// Snapshot of one card.
    pub fn card(&self, card: CardId) -> Option<CardRecord> {
        self.lock().cards.get(&card).cloned()
    }

    /// Number of cards on the page.
    pub fn card_count(&self) -> usize {
        self.lock().cards.len()
    }

    /// Latest page status.
    pub fn status(&self) -> Option<PageStatus> {
        self.lock().statuses.last().copied()
    }

    /// Every status set so far.
    pub fn status_history(&self) -> Vec<PageStatus> {
        self.lock().statuses.clone()
    }

    /// Latest load-more state.
    pub fn load_more(&self) -> Option<LoadMore> {
        self.lock().load_more
    }
}

impl CardDisplay for InMemoryDisplay {
    fn insert_card(&self, title: &str, description: &str) -> CardId {
        let mut page = self.lock();
        let id = CardId(page.next_id);
        page.next_id += 1;
        page.cards.insert(
            id,
            CardRecord {
                title: title.to_owned(),
                description: description.to_owned(),
                frame: None,
                presents: 0,
                states: Vec::new(),
                liked: false,
            },
        );
        id
    }

    fn remove_card(&self, card: CardId) {
        self.lock().cards.remove(&card);
    }

    fn present(&self, card: CardId, frame: &FrameRGBA) {
        if let Some(c) = self.lock().cards.get_mut(&card) {
            c.frame = Some(frame.clone());
            c.presents += 1;
        }
    }

    fn card_state(&self, card: CardId, state: ThumbState) {
        if let Some(c) = self.lock().cards.get_mut(&card) {
            c.states.push(state);
        }
    }

    fn set_status(&self, status: PageStatus) {
        self.lock().statuses.push(status);
    }

    fn set_load_more(&self, state: LoadMore) {
        self.lock().load_more = Some(state);
    }

    fn set_liked(&self, card: CardId, liked: bool) {
        if let Some(c) = self.lock().cards.get_mut(&card) {
            c.liked = liked;
        }
    }
}

/// Display that writes each card's latest frame to `<dir>/card-NNN.png`.
#[derive(Debug)]
pub struct PngDirDisplay {
    dir: PathBuf,
    next_id: AtomicU64,
    titles: Mutex<BTreeMap<CardId, String>>,
}

impl PngDirDisplay {
    /// Write cards into `dir` (created if missing).
    pub fn new(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create output dir {}", dir.display()))?;
        Ok(Self {
            dir,
            next_id: AtomicU64::new(0),
            titles: Mutex::new(BTreeMap::new()),
        })
    }

    /// PNG path of a card.
    pub fn card_path(&self, card: CardId) -> PathBuf {
        self.dir.join(format!("card-{:03}.png", card.0))
    }

    /// Titles of the cards still on the page.
    pub fn titles(&self) -> Vec<(CardId, String)> {
        self.titles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(id, t)| (*id, t.clone()))
            .collect()
    }
}

impl CardDisplay for PngDirDisplay {
    fn insert_card(&self, title: &str, _description: &str) -> CardId {
        let id = CardId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.titles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, title.to_owned());
        id
    }

    fn remove_card(&self, card: CardId) {
        self.titles
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&card);
        let path = self.card_path(card);
        if path.exists()
            && let Err(e) = std::fs::remove_file(&path)
        {
            tracing::warn!(path = %path.display(), error = %e, "failed to remove card image");
        }
    }

    fn present(&self, card: CardId, frame: &FrameRGBA) {
        let path = self.card_path(card);
        let written = frame
            .clone()
            .into_raster()
            .and_then(|img| encode_png(&img))
            .map_err(anyhow::Error::from)
            .and_then(|png| std::fs::write(&path, png).map_err(anyhow::Error::from));
        match written {
            Ok(()) => tracing::debug!(path = %path.display(), "card written"),
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to write card"),
        }
    }

    fn set_status(&self, status: PageStatus) {
        if !status.message().is_empty() {
            tracing::info!(?status, "{}", status.message());
        }
    }

    fn set_load_more(&self, state: LoadMore) {
        tracing::debug!(enabled = state.enabled, label = state.label, "load more");
    }

    fn set_liked(&self, card: CardId, liked: bool) {
        tracing::info!(card = card.0, liked, "like toggled");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/display.rs"]
mod tests;
