use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinHandle;

use crate::api::client::{ApiClient, VOTE_FAILED};
use crate::assets::fetch::AssetFetch;
use crate::foundation::error::{FlavorError, FlavorResult};
use crate::gallery::pager::{LOAD_MORE_LABEL, PAGE_SIZE, Pager};
use crate::model::bag::{Bag, non_empty};
use crate::model::user::UserStore;
use crate::render::display::{CardDisplay, CardId, LoadMore, PageStatus};
use crate::render::thumbnail::{ThumbState, ThumbnailRenderer};

/// Voting without a stored user.
pub const NOT_LOGGED_IN: &str = "Please log in to vote";
/// Stored user without an id.
pub const USER_ID_MISSING: &str = "User ID not found";
/// Bag without an id.
pub const BAG_ID_MISSING: &str = "Bag ID not found";

/// A card the gallery put on the page.
#[derive(Clone, Debug, PartialEq)]
pub struct GalleryCard {
    /// Display handle.
    pub card: CardId,
    /// Bag shown on the card.
    pub bag: Bag,
    /// Like marker.
    pub liked: bool,
}

#[derive(Debug)]
struct GalleryState {
    bags: Vec<Bag>,
    pager: Pager,
    cards: Vec<GalleryCard>,
}

/// The bag list page: fetches bags, renders them a page at a time and handles like, delete and
/// edit actions on the cards.
pub struct Gallery<F: AssetFetch> {
    api: ApiClient,
    thumbs: Arc<ThumbnailRenderer<F>>,
    users: UserStore,
    page_size: usize,
    state: Arc<Mutex<GalleryState>>,
}

impl<F: AssetFetch> Gallery<F> {
    /// Gallery drawing into the thumbnail renderer's display.
    pub fn new(api: ApiClient, thumbs: Arc<ThumbnailRenderer<F>>, users: UserStore) -> Self {
        Self {
            api,
            thumbs,
            users,
            page_size: PAGE_SIZE,
            state: Arc::new(Mutex::new(GalleryState {
                bags: Vec::new(),
                pager: Pager::new(0, PAGE_SIZE),
                cards: Vec::new(),
            })),
        }
    }

    /// Override the page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn display(&self) -> &Arc<dyn CardDisplay> {
        self.thumbs.display()
    }

    fn lock(&self) -> MutexGuard<'_, GalleryState> {
        lock_state(&self.state)
    }

    /// Fetch the bag list and render the first page.
    ///
    /// An empty list shows the empty state, a failed request the failure state; the load-more
    /// button is disabled in both.
    #[tracing::instrument(skip(self))]
    pub async fn load(&self) -> FlavorResult<Vec<JoinHandle<ThumbState>>> {
        let display = self.display();
        display.set_status(PageStatus::Loading);

        let bags = match self.api.list_bags().await {
            Ok(bags) => bags,
            Err(e) => {
                tracing::error!(error = %e, "bag list failed");
                display.set_status(PageStatus::LoadFailed);
                display.set_load_more(LoadMore {
                    enabled: false,
                    label: LOAD_MORE_LABEL,
                });
                return Err(e);
            }
        };
        {
            let mut st = self.lock();
            st.pager = Pager::new(bags.len(), self.page_size);
            st.bags = bags;
        }

        if self.lock().bags.is_empty() {
            display.set_status(PageStatus::Empty);
            display.set_load_more(LoadMore {
                enabled: false,
                label: LOAD_MORE_LABEL,
            });
            return Ok(Vec::new());
        }
        display.set_status(PageStatus::Ready);
        Ok(self.render_next_page())
    }

    /// Render the next page of bags. Returns the render handles; they may be dropped.
    ///
    /// A card whose render fails is removed from the display by the renderer and from
    /// [`Gallery::cards`] before its handle resolves.
    pub fn render_next_page(&self) -> Vec<JoinHandle<ThumbState>> {
        let (page, load_more) = {
            let mut st = self.lock();
            let range = st.pager.next_range();
            (st.bags[range].to_vec(), st.pager.load_more())
        };
        tracing::debug!(count = page.len(), "rendering page");

        let mut handles = Vec::with_capacity(page.len());
        for bag in page {
            let task = self.thumbs.render_card(bag.clone());
            let card = task.card;
            self.lock().cards.push(GalleryCard {
                card,
                bag,
                liked: false,
            });

            let state = Arc::clone(&self.state);
            let display = Arc::clone(self.display());
            handles.push(tokio::spawn(async move {
                let outcome = match task.handle.await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        tracing::error!(card = card.0, error = %e, "card task aborted");
                        display.remove_card(card);
                        ThumbState::Failed
                    }
                };
                if outcome == ThumbState::Failed {
                    lock_state(&state).cards.retain(|c| c.card != card);
                }
                outcome
            }));
        }
        self.display().set_load_more(load_more);
        handles
    }

    /// Number of bags fetched.
    pub fn bag_count(&self) -> usize {
        self.lock().bags.len()
    }

    /// Cards currently on the page, in render order.
    pub fn cards(&self) -> Vec<GalleryCard> {
        self.lock().cards.clone()
    }

    /// Current load-more state.
    pub fn load_more(&self) -> LoadMore {
        self.lock().pager.load_more()
    }

    fn card(&self, card: CardId) -> FlavorResult<GalleryCard> {
        self.lock()
            .cards
            .iter()
            .find(|c| c.card == card)
            .cloned()
            .ok_or_else(|| FlavorError::validation(BAG_ID_MISSING))
    }

    /// Vote for a card's bag and flip its like marker.
    ///
    /// Needs a stored user with an id and a bag with an id. The marker only changes after the
    /// server accepted the vote; it is never reconciled with server state afterwards. Returns
    /// the new marker.
    #[tracing::instrument(skip(self))]
    pub async fn toggle_like(&self, card: CardId) -> FlavorResult<bool> {
        let user = match self.users.load() {
            Ok(Some(user)) => user,
            Ok(None) => return Err(FlavorError::validation(NOT_LOGGED_IN)),
            Err(e) => {
                tracing::warn!(error = %e, "stored user unreadable");
                return Err(FlavorError::network(VOTE_FAILED));
            }
        };
        let user_id = non_empty(user.id.as_deref())
            .ok_or_else(|| FlavorError::validation(USER_ID_MISSING))?
            .to_owned();
        let entry = self.card(card)?;
        let bag_id = non_empty(entry.bag.id.as_deref())
            .ok_or_else(|| FlavorError::validation(BAG_ID_MISSING))?
            .to_owned();

        self.api.vote(&bag_id, &user_id).await?;

        let liked = {
            let mut st = self.lock();
            match st.cards.iter_mut().find(|c| c.card == card) {
                Some(c) => {
                    c.liked = !c.liked;
                    c.liked
                }
                None => !entry.liked,
            }
        };
        self.display().set_liked(card, liked);
        Ok(liked)
    }

    /// Delete a card's bag on the server and drop the card. The last card leaving switches the
    /// page to the empty state.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, card: CardId) -> FlavorResult<()> {
        let entry = self.card(card)?;
        let bag_id = non_empty(entry.bag.id.as_deref())
            .ok_or_else(|| FlavorError::validation(BAG_ID_MISSING))?
            .to_owned();

        self.api.delete_bag(&bag_id).await?;

        let now_empty = {
            let mut st = self.lock();
            st.cards.retain(|c| c.card != card);
            st.cards.is_empty()
        };
        self.display().remove_card(card);
        if now_empty {
            self.display().set_status(PageStatus::Empty);
        }
        Ok(())
    }

    /// Configurator link for editing a card's bag.
    pub fn edit_link(&self, card: CardId) -> FlavorResult<String> {
        let entry = self.card(card)?;
        let id = non_empty(entry.bag.id.as_deref())
            .ok_or_else(|| FlavorError::validation(BAG_ID_MISSING))?;
        Ok(format!("/configurator.html?edit={id}"))
    }
}

fn lock_state(state: &Mutex<GalleryState>) -> MutexGuard<'_, GalleryState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
