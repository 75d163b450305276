//! flavorbag renders customized snack bags.
//!
//! A [`Bag`] record from the bag API is resolved into concrete appearance parameters, its
//! label and picture are composited into textures, the textures are bound onto the slots of a
//! shared bag model and the result is rendered into gallery thumbnails or a configurator
//! preview:
//!
//! - [`resolve`] a [`Bag`] into a [`ResolvedAppearance`]
//! - composite textures with [`TextCompositor::render_text_label`] and
//!   [`render_contained_image`]
//! - bind them with [`bind_appearance`] / [`apply_image_texture`]
//! - drive whole cards with [`ThumbnailRenderer`] and pages with [`Gallery`]
//!
//! Remote access goes through [`ApiClient`]; asset bytes through an [`AssetFetch`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod api;
mod appearance;
mod assets;
mod compose;
mod config;
mod configurator;
mod foundation;
mod gallery;
mod model;
mod render;
mod scene;

pub use crate::foundation::core::{Affine, RasterImage, Rgb8, Vec3};
pub use crate::foundation::error::{FlavorError, FlavorResult};

pub use crate::api::client::{
    ApiClient, DEFAULT_API_BASE, DELETE_FAILED, GET_FAILED, LIST_FAILED, LOGIN_FAILED,
    SAVE_FAILED, VOTE_FAILED,
};
pub use crate::appearance::fonts::{FontStack, LABEL_FONT_SIZE_PX, LABEL_FONT_WEIGHT};
pub use crate::appearance::resolve::{
    DEFAULT_BODY_COLOR, DEFAULT_LABEL, DEFAULT_PLACEHOLDER_IMAGE, ResolvedAppearance, resolve,
    resolve_with,
};
pub use crate::assets::fetch::{AssetFetch, AssetLocation, HttpAssetFetcher, encode_data_url, locate};
pub use crate::assets::shared::SharedModel;
pub use crate::compose::contain::{
    ContainPlacement, IMAGE_CANVAS_HEIGHT, IMAGE_CANVAS_WIDTH, contain_placement,
    contain_transform, render_contained_image,
};
pub use crate::compose::decode::{decode_image, encode_png};
pub use crate::compose::text::{
    LABEL_CANVAS_HEIGHT, LABEL_CANVAS_WIDTH, LABEL_SCALE_Y, TextCompositor, label_svg,
};
pub use crate::config::{ClientConfig, DEFAULT_MODEL_SOURCE};
pub use crate::configurator::{ConfiguratorSession, DEFAULT_PALETTE, DRAG_SPEED, Draft, SAVED, SAVING};
pub use crate::gallery::pager::{ALL_LOADED_LABEL, LOAD_MORE_LABEL, PAGE_SIZE, Pager};
pub use crate::gallery::view::{
    BAG_ID_MISSING, Gallery, GalleryCard, NOT_LOGGED_IN, USER_ID_MISSING,
};
pub use crate::model::bag::{
    Bag, DEFAULT_DESCRIPTION, FontAlias, TextFill, UNNAMED_TITLE, parse_bag_list,
    parse_bag_record,
};
pub use crate::model::user::{UserSession, UserStore};
pub use crate::render::backend::{FrameRGBA, RenderScene, SceneRenderer};
pub use crate::render::display::{
    CardDisplay, CardId, CardRecord, InMemoryDisplay, LoadMore, PageStatus, PngDirDisplay,
};
pub use crate::render::flat::{CardLayout, FlatRenderer, card_layout};
pub use crate::render::thumbnail::{CardTask, ThumbState, ThumbnailRenderer};
pub use crate::scene::binder::{
    BoundSlots, SlotLookup, SlotNames, SlotRole, apply_image_texture, bind_appearance,
    locate_slots,
};
pub use crate::scene::graph::{
    Bounds, Material, ModelInstance, ModelTransform, Node, NodeId, NodeKind, SceneGraph, Shading,
};
pub use crate::scene::view::{
    Camera, ModelFit, THUMBNAIL_CLEAR, THUMBNAIL_HEIGHT, THUMBNAIL_WIDTH, ViewSetup,
};
