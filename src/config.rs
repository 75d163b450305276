use std::path::{Path, PathBuf};

use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::api::client::DEFAULT_API_BASE;
use crate::appearance::resolve::DEFAULT_PLACEHOLDER_IMAGE;
use crate::foundation::error::{FlavorError, FlavorResult};
use crate::gallery::pager::PAGE_SIZE;
use crate::model::user::UserStore;
use crate::scene::binder::SlotNames;

/// Model manifest loaded when nothing else is configured.
pub const DEFAULT_MODEL_SOURCE: &str = "/assets/chips.json";

/// Client settings. Every field has a default, so a partial (or missing) file is fine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API host.
    pub api_base: String,
    /// Directory root-relative asset paths resolve against.
    pub web_root: PathBuf,
    /// Model manifest reference.
    pub model_source: String,
    /// Image used when a bag has none or its own fails.
    pub placeholder_image: String,
    /// User session file; the platform data directory when unset.
    pub user_store: Option<PathBuf>,
    /// Node names identifying the bag's slots.
    pub slot_names: SlotNames,
    /// Bags per gallery page.
    pub page_size: usize,
    /// Extra font directories.
    pub font_dirs: Vec<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_owned(),
            web_root: PathBuf::from("."),
            model_source: DEFAULT_MODEL_SOURCE.to_owned(),
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_owned(),
            user_store: None,
            slot_names: SlotNames::default(),
            page_size: PAGE_SIZE,
            font_dirs: Vec::new(),
        }
    }
}

impl ClientConfig {
    /// Read a JSON config file.
    pub fn load(path: &Path) -> FlavorResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        serde_json::from_str(&text)
            .map_err(|e| FlavorError::serde(format!("config {}: {e}", path.display())))
    }

    /// Read `path` when given, else use defaults.
    pub fn load_or_default(path: Option<&Path>) -> FlavorResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Where the logged-in user is stored.
    pub fn user_store_path(&self) -> PathBuf {
        if let Some(p) = &self.user_store {
            return p.clone();
        }
        match ProjectDirs::from("com", "flavorbag", "flavorbag") {
            Some(dirs) => dirs.data_dir().join("user.json"),
            None => PathBuf::from(".flavorbag-user.json"),
        }
    }

    /// Store for the logged-in user.
    pub fn user_store(&self) -> UserStore {
        UserStore::new(self.user_store_path())
    }

    /// Configured font directories plus `<web_root>/fonts`.
    pub fn font_search_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = self.font_dirs.clone();
        dirs.push(self.web_root.join("fonts"));
        dirs
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
