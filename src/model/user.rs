use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::foundation::error::{FlavorError, FlavorResult};
use crate::model::bag::lenient_key;

/// Logged-in user as returned by the login endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    /// Bearer token, when the server issues one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Display name (`username`, falling back to `name`).
    pub username: String,
    /// Store-assigned user id, required for voting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl UserSession {
    /// Interpret a login response body. `fallback_username` is used when the server omits both
    /// `username` and `name`.
    pub fn from_login_response(v: &Value, fallback_username: &str) -> Self {
        let user = v.get("user").filter(|u| u.is_object()).unwrap_or(v);
        let text = |k: &str| {
            user.get(k)
                .or_else(|| v.get(k))
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
        };
        let id = user
            .get("id")
            .and_then(lenient_key)
            .or_else(|| user.get("_id").and_then(lenient_key));
        Self {
            token: text("token"),
            username: text("username")
                .or_else(|| text("name"))
                .unwrap_or_else(|| fallback_username.to_owned()),
            id,
        }
    }
}

/// File-backed store for the current [`UserSession`].
#[derive(Clone, Debug)]
pub struct UserStore {
    path: PathBuf,
}

impl UserStore {
    /// Store backed by `path` (created on first save).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored session. A missing file means "not logged in".
    pub fn load(&self) -> FlavorResult<Option<UserSession>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(anyhow::Error::new(e)
                    .context(format!("read user session '{}'", self.path.display()))
                    .into());
            }
        };
        let session = serde_json::from_slice(&bytes)
            .map_err(|e| FlavorError::serde(format!("user session: {e}")))?;
        Ok(Some(session))
    }

    /// Persist `session`, replacing any previous one.
    pub fn save(&self, session: &UserSession) -> FlavorResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create session dir '{}'", parent.display()))?;
        }
        let json = serde_json::to_vec_pretty(session)
            .map_err(|e| FlavorError::serde(format!("user session: {e}")))?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("write user session '{}'", self.path.display()))?;
        Ok(())
    }

    /// Forget the stored session (logout). Missing files are fine.
    pub fn clear(&self) -> FlavorResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("remove user session '{}'", self.path.display()))
                .into()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/user.rs"]
mod tests;
