use std::future::Future;
use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use base64::Engine;

use crate::foundation::error::{FlavorError, FlavorResult};

/// Source of raw asset bytes (model manifests, bag images).
///
/// Implementations must be shareable across render tasks.
pub trait AssetFetch: Send + Sync + 'static {
    /// Load the bytes behind `source`.
    fn fetch(&self, source: &str) -> impl Future<Output = FlavorResult<Vec<u8>>> + Send;
}

/// Where an asset reference points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssetLocation {
    /// `http://` or `https://` URL.
    Remote(String),
    /// Inline `data:` URL payload, already decoded.
    Inline(Vec<u8>),
    /// File below the web root.
    Local(PathBuf),
}

/// Classify `source`, decoding `data:` URLs and mapping paths below `web_root`.
///
/// Root-relative (`/assets/x.png`) and bare relative paths both resolve against `web_root`;
/// parent-directory components are rejected.
pub fn locate(source: &str, web_root: &Path) -> FlavorResult<AssetLocation> {
    let source = source.trim();
    if source.is_empty() {
        return Err(FlavorError::validation("empty asset source"));
    }
    if source.starts_with("http://") || source.starts_with("https://") {
        return Ok(AssetLocation::Remote(source.to_owned()));
    }
    if let Some(rest) = source.strip_prefix("data:") {
        return decode_data_url(rest).map(AssetLocation::Inline);
    }

    let rel = Path::new(source.trim_start_matches('/'));
    if rel
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return Err(FlavorError::validation(format!(
            "asset path '{source}' escapes the web root"
        )));
    }
    Ok(AssetLocation::Local(web_root.join(rel)))
}

fn decode_data_url(rest: &str) -> FlavorResult<Vec<u8>> {
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| FlavorError::validation("data URL without ',' separator"))?;
    if meta.split(';').any(|p| p.eq_ignore_ascii_case("base64")) {
        base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| FlavorError::validation(format!("data URL base64: {e}")))
    } else {
        Ok(urlencoding::decode_binary(payload.as_bytes()).into_owned())
    }
}

/// Encode bytes as a base64 `data:` URL.
pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{mime};base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Fetches over HTTP(S), decodes `data:` URLs, and reads everything else from a local web root.
#[derive(Clone, Debug)]
pub struct HttpAssetFetcher {
    client: reqwest::Client,
    web_root: PathBuf,
}

impl HttpAssetFetcher {
    /// Fetcher resolving local paths against `web_root`.
    pub fn new(web_root: impl Into<PathBuf>) -> FlavorResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("flavorbag/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to create HTTP client")?;
        Ok(Self::with_client(client, web_root))
    }

    /// Fetcher sharing an existing client.
    pub fn with_client(client: reqwest::Client, web_root: impl Into<PathBuf>) -> Self {
        Self {
            client,
            web_root: web_root.into(),
        }
    }

    /// Directory local paths resolve against.
    pub fn web_root(&self) -> &Path {
        &self.web_root
    }
}

impl AssetFetch for HttpAssetFetcher {
    async fn fetch(&self, source: &str) -> FlavorResult<Vec<u8>> {
        match locate(source, &self.web_root)? {
            AssetLocation::Inline(bytes) => Ok(bytes),
            AssetLocation::Local(path) => {
                let bytes = tokio::fs::read(&path)
                    .await
                    .with_context(|| format!("read asset {}", path.display()))?;
                Ok(bytes)
            }
            AssetLocation::Remote(url) => {
                let resp = self
                    .client
                    .get(&url)
                    .send()
                    .await
                    .map_err(|e| FlavorError::network(format!("GET {url}: {e}")))?;
                let status = resp.status();
                if !status.is_success() {
                    return Err(FlavorError::http_status(
                        status.as_u16(),
                        format!("GET {url}: HTTP {status}"),
                    ));
                }
                let bytes = resp
                    .bytes()
                    .await
                    .map_err(|e| FlavorError::network(format!("GET {url}: {e}")))?;
                Ok(bytes.to_vec())
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fetch.rs"]
mod tests;
