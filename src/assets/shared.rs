use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::assets::fetch::AssetFetch;
use crate::foundation::error::{FlavorError, FlavorResult};
use crate::scene::graph::SceneGraph;

/// The base model, loaded on first request and reused for every bag.
///
/// The first outcome is kept, failure included: later callers get the same graph or the same
/// error without touching the fetcher again. Concurrent first callers wait on one load.
pub struct SharedModel<F: AssetFetch> {
    fetch: Arc<F>,
    source: String,
    cell: OnceCell<Result<Arc<SceneGraph>, String>>,
}

impl<F: AssetFetch> SharedModel<F> {
    /// Lazy handle for the model at `source`.
    pub fn new(fetch: Arc<F>, source: impl Into<String>) -> Self {
        Self {
            fetch,
            source: source.into(),
            cell: OnceCell::new(),
        }
    }

    /// Model source reference.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// `true` once a load attempt finished.
    pub fn is_settled(&self) -> bool {
        self.cell.initialized()
    }

    /// Shared graph, loading it on first call.
    pub async fn get(&self) -> FlavorResult<Arc<SceneGraph>> {
        let outcome = self
            .cell
            .get_or_init(|| async {
                tracing::info!(source = %self.source, "loading base model");
                let loaded = async {
                    let bytes = self.fetch.fetch(&self.source).await?;
                    SceneGraph::from_manifest_json(&bytes)
                }
                .await;
                match loaded {
                    Ok(graph) => {
                        tracing::debug!(nodes = graph.nodes().len(), "base model ready");
                        Ok(Arc::new(graph))
                    }
                    Err(e) => {
                        tracing::error!(source = %self.source, error = %e, "base model failed to load");
                        Err(e.to_string())
                    }
                }
            })
            .await;

        match outcome {
            Ok(graph) => Ok(Arc::clone(graph)),
            Err(msg) => Err(FlavorError::asset_load(msg.clone())),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/shared.rs"]
mod tests;
