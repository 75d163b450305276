use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

struct Counting {
    body: Option<&'static str>,
    calls: AtomicUsize,
}

impl AssetFetch for Counting {
    async fn fetch(&self, _source: &str) -> FlavorResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.body
            .map(|b| b.as_bytes().to_vec())
            .ok_or_else(|| FlavorError::network("unreachable"))
    }
}

#[tokio::test]
async fn concurrent_callers_share_one_load() {
    let fetch = Arc::new(Counting {
        body: Some(r#"{"nodes":[{"name":"Bag","kind":"mesh"}]}"#),
        calls: AtomicUsize::new(0),
    });
    let model = Arc::new(SharedModel::new(Arc::clone(&fetch), "/assets/chips.json"));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let model = Arc::clone(&model);
            tokio::spawn(async move { model.get().await })
        })
        .collect();
    let mut graphs = Vec::new();
    for h in handles {
        graphs.push(h.await.unwrap().unwrap());
    }

    assert_eq!(fetch.calls.load(Ordering::SeqCst), 1);
    assert!(graphs.iter().all(|g| Arc::ptr_eq(g, &graphs[0])));
    assert!(model.is_settled());
}

#[tokio::test]
async fn failure_is_memoized() {
    let fetch = Arc::new(Counting {
        body: None,
        calls: AtomicUsize::new(0),
    });
    let model = SharedModel::new(Arc::clone(&fetch), "/assets/chips.json");

    let first = model.get().await.unwrap_err();
    let second = model.get().await.unwrap_err();
    assert!(matches!(first, FlavorError::AssetLoad(_)));
    assert_eq!(first.to_string(), second.to_string());
    assert_eq!(fetch.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn malformed_manifest_is_an_asset_load_failure() {
    let fetch = Arc::new(Counting {
        body: Some("not json"),
        calls: AtomicUsize::new(0),
    });
    let model = SharedModel::new(fetch, "/assets/chips.json");
    assert!(matches!(model.get().await, Err(FlavorError::AssetLoad(_))));
}
