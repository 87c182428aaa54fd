use crate::core::geo::TileCoord;
use crate::prelude::HashSet;
use crate::{runtime, MapError, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use once_cell::sync::Lazy;

/// Shared async HTTP client for tile downloads. Building the client once
/// avoids TLS and connection pool setup for every tile.
pub(crate) static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .user_agent(concat!("layerview/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(8)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
});

/// Identifies one tile of one layer; the base imagery uses its own layer id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TileKey {
    pub layer_id: String,
    pub coord: TileCoord,
}

impl TileKey {
    pub fn new(layer_id: impl Into<String>, coord: TileCoord) -> Self {
        Self {
            layer_id: layer_id.into(),
            coord,
        }
    }
}

/// Result of a tile loading operation
#[derive(Debug)]
pub struct TileResult {
    pub key: TileKey,
    pub data: Result<Vec<u8>>,
}

/// Fetches tiles on the async runtime and reports the bytes back over a
/// channel that the UI thread drains once per frame.
///
/// A failed tile is reported once and not retried; the layer simply stays
/// blank there.
pub struct TileLoader {
    tx: Sender<TileResult>,
    rx: Receiver<TileResult>,
    pending: HashSet<TileKey>,
}

impl TileLoader {
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self {
            tx,
            rx,
            pending: HashSet::default(),
        }
    }

    /// Start downloading `url` for `key` unless it is already in flight
    pub fn request(&mut self, key: TileKey, url: String) -> bool {
        if !self.pending.insert(key.clone()) {
            return false;
        }

        let tx = self.tx.clone();
        runtime::spawn(async move {
            log::debug!("fetch tile {:?} from {}", key, url);
            let data = fetch_tile(&url).await;
            if let Err(e) = &data {
                log::warn!("tile {:?} failed: {}", key, e);
            }
            let _ = tx.send(TileResult { key, data });
        });
        true
    }

    pub fn is_pending(&self, key: &TileKey) -> bool {
        self.pending.contains(key)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Completed downloads since the last call
    pub fn drain(&mut self) -> Vec<TileResult> {
        let results: Vec<TileResult> = self.rx.try_iter().collect();
        for result in &results {
            self.pending.remove(&result.key);
        }
        results
    }

    /// Forget in-flight tiles of a layer so a later attach starts fresh.
    /// Late results for it still arrive through [`Self::drain`].
    pub fn forget_layer(&mut self, layer_id: &str) {
        self.pending.retain(|key| key.layer_id != layer_id);
    }
}

impl Default for TileLoader {
    fn default() -> Self {
        Self::new()
    }
}

async fn fetch_tile(url: &str) -> Result<Vec<u8>> {
    let response = HTTP_CLIENT.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(MapError::Http {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(response.bytes().await?.to_vec())
}
