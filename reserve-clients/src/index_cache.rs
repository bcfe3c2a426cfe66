use std::future::Future;
use std::sync::Arc;

use alloy::primitives::Address;
use anyhow::Result;
use dashmap::DashMap;
use reserve_core::asset_index::AssetIndex;
use tokio::sync::OnceCell;

/// Read-through cache of compact data indices.
///
/// An asset's index is assigned once when it is listed and never moves, so
/// entries are never evicted. Each asset has its own once-cell: concurrent
/// lookups of one asset share a single fetch, lookups of different assets
/// never wait on each other. A failed fetch removes the asset's cell again,
/// so assets that never resolve do not accumulate.
#[derive(Debug, Default)]
pub struct IndexCache {
  cells: DashMap<Address, Arc<OnceCell<AssetIndex>>>,
}

impl IndexCache {
  #[must_use]
  pub fn new() -> IndexCache {
    IndexCache::default()
  }

  /// Returns the cached index of `asset`, running `fetch` on a miss.
  ///
  /// # Errors
  /// - Propagates the fetch error, nothing is cached
  pub async fn get_or_fetch<F, Fut>(
    &self,
    asset: Address,
    fetch: F,
  ) -> Result<AssetIndex>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<AssetIndex>>,
  {
    let cell = self.cells.entry(asset).or_default().clone();
    match cell.get_or_try_init(fetch).await {
      Ok(index) => Ok(*index),
      Err(err) => {
        self
          .cells
          .remove_if(&asset, |_, cell| !cell.initialized());
        Err(err)
      }
    }
  }

  /// Cached index of `asset`, without fetching.
  #[must_use]
  pub fn get(&self, asset: Address) -> Option<AssetIndex> {
    self
      .cells
      .get(&asset)
      .and_then(|cell| cell.get().copied())
  }

  /// Number of populated entries.
  #[must_use]
  pub fn len(&self) -> usize {
    self
      .cells
      .iter()
      .filter(|entry| entry.value().initialized())
      .count()
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}
