//! Turns requested rates into a compact or base rate update.
//!
//! Every input the encoder needs (both base rates and the compact index of
//! each asset) is fetched up front, concurrently. The encoder only runs on
//! the complete snapshot, so a failed fetch aborts the batch before any
//! encoding happens.

use std::collections::BTreeMap;
use std::sync::Arc;

use alloy::primitives::Address;
use anyhow::{bail, Result};
use futures::future::try_join_all;
use futures::try_join;
use itertools::Itertools;
use reserve_core::asset_index::AssetIndex;
use reserve_core::compact_batch::{encode, EncodedBatch};
use reserve_core::compact_data::{AssetUpdate, Side};
use reserve_core::Rate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// On-chain inputs of the rate encoder.
#[async_trait::async_trait]
pub trait RateSource: Send + Sync {
  /// Stored base rate of `asset` on `side`, zero if never set.
  async fn base_rate(&self, asset: Address, side: Side) -> Result<Rate>;

  /// Compact data position of `asset`.
  async fn asset_index(&self, asset: Address) -> Result<AssetIndex>;
}

#[async_trait::async_trait]
impl<T: RateSource> RateSource for Arc<T> {
  async fn base_rate(&self, asset: Address, side: Side) -> Result<Rate> {
    (**self).base_rate(asset, side).await
  }

  async fn asset_index(&self, asset: Address) -> Result<AssetIndex> {
    (**self).asset_index(asset).await
  }
}

/// Requested absolute rates for one asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateRequest {
  pub asset: Address,
  pub buy_rate: Rate,
  pub sell_rate: Rate,
}

impl RateRequest {
  #[must_use]
  pub fn new(asset: Address, buy_rate: Rate, sell_rate: Rate) -> RateRequest {
    RateRequest {
      asset,
      buy_rate,
      sell_rate,
    }
  }
}

/// Fetches the current state for `requests` and encodes the update.
///
/// # Errors
/// - Asset requested more than once
/// - Any base rate or index fetch fails
/// - Encoding fails (missing or conflicting index)
pub async fn plan_rate_update<S>(
  source: &S,
  requests: &[RateRequest],
) -> Result<EncodedBatch>
where
  S: RateSource + ?Sized,
{
  if let Some(asset) = requests.iter().map(|r| r.asset).duplicates().next() {
    bail!("Asset {asset} requested more than once in one rate update.");
  }
  let snapshot =
    try_join_all(requests.iter().map(|request| snapshot(source, request)))
      .await?;
  let (updates, indices): (BTreeMap<_, _>, BTreeMap<_, _>) = snapshot
    .into_iter()
    .map(|(asset, update, index)| ((asset, update), (asset, index)))
    .unzip();
  let batch = encode(&updates, &indices)?;
  debug!(
    assets = updates.len(),
    base_update = batch.is_base_update(),
    slots = ?batch.array_indices(),
    "Planned rate update"
  );
  Ok(batch)
}

async fn snapshot<S>(
  source: &S,
  request: &RateRequest,
) -> Result<(Address, AssetUpdate, AssetIndex)>
where
  S: RateSource + ?Sized,
{
  let (base_buy, base_sell, index) = try_join!(
    source.base_rate(request.asset, Side::Buy),
    source.base_rate(request.asset, Side::Sell),
    source.asset_index(request.asset),
  )?;
  let update = AssetUpdate::compute(
    request.buy_rate,
    request.sell_rate,
    base_buy,
    base_sell,
  );
  Ok((request.asset, update, index))
}

#[cfg(test)]
mod tests {
  use std::sync::atomic::{AtomicUsize, Ordering};

  use alloy::primitives::{address, U256};
  use anyhow::anyhow;
  use reserve_core::error::CoreError;

  use super::*;

  const KNC: Address = address!("0xdd974D5C2e2928deA5F71b9825b8b646686BD200");
  const OMG: Address = address!("0xd26114cd6EE289AccF82350c8d8487fedB8A0C07");
  const SNT: Address = address!("0x744d70FDBE2Ba4CF95131626614a1763DF805B9E");

  struct MockSource {
    bases: BTreeMap<Address, (Rate, Rate)>,
    indices: BTreeMap<Address, AssetIndex>,
    fetches: AtomicUsize,
  }

  impl MockSource {
    fn new() -> MockSource {
      MockSource {
        bases: BTreeMap::new(),
        indices: BTreeMap::new(),
        fetches: AtomicUsize::new(0),
      }
    }

    fn with_asset(
      mut self,
      asset: Address,
      buy: u64,
      sell: u64,
      slot: (u64, u64),
    ) -> MockSource {
      self.bases.insert(asset, (U256::from(buy), U256::from(sell)));
      let index = AssetIndex::new(slot.0, slot.1).expect("valid index");
      self.indices.insert(asset, index);
      self
    }
  }

  #[async_trait::async_trait]
  impl RateSource for MockSource {
    async fn base_rate(&self, asset: Address, side: Side) -> Result<Rate> {
      self.fetches.fetch_add(1, Ordering::SeqCst);
      let (buy, sell) = self.bases.get(&asset).copied().unwrap_or_default();
      Ok(if side.is_buy() { buy } else { sell })
    }

    async fn asset_index(&self, asset: Address) -> Result<AssetIndex> {
      self.fetches.fetch_add(1, Ordering::SeqCst);
      self
        .indices
        .get(&asset)
        .copied()
        .ok_or(anyhow!("{asset} is not listed"))
    }
  }

  fn request(asset: Address, buy: u64, sell: u64) -> RateRequest {
    RateRequest::new(asset, U256::from(buy), U256::from(sell))
  }

  #[tokio::test]
  async fn small_changes_plan_compact_update() -> Result<()> {
    let source = MockSource::new()
      .with_asset(KNC, 1000, 2000, (0, 2))
      .with_asset(OMG, 5000, 5000, (1, 0));
    let batch = plan_rate_update(
      &source,
      &[request(KNC, 1010, 1990), request(OMG, 5000, 5005)],
    )
    .await?;
    assert!(!batch.is_base_update());
    assert_eq!(batch.array_indices(), vec![0, 1]);
    let buy = batch.compact_buy();
    let sell = batch.compact_sell();
    assert_eq!(buy[0][2], 10);
    assert_eq!(sell[0][2], 251);
    assert_eq!(buy[1][0], 0);
    assert_eq!(sell[1][0], 1);
    assert_eq!(source.fetches.load(Ordering::SeqCst), 6);
    Ok(())
  }

  #[tokio::test]
  async fn unset_base_plans_base_update() -> Result<()> {
    let source = MockSource::new()
      .with_asset(KNC, 1000, 2000, (0, 0))
      .with_asset(SNT, 0, 0, (0, 1));
    let batch = plan_rate_update(
      &source,
      &[request(SNT, 300, 310), request(KNC, 1001, 2000)],
    )
    .await?;
    assert_eq!(
      batch,
      EncodedBatch::BaseRates {
        assets: vec![SNT, KNC],
        buy_rates: vec![U256::from(300), U256::from(1001)],
        sell_rates: vec![U256::from(310), U256::from(2000)],
      }
    );
    Ok(())
  }

  #[tokio::test]
  async fn duplicate_asset_rejected_before_fetching() {
    let source = MockSource::new().with_asset(KNC, 1000, 1000, (0, 0));
    let planned = plan_rate_update(
      &source,
      &[request(KNC, 1000, 1000), request(KNC, 1001, 1001)],
    )
    .await;
    assert!(planned.is_err());
    assert_eq!(source.fetches.load(Ordering::SeqCst), 0);
  }

  #[tokio::test]
  async fn failed_fetch_aborts_batch() {
    let source = MockSource::new().with_asset(KNC, 1000, 1000, (0, 0));
    let planned = plan_rate_update(
      &source,
      &[request(KNC, 1000, 1000), request(OMG, 1000, 1000)],
    )
    .await;
    assert!(planned.is_err());
  }

  #[tokio::test]
  async fn conflicting_indices_surface_core_error() {
    let source = MockSource::new()
      .with_asset(KNC, 1000, 1000, (2, 5))
      .with_asset(OMG, 1000, 1000, (2, 5));
    let planned = plan_rate_update(
      &source,
      &[request(KNC, 1000, 1000), request(OMG, 1000, 1000)],
    )
    .await;
    let err = planned.expect_err("slot conflict");
    assert!(matches!(
      err.downcast_ref::<CoreError>(),
      Some(CoreError::IndexConflict {
        array_idx: 2,
        field_idx: 5,
        ..
      })
    ));
  }

  #[tokio::test]
  async fn empty_request_plans_empty_compact_update() -> Result<()> {
    let source = MockSource::new();
    let batch = plan_rate_update(&source, &[]).await?;
    assert_eq!(batch, EncodedBatch::Compact { groups: vec![] });
    Ok(())
  }
}
