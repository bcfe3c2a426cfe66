use std::sync::Arc;

use alloy::primitives::{Address, TxHash, I256, U256};
use alloy::providers::{DynProvider, Provider};
use anyhow::{bail, Result};
use reserve_abi::IConversionRates::{self, IConversionRatesInstance};
use reserve_core::asset_index::AssetIndex;
use reserve_core::compact_batch::EncodedBatch;
use reserve_core::compact_data::Side;
use reserve_core::Rate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::contract_client::ContractClient;
use crate::index_cache::IndexCache;
use crate::rate_update::{plan_rate_update, RateRequest, RateSource};
use crate::util::{confirm, slot_args, word_to_u64};

/// Imbalance limits of a listed token, in token wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenControlInfo {
  /// Smallest amount recorded in imbalance accounting. Recommended value is
  /// the token amount worth $0.0001.
  pub minimal_record_resolution: U256,
  /// Maximum net absolute change of the token in a single block.
  pub max_per_block_imbalance: U256,
  /// Maximum net change between two rate updates.
  pub max_total_imbalance: U256,
}

/// Piecewise rate adjustment. `x_*` are steps in token wei, `y_*` the
/// matching rate impact in basis points.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepFunction {
  pub x_buy: Vec<I256>,
  pub y_buy: Vec<I256>,
  pub x_sell: Vec<I256>,
  pub y_sell: Vec<I256>,
}

/// Client for the pricing (conversion rates) contract.
pub struct PricingClient {
  address: Address,
  provider: DynProvider,
  indices: Arc<IndexCache>,
}

impl ContractClient for PricingClient {
  fn build_client(address: Address, provider: DynProvider) -> PricingClient {
    PricingClient::with_cache(address, provider, Arc::new(IndexCache::new()))
  }

  fn address(&self) -> Address {
    self.address
  }

  fn provider(&self) -> &DynProvider {
    &self.provider
  }
}

#[async_trait::async_trait]
impl RateSource for PricingClient {
  async fn base_rate(&self, asset: Address, side: Side) -> Result<Rate> {
    Ok(self.contract().getBasicRate(asset, side.is_buy()).call().await?)
  }

  async fn asset_index(&self, asset: Address) -> Result<AssetIndex> {
    self.token_index(asset).await
  }
}

impl PricingClient {
  /// Builds a client sharing an existing index cache.
  #[must_use]
  pub fn with_cache(
    address: Address,
    provider: DynProvider,
    indices: Arc<IndexCache>,
  ) -> PricingClient {
    PricingClient {
      address,
      provider,
      indices,
    }
  }

  #[must_use]
  pub fn index_cache(&self) -> &Arc<IndexCache> {
    &self.indices
  }

  fn contract(&self) -> IConversionRatesInstance<DynProvider> {
    IConversionRates::new(self.address, self.provider.clone())
  }

  /// Lists `token` on the pricing contract.
  ///
  /// # Errors
  /// - Failed to send transaction or transaction reverted
  pub async fn add_token(&self, token: Address) -> Result<TxHash> {
    let pending = self.contract().addToken(token).send().await?;
    confirm(pending).await
  }

  /// # Errors
  /// - Failed to send transaction or transaction reverted
  pub async fn set_token_control_info(
    &self,
    token: Address,
    info: &TokenControlInfo,
  ) -> Result<TxHash> {
    let pending = self
      .contract()
      .setTokenControlInfo(
        token,
        info.minimal_record_resolution,
        info.max_per_block_imbalance,
        info.max_total_imbalance,
      )
      .send()
      .await?;
    confirm(pending).await
  }

  /// # Errors
  /// - Failed to send transaction or transaction reverted
  pub async fn enable_token_trade(&self, token: Address) -> Result<TxHash> {
    let pending = self.contract().enableTokenTrade(token).send().await?;
    confirm(pending).await
  }

  /// # Errors
  /// - Failed to send transaction or transaction reverted
  pub async fn disable_token_trade(&self, token: Address) -> Result<TxHash> {
    let pending = self.contract().disableTokenTrade(token).send().await?;
    confirm(pending).await
  }

  /// Compact data position of `token`, read once and then served from the
  /// index cache.
  ///
  /// # Errors
  /// - RPC call fails
  /// - Contract reports a position outside the compact table
  pub async fn token_index(&self, token: Address) -> Result<AssetIndex> {
    self
      .indices
      .get_or_fetch(token, || async move {
        let data = self.contract().getCompactData(token).call().await?;
        let array_idx = word_to_u64(data.arrayIndex, "Array index")?;
        let field_idx = word_to_u64(data.fieldOffset, "Field offset")?;
        Ok::<_, anyhow::Error>(AssetIndex::new(array_idx, field_idx)?)
      })
      .await
  }

  /// Stored base rate of `token` on `side`.
  ///
  /// # Errors
  /// - RPC call fails
  pub async fn base_rate(&self, token: Address, side: Side) -> Result<Rate> {
    RateSource::base_rate(self, token, side).await
  }

  /// Effective buy rate for `qty`, including compact delta and step
  /// functions, at `block` (`0` means latest).
  ///
  /// # Errors
  /// - RPC call fails
  pub async fn get_buy_rate(
    &self,
    token: Address,
    qty: U256,
    block: u64,
  ) -> Result<Rate> {
    self.get_rate(token, Side::Buy, qty, block).await
  }

  /// Effective sell rate for `qty` at `block` (`0` means latest).
  ///
  /// # Errors
  /// - RPC call fails
  pub async fn get_sell_rate(
    &self,
    token: Address,
    qty: U256,
    block: u64,
  ) -> Result<Rate> {
    self.get_rate(token, Side::Sell, qty, block).await
  }

  async fn get_rate(
    &self,
    token: Address,
    side: Side,
    qty: U256,
    block: u64,
  ) -> Result<Rate> {
    let block = if block == 0 {
      self.provider.get_block_number().await?
    } else {
      block
    };
    let rate = self
      .contract()
      .getRate(token, U256::from(block), side.is_buy(), qty)
      .call()
      .await?;
    Ok(rate)
  }

  /// Sets buy and sell rates for a batch of tokens, as a compact update if
  /// every rate is close enough to its base, as a base rate update
  /// otherwise. The current block is the reference block of the update.
  ///
  /// # Errors
  /// - No rates requested
  /// - Planning fails (see [`plan_rate_update`])
  /// - Failed to send transaction or transaction reverted
  pub async fn set_rates(&self, requests: &[RateRequest]) -> Result<TxHash> {
    if requests.is_empty() {
      bail!("No rates requested.");
    }
    let batch = plan_rate_update(self, requests).await?;
    let block = U256::from(self.provider.get_block_number().await?);
    let pending = match batch {
      EncodedBatch::BaseRates {
        assets,
        buy_rates,
        sell_rates,
      } => {
        info!(assets = assets.len(), %block, "Setting base rates");
        self
          .contract()
          .setBaseRate(
            assets,
            buy_rates,
            sell_rates,
            vec![],
            vec![],
            block,
            vec![],
          )
          .send()
          .await?
      }
      batch @ EncodedBatch::Compact { .. } => {
        let indices = batch.array_indices().into_iter().map(U256::from);
        info!(slots = indices.len(), %block, "Setting compact rates");
        self
          .contract()
          .setCompactData(
            slot_args(batch.compact_buy()),
            slot_args(batch.compact_sell()),
            block,
            indices.collect(),
          )
          .send()
          .await?
      }
    };
    confirm(pending).await
  }

  /// # Errors
  /// - Failed to send transaction or transaction reverted
  pub async fn set_qty_step_function(
    &self,
    token: Address,
    steps: StepFunction,
  ) -> Result<TxHash> {
    let StepFunction {
      x_buy,
      y_buy,
      x_sell,
      y_sell,
    } = steps;
    let pending = self
      .contract()
      .setQtyStepFunction(token, x_buy, y_buy, x_sell, y_sell)
      .send()
      .await?;
    confirm(pending).await
  }

  /// # Errors
  /// - Failed to send transaction or transaction reverted
  pub async fn set_imbalance_step_function(
    &self,
    token: Address,
    steps: StepFunction,
  ) -> Result<TxHash> {
    let StepFunction {
      x_buy,
      y_buy,
      x_sell,
      y_sell,
    } = steps;
    let pending = self
      .contract()
      .setImbalanceStepFunction(token, x_buy, y_buy, x_sell, y_sell)
      .send()
      .await?;
    confirm(pending).await
  }

  /// Raw step function data; `command` selects the table and `param` the
  /// entry, as defined by the pricing contract.
  ///
  /// # Errors
  /// - RPC call fails
  pub async fn get_steps_function_data(
    &self,
    token: Address,
    command: u64,
    param: u64,
  ) -> Result<I256> {
    let data = self
      .contract()
      .getStepFunctionData(token, U256::from(command), U256::from(param))
      .call()
      .await?;
    Ok(data)
  }

  /// Number of blocks a rate update stays valid.
  ///
  /// # Errors
  /// - Failed to send transaction or transaction reverted
  pub async fn set_valid_rate_duration_in_blocks(
    &self,
    duration: u64,
  ) -> Result<TxHash> {
    let pending = self
      .contract()
      .setValidRateDurationInBlocks(U256::from(duration))
      .send()
      .await?;
    confirm(pending).await
  }

  /// # Errors
  /// - Failed to send transaction or transaction reverted
  pub async fn set_reserve_address(&self, reserve: Address) -> Result<TxHash> {
    let pending = self.contract().setReserveAddress(reserve).send().await?;
    confirm(pending).await
  }

  /// # Errors
  /// - RPC call fails
  pub async fn reserve_address(&self) -> Result<Address> {
    Ok(self.contract().reserveContract().call().await?)
  }

  /// # Errors
  /// - RPC call fails
  pub async fn listed_tokens(&self) -> Result<Vec<Address>> {
    Ok(self.contract().getListedTokens().call().await?)
  }
}

#[cfg(test)]
mod tests {
  use alloy::primitives::address;
  use alloy::signers::local::PrivateKeySigner;

  use super::*;
  use crate::util::signer_provider;

  const RATES: Address =
    address!("0x0000000000000000000000000000000000000002");

  #[tokio::test]
  async fn empty_rate_update_rejected_before_rpc() -> Result<()> {
    // Nothing listens on this port, any RPC would fail differently.
    let provider = signer_provider(
      "http://127.0.0.1:1".parse()?,
      PrivateKeySigner::random(),
    );
    let pricing = PricingClient::build_client(RATES, provider);
    let err = pricing.set_rates(&[]).await.expect_err("empty update");
    assert_eq!(err.to_string(), "No rates requested.");
    Ok(())
  }
}
