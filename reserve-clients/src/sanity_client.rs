use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::DynProvider;
use anyhow::{ensure, Result};
use reserve_abi::ISanityRates::{self, ISanityRatesInstance};
use reserve_core::Rate;

use crate::contract_client::ContractClient;
use crate::util::confirm;

/// Client for the sanity rates contract, which bounds how far a quoted rate
/// may drift from a reference rate.
pub struct SanityClient {
  address: Address,
  provider: DynProvider,
}

impl ContractClient for SanityClient {
  fn build_client(address: Address, provider: DynProvider) -> SanityClient {
    SanityClient { address, provider }
  }

  fn address(&self) -> Address {
    self.address
  }

  fn provider(&self) -> &DynProvider {
    &self.provider
  }
}

impl SanityClient {
  fn contract(&self) -> ISanityRatesInstance<DynProvider> {
    ISanityRates::new(self.address, self.provider.clone())
  }

  /// Sets reference rates, in ether wei per token, for `tokens`.
  ///
  /// # Errors
  /// - `tokens` and `rates` differ in length
  /// - Failed to send transaction or transaction reverted
  pub async fn set_sanity_rates(
    &self,
    tokens: Vec<Address>,
    rates: Vec<Rate>,
  ) -> Result<TxHash> {
    ensure!(
      tokens.len() == rates.len(),
      "Got {} tokens but {} sanity rates.",
      tokens.len(),
      rates.len()
    );
    let pending = self.contract().setSanityRates(tokens, rates).send().await?;
    confirm(pending).await
  }

  /// # Errors
  /// - RPC call fails
  pub async fn get_sanity_rate(
    &self,
    src: Address,
    dest: Address,
  ) -> Result<Rate> {
    Ok(self.contract().getSanityRate(src, dest).call().await?)
  }

  /// Sets the tolerated difference from the sanity rate, in basis points.
  ///
  /// # Errors
  /// - `tokens` and `diffs` differ in length
  /// - Failed to send transaction or transaction reverted
  pub async fn set_reasonable_diff(
    &self,
    tokens: Vec<Address>,
    diffs: Vec<U256>,
  ) -> Result<TxHash> {
    ensure!(
      tokens.len() == diffs.len(),
      "Got {} tokens but {} reasonable diffs.",
      tokens.len(),
      diffs.len()
    );
    let pending = self
      .contract()
      .setReasonableDiff(tokens, diffs)
      .send()
      .await?;
    confirm(pending).await
  }

  /// # Errors
  /// - RPC call fails
  pub async fn reasonable_diff_in_bps(&self, token: Address) -> Result<U256> {
    Ok(self.contract().reasonableDiffInBps(token).call().await?)
  }
}
