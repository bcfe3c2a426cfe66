use alloy::primitives::{Address, TxHash, I256, U256};
use alloy::providers::DynProvider;
use alloy::signers::local::PrivateKeySigner;
use anyhow::Result;
use reserve_core::asset_index::AssetIndex;
use reserve_core::Rate;
use tracing::info;

use crate::config::{ReserveAddresses, ReserveConfig};
use crate::contract_client::ContractClient;
use crate::fund_client::FundClient;
use crate::pricing_client::{PricingClient, StepFunction, TokenControlInfo};
use crate::rate_update::RateRequest;
use crate::sanity_client::SanityClient;

/// Operates a deployed reserve: permissions, funds and pricing.
pub struct Reserve {
  pub fund: FundClient,
  pub pricing: PricingClient,
  pub sanity: SanityClient,
}

impl Reserve {
  #[must_use]
  pub fn new(provider: DynProvider, addresses: &ReserveAddresses) -> Reserve {
    Reserve {
      fund: FundClient::build_client(addresses.reserve, provider.clone()),
      pricing: PricingClient::build_client(
        addresses.conversion_rates,
        provider.clone(),
      ),
      sanity: SanityClient::build_client(addresses.sanity_rates, provider),
    }
  }

  /// Connects to the reserve described by `config`.
  #[must_use]
  pub fn from_config(
    config: &ReserveConfig,
    signer: PrivateKeySigner,
  ) -> Reserve {
    Reserve::new(config.connect(signer), &config.addresses)
  }

  /// The same reserve, operated through `provider`. Used to act as another
  /// account.
  #[must_use]
  pub fn with_provider(&self, provider: DynProvider) -> Reserve {
    Reserve::new(provider, &self.addresses())
  }

  #[must_use]
  pub fn addresses(&self) -> ReserveAddresses {
    ReserveAddresses {
      reserve: self.fund.address(),
      conversion_rates: self.pricing.address(),
      sanity_rates: self.sanity.address(),
    }
  }

  /// Links the reserve contracts: the pricing contract learns its fund
  /// contract, and the fund contract learns the network, pricing and sanity
  /// contracts.
  ///
  /// # Errors
  /// - Failed to send transaction or transaction reverted
  pub async fn link_contracts(&self, network: Address) -> Result<()> {
    let ReserveAddresses {
      reserve,
      conversion_rates,
      sanity_rates,
    } = self.addresses();
    self.pricing.set_reserve_address(reserve).await?;
    self
      .fund
      .set_contracts(network, conversion_rates, sanity_rates)
      .await?;
    info!(%network, %reserve, "Linked reserve contracts");
    Ok(())
  }

  /// Lists `token` for trading and resolves its compact data position.
  ///
  /// # Errors
  /// - Failed to send transaction or transaction reverted
  /// - Failed to read the token's compact data position
  pub async fn add_new_token(
    &self,
    token: Address,
    control: &TokenControlInfo,
  ) -> Result<AssetIndex> {
    self.pricing.add_token(token).await?;
    self.pricing.set_token_control_info(token, control).await?;
    self.pricing.enable_token_trade(token).await?;
    let index = self.pricing.token_index(token).await?;
    info!(
      %token,
      array_idx = index.array_idx(),
      field_idx = index.field_idx(),
      "Listed token"
    );
    Ok(index)
  }

  /// # Errors
  /// - RPC call fails
  pub async fn get_balance(&self, token: Address) -> Result<U256> {
    self.fund.get_balance(token).await
  }

  /// # Errors
  /// - Failed to send transaction or transaction reverted
  pub async fn approve_withdraw_address(
    &self,
    destination: Address,
    token: Address,
  ) -> Result<TxHash> {
    self.fund.approve_withdraw_address(destination, token).await
  }

  /// # Errors
  /// - Failed to send transaction or transaction reverted
  pub async fn disapprove_withdraw_address(
    &self,
    destination: Address,
    token: Address,
  ) -> Result<TxHash> {
    self.fund.disapprove_withdraw_address(destination, token).await
  }

  /// # Errors
  /// - RPC call fails
  pub async fn approved_withdraw_address(
    &self,
    destination: Address,
    token: Address,
  ) -> Result<bool> {
    self.fund.approved_withdraw_address(destination, token).await
  }

  /// # Errors
  /// - Failed to send transaction or transaction reverted
  pub async fn withdraw(
    &self,
    token: Address,
    amount: U256,
    destination: Address,
  ) -> Result<TxHash> {
    self.fund.withdraw(token, amount, destination).await
  }

  /// # Errors
  /// - Failed to send transaction or transaction reverted
  pub async fn enable_trade(&self) -> Result<TxHash> {
    self.fund.enable_trade().await
  }

  /// # Errors
  /// - Failed to send transaction or transaction reverted
  pub async fn disable_trade(&self) -> Result<TxHash> {
    self.fund.disable_trade().await
  }

  /// # Errors
  /// - RPC call fails
  pub async fn trade_enabled(&self) -> Result<bool> {
    self.fund.trade_enabled().await
  }

  /// # Errors
  /// - RPC call fails
  pub async fn get_buy_rate(
    &self,
    token: Address,
    qty: U256,
    block: u64,
  ) -> Result<Rate> {
    self.pricing.get_buy_rate(token, qty, block).await
  }

  /// # Errors
  /// - RPC call fails
  pub async fn get_sell_rate(
    &self,
    token: Address,
    qty: U256,
    block: u64,
  ) -> Result<Rate> {
    self.pricing.get_sell_rate(token, qty, block).await
  }

  /// # Errors
  /// See [`PricingClient::set_rates`].
  pub async fn set_rates(&self, requests: &[RateRequest]) -> Result<TxHash> {
    self.pricing.set_rates(requests).await
  }

  /// # Errors
  /// - Failed to send transaction or transaction reverted
  pub async fn set_qty_step_function(
    &self,
    token: Address,
    steps: StepFunction,
  ) -> Result<TxHash> {
    self.pricing.set_qty_step_function(token, steps).await
  }

  /// # Errors
  /// - Failed to send transaction or transaction reverted
  pub async fn set_imbalance_step_function(
    &self,
    token: Address,
    steps: StepFunction,
  ) -> Result<TxHash> {
    self.pricing.set_imbalance_step_function(token, steps).await
  }

  /// # Errors
  /// - RPC call fails
  pub async fn get_steps_function_data(
    &self,
    token: Address,
    command: u64,
    param: u64,
  ) -> Result<I256> {
    self
      .pricing
      .get_steps_function_data(token, command, param)
      .await
  }

  /// # Errors
  /// - Failed to send transaction or transaction reverted
  pub async fn set_valid_rate_duration_in_blocks(
    &self,
    duration: u64,
  ) -> Result<TxHash> {
    self.pricing.set_valid_rate_duration_in_blocks(duration).await
  }

  /// # Errors
  /// See [`SanityClient::set_sanity_rates`].
  pub async fn set_sanity_rates(
    &self,
    tokens: Vec<Address>,
    rates: Vec<Rate>,
  ) -> Result<TxHash> {
    self.sanity.set_sanity_rates(tokens, rates).await
  }

  /// # Errors
  /// - RPC call fails
  pub async fn get_sanity_rate(
    &self,
    src: Address,
    dest: Address,
  ) -> Result<Rate> {
    self.sanity.get_sanity_rate(src, dest).await
  }

  /// # Errors
  /// See [`SanityClient::set_reasonable_diff`].
  pub async fn set_reasonable_diff(
    &self,
    tokens: Vec<Address>,
    diffs: Vec<U256>,
  ) -> Result<TxHash> {
    self.sanity.set_reasonable_diff(tokens, diffs).await
  }

  /// # Errors
  /// - RPC call fails
  pub async fn reasonable_diff_in_bps(&self, token: Address) -> Result<U256> {
    self.sanity.reasonable_diff_in_bps(token).await
  }
}
