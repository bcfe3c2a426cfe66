use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::DynProvider;
use anyhow::Result;
use reserve_abi::IKyberReserve::{self, IKyberReserveInstance};
use tracing::info;

use crate::contract_client::ContractClient;
use crate::util::{confirm, withdraw_approval_key};

/// Client for the fund contract, which holds the reserve's inventory.
pub struct FundClient {
  address: Address,
  provider: DynProvider,
}

impl ContractClient for FundClient {
  fn build_client(address: Address, provider: DynProvider) -> FundClient {
    FundClient { address, provider }
  }

  fn address(&self) -> Address {
    self.address
  }

  fn provider(&self) -> &DynProvider {
    &self.provider
  }
}

impl FundClient {
  fn contract(&self) -> IKyberReserveInstance<DynProvider> {
    IKyberReserve::new(self.address, self.provider.clone())
  }

  /// # Errors
  /// - RPC call fails
  pub async fn trade_enabled(&self) -> Result<bool> {
    Ok(self.contract().tradeEnabled().call().await?)
  }

  /// # Errors
  /// - Failed to send transaction or transaction reverted
  pub async fn enable_trade(&self) -> Result<TxHash> {
    let pending = self.contract().enableTrade().send().await?;
    confirm(pending).await
  }

  /// # Errors
  /// - Failed to send transaction or transaction reverted
  pub async fn disable_trade(&self) -> Result<TxHash> {
    let pending = self.contract().disableTrade().send().await?;
    confirm(pending).await
  }

  /// Balance held by the reserve, in token wei. Use
  /// [`reserve_abi::tokens::ETH_TOKEN_ADDRESS`] for ether.
  ///
  /// # Errors
  /// - RPC call fails
  pub async fn get_balance(&self, token: Address) -> Result<U256> {
    Ok(self.contract().getBalance(token).call().await?)
  }

  /// Allows withdrawals of `token` to `destination`.
  ///
  /// # Errors
  /// - Failed to send transaction or transaction reverted
  pub async fn approve_withdraw_address(
    &self,
    destination: Address,
    token: Address,
  ) -> Result<TxHash> {
    self.set_withdraw_approval(destination, token, true).await
  }

  /// Revokes withdrawals of `token` to `destination`.
  ///
  /// # Errors
  /// - Failed to send transaction or transaction reverted
  pub async fn disapprove_withdraw_address(
    &self,
    destination: Address,
    token: Address,
  ) -> Result<TxHash> {
    self.set_withdraw_approval(destination, token, false).await
  }

  async fn set_withdraw_approval(
    &self,
    destination: Address,
    token: Address,
    approve: bool,
  ) -> Result<TxHash> {
    let pending = self
      .contract()
      .approveWithdrawAddress(token, destination, approve)
      .send()
      .await?;
    confirm(pending).await
  }

  /// Whether `token` may be withdrawn to `destination`.
  ///
  /// # Errors
  /// - RPC call fails
  pub async fn approved_withdraw_address(
    &self,
    destination: Address,
    token: Address,
  ) -> Result<bool> {
    let key = withdraw_approval_key(token, destination);
    Ok(self.contract().approvedWithdrawAddresses(key).call().await?)
  }

  /// Withdraws `amount` token wei to an approved `destination`.
  ///
  /// # Errors
  /// - Failed to send transaction or transaction reverted
  pub async fn withdraw(
    &self,
    token: Address,
    amount: U256,
    destination: Address,
  ) -> Result<TxHash> {
    let pending = self
      .contract()
      .withdraw(token, amount, destination)
      .send()
      .await?;
    info!(%token, %amount, %destination, "Withdrawing from reserve");
    confirm(pending).await
  }

  /// Points the fund contract at its network, pricing and sanity contracts.
  ///
  /// # Errors
  /// - Failed to send transaction or transaction reverted
  pub async fn set_contracts(
    &self,
    network: Address,
    conversion_rates: Address,
    sanity_rates: Address,
  ) -> Result<TxHash> {
    let pending = self
      .contract()
      .setContracts(network, conversion_rates, sanity_rates)
      .send()
      .await?;
    confirm(pending).await
  }

  /// # Errors
  /// - RPC call fails
  pub async fn network_address(&self) -> Result<Address> {
    Ok(self.contract().kyberNetwork().call().await?)
  }

  /// # Errors
  /// - RPC call fails
  pub async fn conversion_rates_address(&self) -> Result<Address> {
    Ok(self.contract().conversionRatesContract().call().await?)
  }

  /// # Errors
  /// - RPC call fails
  pub async fn sanity_rates_address(&self) -> Result<Address> {
    Ok(self.contract().sanityRatesContract().call().await?)
  }
}
