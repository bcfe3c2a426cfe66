use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::DynProvider;
use anyhow::Result;
use reserve_abi::IERC20::{self, IERC20Instance};
use reserve_core::util::token_wei;
use rust_decimal::Decimal;

use crate::util::confirm;

/// Client for an ERC20 token traded by the reserve.
pub struct TokenClient {
  address: Address,
  provider: DynProvider,
}

impl TokenClient {
  #[must_use]
  pub fn new(address: Address, provider: DynProvider) -> TokenClient {
    TokenClient { address, provider }
  }

  #[must_use]
  pub fn address(&self) -> Address {
    self.address
  }

  fn contract(&self) -> IERC20Instance<DynProvider> {
    IERC20::new(self.address, self.provider.clone())
  }

  /// # Errors
  /// - RPC call fails
  pub async fn balance_of(&self, owner: Address) -> Result<U256> {
    Ok(self.contract().balanceOf(owner).call().await?)
  }

  /// # Errors
  /// - RPC call fails
  pub async fn decimals(&self) -> Result<u8> {
    Ok(self.contract().decimals().call().await?)
  }

  /// Transfers `amount` token wei from the signer to `to`.
  ///
  /// # Errors
  /// - Failed to send transaction or transaction reverted
  pub async fn transfer(&self, to: Address, amount: U256) -> Result<TxHash> {
    let pending = self.contract().transfer(to, amount).send().await?;
    confirm(pending).await
  }

  /// Transfers a human readable `amount`, scaled by the token's decimals.
  ///
  /// # Errors
  /// - Failed to read decimals
  /// - Amount is negative or overflows
  /// - Failed to send transaction or transaction reverted
  pub async fn transfer_units(
    &self,
    to: Address,
    amount: Decimal,
  ) -> Result<TxHash> {
    let wei = token_wei(amount, self.decimals().await?)?;
    self.transfer(to, wei).await
  }
}
