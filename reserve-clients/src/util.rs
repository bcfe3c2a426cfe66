use std::time::Duration;

use alloy::network::{Ethereum, EthereumWallet, ReceiptResponse};
use alloy::primitives::{keccak256, Address, FixedBytes, TxHash, B256, U256};
use alloy::providers::{
  DynProvider, PendingTransactionBuilder, Provider, ProviderBuilder,
};
use alloy::signers::local::PrivateKeySigner;
use anyhow::{anyhow, Result};
use reserve_abi::tokens::COMPACT_SLOT_BYTES;
use reserve_core::compact_batch::SlotBytes;
use tracing::info;
use url::Url;

/// Builds a type-erased provider that signs with `signer`.
#[must_use]
pub fn signer_provider(rpc_url: Url, signer: PrivateKeySigner) -> DynProvider {
  ProviderBuilder::new()
    .wallet(EthereumWallet::from(signer))
    .connect_http(rpc_url)
    .erased()
}

/// Longest wait for a submitted transaction to be mined.
pub const RECEIPT_TIMEOUT: Duration = Duration::from_secs(180);

/// Bounds the receipt wait of `pending` by [`RECEIPT_TIMEOUT`].
#[must_use]
pub fn with_receipt_timeout(
  pending: PendingTransactionBuilder<Ethereum>,
) -> PendingTransactionBuilder<Ethereum> {
  pending.with_timeout(Some(RECEIPT_TIMEOUT))
}

/// Waits for a submitted transaction to be mined.
///
/// # Errors
/// - Receipt cannot be fetched within [`RECEIPT_TIMEOUT`]
/// - Transaction reverted
pub async fn confirm(
  pending: PendingTransactionBuilder<Ethereum>,
) -> Result<TxHash> {
  let receipt = with_receipt_timeout(pending).get_receipt().await?;
  let tx = receipt.transaction_hash();
  if receipt.status() {
    info!(%tx, block = ?receipt.block_number(), "Transaction confirmed");
    Ok(tx)
  } else {
    Err(anyhow!("Transaction {tx} reverted."))
  }
}

/// Key of the fund contract's withdraw approval mapping.
#[must_use]
pub fn withdraw_approval_key(token: Address, destination: Address) -> B256 {
  keccak256([token.as_slice(), destination.as_slice()].concat())
}

/// Converts slot bytes to `bytes14` call arguments.
#[must_use]
pub fn slot_args(
  slots: Vec<SlotBytes>,
) -> Vec<FixedBytes<COMPACT_SLOT_BYTES>> {
  slots.into_iter().map(FixedBytes::from).collect()
}

/// Narrows a contract word to `u64`.
///
/// # Errors
/// - Value exceeds `u64::MAX`
pub fn word_to_u64(value: U256, what: &str) -> Result<u64> {
  u64::try_from(value).map_err(|_| anyhow!("{what} {value} does not fit u64."))
}
